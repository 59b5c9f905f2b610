use std::time::Duration;

use crate::reports::cast::scene_label;
use crate::reports::query::{Entry, ReportQuery};
use crate::reports::table::{format_duration, ReportTable};
use crate::reports::ReportSource;
use crate::scenes::{Scene, UNDEFINED};

fn location_name(scene: &Scene) -> &str {
    scene
        .location
        .as_ref()
        .map_or(UNDEFINED, |location| location.name.as_str())
}

fn pages_label(scene: &Scene) -> String {
    match &scene.pages {
        Some(pages) if pages.start() == pages.end() => (pages.start() + 1).to_string(),
        Some(pages) => format!("{}-{}", pages.start() + 1, pages.end() + 1),
        None => "-".to_string(),
    }
}

/// One row per scene. The filter matches location names; `Count` sorts by
/// number of characters.
pub fn scene_report(source: &ReportSource<'_>, query: &ReportQuery) -> ReportTable {
    let mut entries: Vec<Entry> = source
        .scenes
        .iter()
        .enumerate()
        .map(|(order, scene)| {
            let time = scene
                .location
                .as_ref()
                .map_or_else(|| UNDEFINED.to_string(), |location| location.time.to_string());
            Entry {
                name: location_name(scene).to_string(),
                order,
                count: scene.characters.len(),
                duration: scene.duration,
                cells: vec![
                    scene_label(scene.number),
                    scene.heading.clone(),
                    location_name(scene).to_string(),
                    time,
                    pages_label(scene),
                    format_duration(scene.duration),
                    scene.characters.join(", "),
                ],
            }
        })
        .collect();
    query.arrange(&mut entries);

    let mut table = ReportTable::new(
        "Scenes",
        &["No.", "Heading", "Location", "Time", "Pages", "Duration", "Characters"],
    );
    for entry in entries {
        table.push_row(entry.cells);
    }
    table
}

#[derive(Debug, Default)]
struct LocationRow {
    name: String,
    scenes: usize,
    times: Vec<String>,
    duration: Duration,
    characters: Vec<String>,
}

/// Headed scenes grouped by location name. `Count` sorts by number of scenes.
pub fn location_report(source: &ReportSource<'_>, query: &ReportQuery) -> ReportTable {
    let mut locations: Vec<LocationRow> = Vec::new();
    for scene in source.scenes.iter().filter(|scene| scene.is_headed()) {
        let name = location_name(scene);
        let index = match locations.iter().position(|row| row.name == name) {
            Some(index) => index,
            None => {
                locations.push(LocationRow {
                    name: name.to_string(),
                    ..LocationRow::default()
                });
                locations.len() - 1
            }
        };
        let row = &mut locations[index];
        row.scenes += 1;
        row.duration += scene.duration;
        if let Some(location) = &scene.location {
            let time = location.time.to_string();
            if !row.times.contains(&time) {
                row.times.push(time);
            }
        }
        for character in &scene.characters {
            if !row.characters.contains(character) {
                row.characters.push(character.clone());
            }
        }
    }

    let mut entries: Vec<Entry> = locations
        .into_iter()
        .enumerate()
        .map(|(order, row)| Entry {
            order,
            count: row.scenes,
            duration: row.duration,
            cells: vec![
                row.name.clone(),
                row.scenes.to_string(),
                row.times.join(", "),
                format_duration(row.duration),
                row.characters.len().to_string(),
            ],
            name: row.name,
        })
        .collect();
    query.arrange(&mut entries);

    let mut table = ReportTable::new(
        "Locations",
        &["Location", "Scenes", "Times", "Duration", "Characters"],
    );
    for entry in entries {
        table.push_row(entry.cells);
    }
    table
}
