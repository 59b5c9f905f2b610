use serde::{Deserialize, Serialize};

use crate::reports::query::{Entry, ReportQuery};
use crate::reports::speech;
use crate::reports::ReportSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<PlotPoint>,
}

/// Numeric data for one chart. Rendering is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Scene length, cast size and dialogue volume along the script timeline.
///
/// Every series has one point per scene; x is the scene start in minutes.
pub fn story_structure(source: &ReportSource<'_>) -> PlotData {
    let speeches = speech::collect(source.blocks, source.scenes);

    let mut duration = Vec::with_capacity(source.scenes.len());
    let mut cast = Vec::with_capacity(source.scenes.len());
    let mut dialogue = Vec::with_capacity(source.scenes.len());
    let mut elapsed_ms = 0u128;
    for (index, scene) in source.scenes.iter().enumerate() {
        let x = elapsed_ms as f64 / 60_000.0;
        let words: usize = speeches
            .iter()
            .filter(|s| s.scene == index)
            .map(|s| s.words)
            .sum();
        duration.push(PlotPoint {
            x,
            y: scene.duration.as_secs_f64(),
        });
        cast.push(PlotPoint {
            x,
            y: scene.characters.len() as f64,
        });
        dialogue.push(PlotPoint { x, y: words as f64 });
        elapsed_ms += scene.duration.as_millis();
    }

    PlotData {
        title: "Story structure".to_string(),
        x_label: "Minutes".to_string(),
        y_label: "Value".to_string(),
        series: vec![
            Series {
                name: "Scene duration (s)".to_string(),
                points: duration,
            },
            Series {
                name: "Characters".to_string(),
                points: cast,
            },
            Series {
                name: "Dialogue words".to_string(),
                points: dialogue,
            },
        ],
    }
}

/// Words spoken per scene, one series per character.
///
/// x is the 1-based position of the scene in the list. The query filters
/// and orders the series; `Count` sorts by total words.
pub fn characters_activity(source: &ReportSource<'_>, query: &ReportQuery) -> PlotData {
    let speeches = speech::collect(source.blocks, source.scenes);

    let mut names: Vec<&str> = Vec::new();
    for speech in &speeches {
        if !names.contains(&speech.speaker.as_str()) {
            names.push(&speech.speaker);
        }
    }

    let mut entries: Vec<Entry> = names
        .iter()
        .enumerate()
        .map(|(order, name)| {
            Entry {
                name: name.to_string(),
                order,
                count: speeches
                    .iter()
                    .filter(|s| s.speaker == *name)
                    .map(|s| s.words)
                    .sum(),
                duration: source
                    .scenes
                    .iter()
                    .filter(|scene| scene.characters.iter().any(|c| c == *name))
                    .map(|scene| scene.duration)
                    .sum(),
                cells: Vec::new(),
            }
        })
        .collect();
    query.arrange(&mut entries);

    let series = entries
        .into_iter()
        .map(|entry| {
            let points = (0..source.scenes.len())
                .map(|index| {
                    let words: usize = speeches
                        .iter()
                        .filter(|s| s.scene == index && s.speaker == entry.name)
                        .map(|s| s.words)
                        .sum();
                    PlotPoint {
                        x: (index + 1) as f64,
                        y: words as f64,
                    }
                })
                .collect();
            Series {
                name: entry.name,
                points,
            }
        })
        .collect();

    PlotData {
        title: "Characters activity".to_string(),
        x_label: "Scene".to_string(),
        y_label: "Words".to_string(),
        series,
    }
}
