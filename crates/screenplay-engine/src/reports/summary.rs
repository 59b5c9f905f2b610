use std::collections::BTreeMap;

use crate::models::BlockType;
use crate::reports::table::{format_duration, ReportTable};
use crate::reports::ReportSource;

/// Document totals followed by paragraph counts per block type.
pub fn summary_report(source: &ReportSource<'_>) -> ReportTable {
    let counters = &source.counters;
    let headed = source.scenes.iter().filter(|s| s.is_headed()).count();

    let mut characters: Vec<&String> = source
        .scenes
        .iter()
        .flat_map(|scene| &scene.characters)
        .collect();
    characters.sort();
    characters.dedup();

    let mut locations: Vec<&str> = source
        .scenes
        .iter()
        .filter_map(|scene| scene.location.as_ref())
        .filter(|location| location.has_name())
        .map(|location| location.name.as_str())
        .collect();
    locations.sort();
    locations.dedup();

    let mut table = ReportTable::new("Summary", &["Metric", "Value"]);
    let mut row = |metric: &str, value: String| table.push_row(vec![metric.to_string(), value]);
    row("Pages", counters.pages.to_string());
    row("Words", counters.words.to_string());
    row("Characters with spaces", counters.characters_with_spaces.to_string());
    row(
        "Characters without spaces",
        counters.characters_without_spaces.to_string(),
    );
    row("Duration", format_duration(counters.duration));
    row("Scenes", headed.to_string());
    row("Locations", locations.len().to_string());
    row("Cast", characters.len().to_string());

    let mut paragraphs: BTreeMap<BlockType, usize> = BTreeMap::new();
    for block in source.blocks {
        if !block.is_decoration() && !block.block_type.is_structural() {
            *paragraphs.entry(block.block_type).or_default() += 1;
        }
    }
    for (block_type, count) in paragraphs {
        table.push_row(vec![
            format!("{} paragraphs", block_type.display_name()),
            count.to_string(),
        ]);
    }
    table
}
