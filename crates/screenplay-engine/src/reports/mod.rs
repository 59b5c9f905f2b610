//! Read-only report and plot projections of a document.
//!
//! Reports never touch the document. They read the block slice and a scene
//! list annotated with pages and durations (see
//! [`CounterEngine::annotate_scenes`](crate::counters::CounterEngine::annotate_scenes)),
//! usually the session's cached one.

pub mod cast;
pub mod plots;
pub mod query;
pub mod scene;
pub mod summary;
pub mod table;

mod speech;

use serde::{Deserialize, Serialize};

use crate::counters::CounterSnapshot;
use crate::models::Block;
use crate::scenes::Scene;

pub use cast::{cast_report, character_dialogue_report};
pub use plots::{characters_activity, story_structure, PlotData, PlotPoint, Series};
pub use query::{ReportQuery, SortKey};
pub use scene::{location_report, scene_report};
pub use summary::summary_report;
pub use table::{format_duration, ReportTable};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("No character named {0} appears in the script")]
    UnknownCharacter(String),
}

/// Everything a report reads.
#[derive(Debug, Clone, Copy)]
pub struct ReportSource<'a> {
    pub blocks: &'a [Block],
    pub scenes: &'a [Scene],
    pub counters: CounterSnapshot,
}

impl<'a> ReportSource<'a> {
    pub fn new(blocks: &'a [Block], scenes: &'a [Scene]) -> Self {
        Self {
            blocks,
            scenes,
            counters: CounterSnapshot::default(),
        }
    }

    pub fn with_counters(mut self, counters: CounterSnapshot) -> Self {
        self.counters = counters;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "report", content = "character", rename_all = "snake_case")]
pub enum ReportKind {
    Cast,
    Scene,
    Location,
    Summary,
    CharacterDialogue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    StoryStructure,
    CharactersActivity,
}

/// Build any table report.
pub fn build_report(
    kind: &ReportKind,
    source: &ReportSource<'_>,
    query: &ReportQuery,
) -> Result<ReportTable, ReportError> {
    let table = match kind {
        ReportKind::Cast => cast_report(source, query),
        ReportKind::Scene => scene_report(source, query),
        ReportKind::Location => location_report(source, query),
        ReportKind::Summary => summary_report(source),
        ReportKind::CharacterDialogue(name) => character_dialogue_report(source, name, query)?,
    };
    log::debug!("Built {} report with {} rows", table.title, table.rows.len());
    Ok(table)
}

/// Build any plot.
pub fn build_plot(kind: PlotKind, source: &ReportSource<'_>, query: &ReportQuery) -> PlotData {
    match kind {
        PlotKind::StoryStructure => story_structure(source),
        PlotKind::CharactersActivity => characters_activity(source, query),
    }
}
