use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    DocumentOrder,
    Alphabetical,
    /// Scenes, speeches or occurrences, whichever the report counts.
    Count,
    Duration,
}

/// Parameters shared by every report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    pub sort: SortKey,
    pub descending: bool,
    /// Entity names to keep (case-insensitive). Empty keeps everything.
    pub filter: Vec<String>,
}

impl ReportQuery {
    pub fn sorted(sort: SortKey, descending: bool) -> Self {
        Self {
            sort,
            descending,
            ..Self::default()
        }
    }

    pub fn with_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_uppercase();
        self.filter.is_empty()
            || self
                .filter
                .iter()
                .any(|wanted| wanted.trim().to_uppercase() == name)
    }

    /// Filter and order report entries in place.
    pub(crate) fn arrange(&self, entries: &mut Vec<Entry>) {
        entries.retain(|entry| self.matches(&entry.name));
        entries.sort_by(|a, b| {
            let ordering = match self.sort {
                SortKey::DocumentOrder => a.order.cmp(&b.order),
                SortKey::Alphabetical => a.name.cmp(&b.name),
                SortKey::Count => a.count.cmp(&b.count),
                SortKey::Duration => a.duration.cmp(&b.duration),
            };
            let ordering = if self.descending {
                ordering.reverse()
            } else {
                ordering
            };
            ordering.then_with(|| a.order.cmp(&b.order))
        });
    }
}

/// One report row plus the keys it can be sorted by.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub name: String,
    pub order: usize,
    pub count: usize,
    pub duration: Duration,
    pub cells: Vec<String>,
}
