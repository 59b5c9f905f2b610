use serde::{Deserialize, Serialize};

/// Script language: selects continuity markers, quote glyphs and the
/// scene-heading vocabulary written into new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    Russian,
}

impl Locale {
    /// Line closing a speech continued on the next page.
    pub fn more_marker(self) -> &'static str {
        match self {
            Locale::English => "(MORE)",
            Locale::Russian => "(ДАЛЬШЕ)",
        }
    }

    /// Suffix for a speaker cue continuing a speech.
    pub fn continued_suffix(self) -> &'static str {
        match self {
            Locale::English => "(CONT'D)",
            Locale::Russian => "(ПРОД.)",
        }
    }

    pub fn opening_quote(self) -> char {
        match self {
            Locale::English => '\u{201C}',
            Locale::Russian => '\u{00AB}',
        }
    }

    pub fn closing_quote(self) -> char {
        match self {
            Locale::English => '\u{201D}',
            Locale::Russian => '\u{00BB}',
        }
    }

    /// Quotes for a quotation written with single quotes.
    pub fn single_quotes(self) -> (char, char) {
        match self {
            Locale::English => ('\u{2018}', '\u{2019}'),
            Locale::Russian => ('\u{201E}', '\u{201C}'),
        }
    }
}
