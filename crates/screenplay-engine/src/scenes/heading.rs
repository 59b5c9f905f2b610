use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used wherever a heading piece could not be recognised.
pub const UNDEFINED: &str = "[UNDEFINED]";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Place {
    Interior,
    Exterior,
    InteriorExterior,
    /// A marker we do not know, kept verbatim.
    Other(String),
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Day,
    Night,
    Morning,
    Evening,
    Other(String),
    Undefined,
}

const INTERIOR: &[&str] = &["INT", "ИНТ"];
const EXTERIOR: &[&str] = &["EXT", "НАТ"];
const INTERIOR_EXTERIOR: &[&str] = &["INT./EXT", "EXT./INT", "INT/EXT", "I/E", "ИНТ./НАТ", "НАТ./ИНТ"];

impl Place {
    fn parse(marker: &str) -> Self {
        let marker = marker.trim().trim_end_matches('.').to_uppercase();
        if marker.is_empty() {
            Place::Undefined
        } else if INTERIOR.contains(&marker.as_str()) {
            Place::Interior
        } else if EXTERIOR.contains(&marker.as_str()) {
            Place::Exterior
        } else if INTERIOR_EXTERIOR.contains(&marker.as_str()) {
            Place::InteriorExterior
        } else {
            Place::Other(marker)
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Interior => write!(f, "INT."),
            Place::Exterior => write!(f, "EXT."),
            Place::InteriorExterior => write!(f, "INT./EXT."),
            Place::Other(marker) => write!(f, "{marker}."),
            Place::Undefined => write!(f, "{UNDEFINED}"),
        }
    }
}

impl TimeOfDay {
    fn parse(text: &str) -> Self {
        let text = collapse_upper(text);
        match text.as_str() {
            "" => TimeOfDay::Undefined,
            "DAY" | "ДЕНЬ" => TimeOfDay::Day,
            "NIGHT" | "НОЧЬ" => TimeOfDay::Night,
            "MORNING" | "УТРО" => TimeOfDay::Morning,
            "EVENING" | "ВЕЧЕР" => TimeOfDay::Evening,
            _ => TimeOfDay::Other(text),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOfDay::Day => write!(f, "DAY"),
            TimeOfDay::Night => write!(f, "NIGHT"),
            TimeOfDay::Morning => write!(f, "MORNING"),
            TimeOfDay::Evening => write!(f, "EVENING"),
            TimeOfDay::Other(text) => write!(f, "{text}"),
            TimeOfDay::Undefined => write!(f, "{UNDEFINED}"),
        }
    }
}

/// Parsed scene heading: `PLACE. NAME - TIME[, SCENARIO DAY]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub place: Place,
    /// Upper-cased location name, or [`UNDEFINED`].
    pub name: String,
    pub time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_day: Option<String>,
}

impl Location {
    /// Parse a heading. Pieces that are missing become undefined; parsing
    /// never fails.
    pub fn parse(heading: &str) -> Self {
        let heading = heading.trim();

        let known_marker = heading.split_once(' ').and_then(|(word, rest)| {
            let place = Place::parse(word);
            (!matches!(place, Place::Other(_) | Place::Undefined)).then_some((place, rest))
        });
        let (place, rest) = match (known_marker, heading.find(". ")) {
            (Some((place, rest)), _) => (place, rest.trim_start()),
            (None, Some(i)) => (Place::parse(&heading[..i]), &heading[i + 2..]),
            (None, None) => (Place::Undefined, heading),
        };

        let (rest, scenario_day) = match rest.rsplit_once(", ") {
            Some((before, day)) if !collapse_upper(day).is_empty() => {
                (before, Some(collapse_upper(day)))
            }
            _ => (rest, None),
        };

        let split = rest
            .rsplit_once(" - ")
            .or_else(|| rest.strip_prefix("- ").map(|time| ("", time)));
        let (name, time) = match split {
            Some((name, time)) => (name, TimeOfDay::parse(time)),
            None => (rest, TimeOfDay::Undefined),
        };

        let name = collapse_upper(name);
        Self {
            place,
            name: if name.is_empty() {
                UNDEFINED.to_string()
            } else {
                name
            },
            time,
            scenario_day,
        }
    }

    pub fn has_name(&self) -> bool {
        self.name != UNDEFINED
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.place, self.name, self.time)?;
        if let Some(day) = &self.scenario_day {
            write!(f, ", {day}")?;
        }
        Ok(())
    }
}

/// Collapse runs of whitespace to single spaces and upper-case.
pub(crate) fn collapse_upper(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
