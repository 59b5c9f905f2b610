use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A finished report: header plus rows of display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Aligned plain-text rendering with a title line and a header rule.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        push_line(&mut out, &self.columns, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }

    /// RFC 4180 style CSV, header first.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in std::iter::once(&self.columns).chain(&self.rows) {
            let line: Vec<String> = row.iter().map(|cell| csv_field(cell)).collect();
            out.push_str(&line.join(","));
            out.push_str("\r\n");
        }
        out
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let width = widths.get(i).copied().unwrap_or(0);
        line.extend(std::iter::repeat_n(' ', width.saturating_sub(cell.chars().count())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn csv_field(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// `m:ss`, or `h:mm:ss` from one hour on.
pub fn format_duration(duration: Duration) -> String {
    let seconds = (duration.as_millis() as f64 / 1000.0).round() as u64;
    let (hours, minutes, seconds) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> ReportTable {
        let mut table = ReportTable::new("Cast", &["Character", "Scenes"]);
        table.push_row(vec!["JOHN".to_string(), "12".to_string()]);
        table.push_row(vec!["MARY, JR.".to_string(), "3".to_string()]);
        table
    }

    #[test]
    fn test_to_text() {
        insta::assert_snapshot!(sample().to_text(), @r"
        Cast
        Character  Scenes
        ---------  ------
        JOHN       12
        MARY, JR.  3
        ");
    }

    #[test]
    fn test_to_csv_quotes_fields() {
        assert_eq!(
            sample().to_csv(),
            "Character,Scenes\r\nJOHN,12\r\n\"MARY, JR.\",3\r\n"
        );
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[rstest]
    #[case(0, "0:00")]
    #[case(5_000, "0:05")]
    #[case(61_499, "1:01")]
    #[case(3_600_000, "1:00:00")]
    #[case(3_725_000, "1:02:05")]
    fn test_format_duration(#[case] ms: u64, #[case] expected: &str) {
        assert_eq!(format_duration(Duration::from_millis(ms)), expected);
    }
}
