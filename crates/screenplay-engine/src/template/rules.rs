use serde::{Deserialize, Serialize};

use crate::models::BlockType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseTransform {
    #[default]
    None,
    Upper,
}

/// Line spacing of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSpacing {
    #[default]
    Single,
    OneAndHalf,
    Double,
    /// Fixed line height in millimetres.
    FixedMm(f32),
}

/// Paragraph margins in millimetres, relative to the page text area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub bottom: f32,
}

impl Margins {
    pub fn horizontal(left: f32, right: f32) -> Self {
        Self {
            left,
            right,
            ..Self::default()
        }
    }
}

/// Formatting and semantics of one block type within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub block_type: BlockType,
    /// Short label used by numbered type pickers ("SH" for scene heading).
    pub abbreviation: String,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub case: CaseTransform,
    #[serde(default)]
    pub margins: Margins,
    /// Blank lines printed before the paragraph, dropped at the top of a page.
    #[serde(default)]
    pub top_space: u32,
    #[serde(default)]
    pub bottom_space: u32,
    #[serde(default)]
    pub line_spacing: LineSpacing,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    /// Whether group openers of this type print a matching footer line.
    #[serde(default)]
    pub has_footer: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postfix: String,
}

impl StyleRule {
    pub fn new(block_type: BlockType, abbreviation: &str) -> Self {
        Self {
            block_type,
            abbreviation: abbreviation.to_string(),
            alignment: Alignment::Left,
            case: CaseTransform::None,
            margins: Margins::default(),
            top_space: 0,
            bottom_space: 0,
            line_spacing: LineSpacing::Single,
            bold: false,
            italic: false,
            underline: false,
            has_footer: false,
            prefix: String::new(),
            postfix: String::new(),
        }
    }

    pub fn uppercase(mut self) -> Self {
        self.case = CaseTransform::Upper;
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn top_space(mut self, lines: u32) -> Self {
        self.top_space = lines;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_footer(mut self) -> Self {
        self.has_footer = true;
        self
    }

    pub fn is_uppercase(&self) -> bool {
        self.case == CaseTransform::Upper
    }

    /// Printed line count for `text_lines` wrapped lines under this rule's spacing.
    pub fn spaced_lines(&self, text_lines: u32, line_height_mm: f32) -> u32 {
        match self.line_spacing {
            LineSpacing::Single => text_lines,
            LineSpacing::OneAndHalf => (text_lines * 3).div_ceil(2),
            LineSpacing::Double => text_lines * 2,
            LineSpacing::FixedMm(height) if line_height_mm > 0.0 => {
                (text_lines as f32 * height / line_height_mm).ceil() as u32
            }
            LineSpacing::FixedMm(_) => text_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_lines() {
        let mut rule = StyleRule::new(BlockType::Action, "A");
        assert_eq!(rule.spaced_lines(3, 4.5), 3);

        rule.line_spacing = LineSpacing::OneAndHalf;
        assert_eq!(rule.spaced_lines(3, 4.5), 5);

        rule.line_spacing = LineSpacing::Double;
        assert_eq!(rule.spaced_lines(3, 4.5), 6);

        rule.line_spacing = LineSpacing::FixedMm(9.0);
        assert_eq!(rule.spaced_lines(3, 4.5), 6);
    }
}
