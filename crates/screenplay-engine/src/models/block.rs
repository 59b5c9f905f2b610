use serde::{Deserialize, Serialize};

use crate::models::{BlockType, ReviewMark};
use crate::template::Alignment;

/// Paragraph-local formatting that wins over the template rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

impl StyleOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Marks paragraphs the corrector generated around a page break.
///
/// Decorations are not user text: they are skipped by counters and the text
/// rules, stripped on export, and rebuilt on every reflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    /// The "(MORE)" line closing the first half of a split speech.
    More,
    /// The "NAME (CONT'D)" line opening the continuation page.
    ContinuedCharacter,
    /// Second half of a split dialogue paragraph.
    Continuation,
}

/// One typed paragraph of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_type: BlockType,
    pub text: String,
    #[serde(default, skip_serializing_if = "StyleOverrides::is_empty")]
    pub style_overrides: StyleOverrides,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_marks: Vec<ReviewMark>,
    /// Scene colour used by navigators and cards, `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_tag: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,
}

impl Block {
    pub fn new(block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            block_type,
            text: text.into(),
            style_overrides: StyleOverrides::default(),
            review_marks: Vec::new(),
            color_tag: None,
            is_draft: false,
            decoration: None,
        }
    }

    pub(crate) fn decoration(block_type: BlockType, text: impl Into<String>, kind: Decoration) -> Self {
        Self {
            decoration: Some(kind),
            ..Self::new(block_type, text)
        }
    }

    pub fn with_color_tag(mut self, color: impl Into<String>) -> Self {
        self.color_tag = Some(color.into());
        self
    }

    pub fn with_overrides(mut self, overrides: StyleOverrides) -> Self {
        self.style_overrides = overrides;
        self
    }

    pub fn is_decoration(&self) -> bool {
        self.decoration.is_some()
    }

    /// Length of the text in chars (the unit review ranges and page splits use).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Replace the text, clamping review marks that no longer fit.
    pub(crate) fn replace_text(&mut self, text: String) {
        self.text = text;
        let len = self.char_len();
        self.review_marks.retain_mut(|mark| mark.clamp_to(len));
    }
}

/// Byte index of the `char_offset`-th char, or the text length past the end.
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
