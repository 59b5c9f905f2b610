use serde::{Deserialize, Serialize};
use std::ops::Range;
use uuid::Uuid;

/// Stable identifier of a review mark, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewMarkId(pub Uuid);

impl ReviewMarkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReviewMarkId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    Comment,
    Highlight,
    TextColor,
    Background,
}

/// A reply in a review thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

/// Editorial annotation attached to a character range of one block.
///
/// Ranges are in `char` offsets into the block text. They never take part in
/// correction or chronometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewMark {
    pub id: ReviewMarkId,
    pub range: Range<usize>,
    pub kind: ReviewKind,
    pub author_role: String,
    #[serde(default)]
    pub is_done: bool,
    /// Color for highlight/text-color/background marks, `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

impl ReviewMark {
    pub fn new(range: Range<usize>, kind: ReviewKind, author_role: impl Into<String>) -> Self {
        Self {
            id: ReviewMarkId::new(),
            range,
            kind,
            author_role: author_role.into(),
            is_done: false,
            color: None,
            replies: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Clamp the range to a text of `len` chars. Returns false when nothing is left.
    pub(crate) fn clamp_to(&mut self, len: usize) -> bool {
        let start = self.range.start.min(len);
        let end = self.range.end.min(len).max(start);
        self.range = start..end;
        !self.range.is_empty()
    }

    /// Move the range left by `offset` chars, as when the text before it is cut away.
    pub(crate) fn shift_left(&mut self, offset: usize) {
        self.range = self.range.start.saturating_sub(offset)..self.range.end.saturating_sub(offset);
    }

    pub(crate) fn shift_right(&mut self, offset: usize) {
        self.range = self.range.start + offset..self.range.end + offset;
    }
}
