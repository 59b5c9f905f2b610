use crate::models::{Block, Decoration};

/// Counts for one block. Markers inserted by the corrector count as nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockMetrics {
    pub words: usize,
    pub chars_with_spaces: usize,
    pub chars_without_spaces: usize,
    /// Screen time in the active chronometry mode.
    pub duration_ms: u64,
}

impl BlockMetrics {
    /// Text counts only; duration is filled in by the engine.
    pub fn of(block: &Block) -> Self {
        let counted = block.block_type.is_printable()
            && !matches!(
                block.decoration,
                Some(Decoration::More | Decoration::ContinuedCharacter)
            );
        if !counted {
            return Self::default();
        }
        Self {
            words: block.text.split_whitespace().count(),
            chars_with_spaces: block.char_len(),
            chars_without_spaces: block.text.chars().filter(|c| !c.is_whitespace()).count(),
            duration_ms: 0,
        }
    }
}

/// Running sums over all block metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub words: usize,
    pub chars_with_spaces: usize,
    pub chars_without_spaces: usize,
    pub duration_ms: u64,
}

impl Totals {
    pub fn add(&mut self, m: &BlockMetrics) {
        self.words += m.words;
        self.chars_with_spaces += m.chars_with_spaces;
        self.chars_without_spaces += m.chars_without_spaces;
        self.duration_ms += m.duration_ms;
    }

    pub fn remove(&mut self, m: &BlockMetrics) {
        self.words -= m.words;
        self.chars_with_spaces -= m.chars_with_spaces;
        self.chars_without_spaces -= m.chars_without_spaces;
        self.duration_ms -= m.duration_ms;
    }
}
