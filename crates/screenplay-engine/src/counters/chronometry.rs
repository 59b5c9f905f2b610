use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockType, Decoration};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChronometryError {
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidSeconds { field: &'static str, value: f64 },
    #[error("Pages mode needs a positive seconds_per_page")]
    ZeroPageDuration,
}

/// How script text converts to screen time.
///
/// In pages mode only `seconds_per_page` is used. Otherwise each block is
/// timed from its length and type. The two modes never mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronometryConfig {
    pub seconds_per_page: f64,
    pub seconds_per_50_characters: f64,
    pub seconds_per_dialogue_paragraph: f64,
    pub seconds_per_scene_heading: f64,
    pub consider_spaces_in_character_count: bool,
    pub pages_mode_only: bool,
}

impl Default for ChronometryConfig {
    fn default() -> Self {
        Self {
            seconds_per_page: 60.0,
            seconds_per_50_characters: 2.5,
            seconds_per_dialogue_paragraph: 2.0,
            seconds_per_scene_heading: 2.0,
            consider_spaces_in_character_count: true,
            pages_mode_only: false,
        }
    }
}

impl ChronometryConfig {
    pub fn pages(seconds_per_page: f64) -> Self {
        Self {
            seconds_per_page,
            pages_mode_only: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ChronometryError> {
        for (field, value) in [
            ("seconds_per_page", self.seconds_per_page),
            ("seconds_per_50_characters", self.seconds_per_50_characters),
            (
                "seconds_per_dialogue_paragraph",
                self.seconds_per_dialogue_paragraph,
            ),
            ("seconds_per_scene_heading", self.seconds_per_scene_heading),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChronometryError::InvalidSeconds { field, value });
            }
        }
        if self.pages_mode_only && self.seconds_per_page == 0.0 {
            return Err(ChronometryError::ZeroPageDuration);
        }
        Ok(())
    }

    /// Granular duration of one block in milliseconds.
    pub fn granular_ms(&self, block: &Block) -> u64 {
        // "(MORE)" and cue lines are layout only.
        if matches!(
            block.decoration,
            Some(Decoration::More | Decoration::ContinuedCharacter)
        ) || !block.block_type.is_printable()
        {
            return 0;
        }

        let per_chars = || {
            let chars = if self.consider_spaces_in_character_count {
                block.char_len()
            } else {
                block.text.chars().filter(|c| !c.is_whitespace()).count()
            };
            chars.div_ceil(50) as u64 * to_ms(self.seconds_per_50_characters)
        };

        match block.block_type {
            BlockType::Action | BlockType::Shot | BlockType::Transition => per_chars(),
            BlockType::Dialogue => {
                let paragraph = if block.decoration == Some(Decoration::Continuation) {
                    0
                } else {
                    to_ms(self.seconds_per_dialogue_paragraph)
                };
                per_chars() + paragraph
            }
            BlockType::SceneHeading => to_ms(self.seconds_per_scene_heading),
            _ => 0,
        }
    }

    /// Pages-mode duration for `lines` page lines.
    pub fn pages_ms(&self, lines: u64, lines_per_page: u32) -> u64 {
        if lines_per_page == 0 {
            return 0;
        }
        let ms = lines as f64 * self.seconds_per_page * 1000.0 / lines_per_page as f64;
        ms.round() as u64
    }
}

pub(crate) fn to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn granular(s50: f64, dialogue: f64, heading: f64) -> ChronometryConfig {
        ChronometryConfig {
            seconds_per_page: 0.0,
            seconds_per_50_characters: s50,
            seconds_per_dialogue_paragraph: dialogue,
            seconds_per_scene_heading: heading,
            consider_spaces_in_character_count: true,
            pages_mode_only: false,
        }
    }

    #[rstest]
    #[case(BlockType::Action, "x", 5_000)]
    #[case(BlockType::Action, &"x".repeat(50), 5_000)]
    #[case(BlockType::Action, &"x".repeat(51), 10_000)]
    #[case(BlockType::Dialogue, "Hello there.", 5_000 + 2_000)]
    #[case(BlockType::SceneHeading, "INT. HOUSE - DAY", 3_000)]
    #[case(BlockType::Character, "JOHN", 0)]
    #[case(BlockType::Parenthetical, "(beat)", 0)]
    #[case(BlockType::NoprintableText, "note", 0)]
    #[case(BlockType::Action, "", 0)]
    fn test_granular_ms(#[case] block_type: BlockType, #[case] text: &str, #[case] expected: u64) {
        let config = granular(5.0, 2.0, 3.0);
        assert_eq!(config.granular_ms(&Block::new(block_type, text)), expected);
    }

    #[test]
    fn test_spaces_can_be_excluded() {
        let mut config = granular(1.0, 0.0, 0.0);
        let block = Block::new(BlockType::Action, format!("{} {}", "a".repeat(25), "b".repeat(25)));
        assert_eq!(config.granular_ms(&block), 2_000);
        config.consider_spaces_in_character_count = false;
        assert_eq!(config.granular_ms(&block), 1_000);
    }

    #[test]
    fn test_markers_take_no_time() {
        let config = granular(5.0, 2.0, 0.0);
        let more = Block::decoration(BlockType::Parenthetical, "(MORE)", Decoration::More);
        let cont = Block::decoration(BlockType::Dialogue, "rest", Decoration::Continuation);
        assert_eq!(config.granular_ms(&more), 0);
        // A continuation is the same paragraph: no second paragraph addend.
        assert_eq!(config.granular_ms(&cont), 5_000);
    }

    #[test]
    fn test_pages_ms() {
        let config = ChronometryConfig::pages(60.0);
        assert_eq!(config.pages_ms(54, 54), 60_000);
        assert_eq!(config.pages_ms(27, 54), 30_000);
        assert_eq!(config.pages_ms(1, 3), 20_000);
    }

    #[test]
    fn test_validate() {
        assert!(ChronometryConfig::default().validate().is_ok());
        let bad = ChronometryConfig {
            seconds_per_50_characters: -1.0,
            ..ChronometryConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ChronometryError::InvalidSeconds {
                field: "seconds_per_50_characters",
                ..
            })
        ));
        let nan = ChronometryConfig {
            seconds_per_page: f64::NAN,
            ..ChronometryConfig::default()
        };
        assert!(nan.validate().is_err());
        assert_eq!(
            ChronometryConfig::pages(0.0).validate(),
            Err(ChronometryError::ZeroPageDuration)
        );
    }
}
