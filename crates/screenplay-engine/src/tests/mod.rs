//! Shared fixtures for unit tests.

use crate::models::{Block, BlockType::*};

/// Two headed scenes:
///
/// 1. INT. HOUSE - DAY: DOCTOR listed, JOHN speaks twice, MARY once.
/// 2. EXT. GARDEN - NIGHT: JOHN (V.O.) and MARY speak once each.
pub fn sample_blocks() -> Vec<Block> {
    vec![
        Block::new(SceneHeading, "INT. HOUSE - DAY"),
        Block::new(SceneCharacters, "DOCTOR"),
        Block::new(Character, "JOHN"),
        Block::new(Dialogue, "Where is she?"),
        Block::new(Character, "MARY"),
        Block::new(Parenthetical, "(whispers)"),
        Block::new(Dialogue, "Upstairs."),
        Block::new(Character, "JOHN"),
        Block::new(Dialogue, "Then we wait."),
        Block::new(SceneHeading, "EXT. GARDEN - NIGHT"),
        Block::new(Action, "Rain."),
        Block::new(Character, "JOHN (V.O.)"),
        Block::new(Dialogue, "She never came down."),
        Block::new(Character, "MARY"),
        Block::new(Dialogue, "I did."),
    ]
}
