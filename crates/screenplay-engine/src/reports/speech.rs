use crate::models::{Block, BlockType, Decoration};
use crate::scenes::{normalize_name, Scene};

/// One cue and everything said under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Speech {
    pub speaker: String,
    /// Index into the scene list.
    pub scene: usize,
    pub parentheticals: Vec<String>,
    pub dialogue: Vec<String>,
    pub words: usize,
}

/// Every speech of every scene, in document order.
///
/// Split dialogue is read back as one paragraph and corrector markers are
/// ignored, so results do not depend on pagination.
pub(crate) fn collect(blocks: &[Block], scenes: &[Scene]) -> Vec<Speech> {
    let mut speeches = Vec::new();
    for (index, scene) in scenes.iter().enumerate() {
        let Some(scene_blocks) = blocks.get(scene.blocks.clone()) else {
            continue;
        };
        let mut current: Option<Speech> = None;
        for block in scene_blocks {
            match (block.block_type, block.decoration) {
                (_, Some(Decoration::More | Decoration::ContinuedCharacter)) => {}
                (BlockType::Character, None) => {
                    speeches.extend(current.take());
                    let speaker = normalize_name(&block.text);
                    if !speaker.is_empty() {
                        current = Some(Speech {
                            speaker,
                            scene: index,
                            parentheticals: Vec::new(),
                            dialogue: Vec::new(),
                            words: 0,
                        });
                    }
                }
                (BlockType::Parenthetical, _) => {
                    if let Some(speech) = current.as_mut() {
                        speech.parentheticals.push(block.text.clone());
                    }
                }
                (BlockType::Dialogue, decoration) => {
                    if let Some(speech) = current.as_mut() {
                        match (decoration, speech.dialogue.last_mut()) {
                            (Some(Decoration::Continuation), Some(last)) => {
                                let before = last.split_whitespace().count();
                                last.push_str(&block.text);
                                speech.words += last.split_whitespace().count() - before;
                            }
                            _ => {
                                speech.words += block.text.split_whitespace().count();
                                speech.dialogue.push(block.text.clone());
                            }
                        }
                    }
                }
                _ => speeches.extend(current.take()),
            }
        }
        speeches.extend(current);
    }
    speeches
}
