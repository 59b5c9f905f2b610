use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};
use std::time::Duration;

use crate::models::{Block, BlockType};
use crate::scenes::character::{normalize_name, parse_scene_characters};
use crate::scenes::heading::Location;
use crate::template::Template;

/// A run of content blocks between scene boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// 1-based number of headed scenes; `None` for unheaded runs.
    pub number: Option<usize>,
    /// Raw heading text, empty for unheaded scenes.
    pub heading: String,
    pub location: Option<Location>,
    /// Block indices, heading included.
    pub blocks: Range<usize>,
    /// Groups open at the first block.
    pub depth: usize,
    /// Everyone appearing in the scene, in order of first appearance.
    pub characters: Vec<String>,
    /// Characters listed in SceneCharacters blocks who never speak here.
    pub nonspeaking: Vec<String>,
    pub color_tag: Option<String>,
    /// Filled in from layout once counters are available.
    pub pages: Option<RangeInclusive<usize>>,
    pub duration: Duration,
}

impl Scene {
    pub fn is_headed(&self) -> bool {
        self.number.is_some()
    }

    pub fn speaking(&self) -> impl Iterator<Item = &String> {
        self.characters
            .iter()
            .filter(|name| !self.nonspeaking.contains(name))
    }
}

/// Lazy scene iterator over a block slice.
///
/// A scene starts at every SceneHeading, and at the first content block that
/// follows a document start or group boundary without a heading. It ends
/// before the next heading or structural block.
pub struct Scenes<'a> {
    blocks: &'a [Block],
    position: usize,
    depth: usize,
    next_number: usize,
    /// Affixes stripped from SceneCharacters text.
    affixes: (String, String),
}

impl<'a> Scenes<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        Self {
            blocks,
            position: 0,
            depth: 0,
            next_number: 1,
            affixes: (String::new(), String::new()),
        }
    }

    /// Use the template's SceneCharacters prefix/postfix when listing names.
    pub fn with_template(mut self, template: &Template) -> Self {
        let rule = template.resolve(BlockType::SceneCharacters);
        self.affixes = (rule.prefix.clone(), rule.postfix.clone());
        self
    }
}

impl Iterator for Scenes<'_> {
    type Item = Scene;

    fn next(&mut self) -> Option<Scene> {
        let blocks = self.blocks;
        while let Some(block) = blocks.get(self.position) {
            if block.block_type.opens().is_some() {
                self.depth += 1;
            } else if block.block_type.closes().is_some() {
                self.depth = self.depth.saturating_sub(1);
            } else {
                break;
            }
            self.position += 1;
        }

        let start = self.position;
        let first = blocks.get(start)?;

        let mut builder = SceneBuilder::default();
        let (number, heading, location) = if first.block_type == BlockType::SceneHeading {
            let number = self.next_number;
            self.next_number += 1;
            self.position += 1;
            (
                Some(number),
                first.text.clone(),
                Some(Location::parse(&first.text)),
            )
        } else {
            (None, String::new(), None)
        };

        while let Some(block) = blocks.get(self.position) {
            if block.block_type.is_structural() || block.block_type == BlockType::SceneHeading {
                break;
            }
            builder.absorb(block, &self.affixes);
            self.position += 1;
        }

        Some(Scene {
            number,
            heading,
            location,
            blocks: start..self.position,
            depth: self.depth,
            nonspeaking: builder
                .listed
                .into_iter()
                .filter(|name| !builder.speakers.contains(name))
                .collect(),
            characters: builder.characters,
            color_tag: first.color_tag.clone(),
            pages: None,
            duration: Duration::ZERO,
        })
    }
}

#[derive(Default)]
struct SceneBuilder {
    characters: Vec<String>,
    speakers: Vec<String>,
    listed: Vec<String>,
}

impl SceneBuilder {
    fn absorb(&mut self, block: &Block, (prefix, postfix): &(String, String)) {
        match block.block_type {
            BlockType::Character => {
                let name = normalize_name(&block.text);
                if !name.is_empty() {
                    push_distinct(&mut self.speakers, name.clone());
                    push_distinct(&mut self.characters, name);
                }
            }
            BlockType::SceneCharacters => {
                for name in parse_scene_characters(&block.text, prefix, postfix) {
                    push_distinct(&mut self.listed, name.clone());
                    push_distinct(&mut self.characters, name);
                }
            }
            _ => {}
        }
    }
}

fn push_distinct(list: &mut Vec<String>, name: String) {
    if !list.contains(&name) {
        list.push(name);
    }
}

/// All scenes of a block sequence, in document order.
pub fn segment(blocks: &[Block]) -> Vec<Scene> {
    Scenes::new(blocks).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::heading::{Place, TimeOfDay};
    use pretty_assertions::assert_eq;
    use BlockType::*;

    fn blocks(items: &[(BlockType, &str)]) -> Vec<Block> {
        items.iter().map(|(t, text)| Block::new(*t, *text)).collect()
    }

    #[test]
    fn test_single_scene() {
        let doc = blocks(&[
            (SceneHeading, "INT. HOUSE - DAY"),
            (Character, "JOHN"),
            (Dialogue, "Hello there."),
        ]);
        let scenes = segment(&doc);

        assert_eq!(scenes.len(), 1);
        let scene = &scenes[0];
        assert_eq!(scene.number, Some(1));
        assert_eq!(scene.blocks, 0..3);
        assert_eq!(scene.characters, vec!["JOHN"]);
        let location = scene.location.as_ref().unwrap();
        assert_eq!(location.place, Place::Interior);
        assert_eq!(location.name, "HOUSE");
        assert_eq!(location.time, TimeOfDay::Day);
    }

    #[test]
    fn test_prefix_before_first_heading_is_unheaded_scene() {
        let doc = blocks(&[
            (Action, "FADE IN:"),
            (SceneHeading, "EXT. FIELD - DAY"),
            (Action, "Wind."),
        ]);
        let scenes = segment(&doc);
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].number, None);
        assert_eq!(scenes[0].blocks, 0..1);
        assert!(scenes[0].location.is_none());
        assert_eq!(scenes[1].number, Some(1));
    }

    #[test]
    fn test_groups_bound_scenes_and_set_depth() {
        let doc = blocks(&[
            (Folder, "ACT ONE"),
            (SceneGroup, "Morning"),
            (SceneHeading, "INT. KITCHEN - MORNING"),
            (Action, "Coffee."),
            (SceneGroupFooter, ""),
            (Action, "Later that day."),
            (FolderFooter, ""),
            (SceneHeading, "EXT. ROAD - NIGHT"),
        ]);
        let scenes = segment(&doc);

        let summary: Vec<_> = scenes
            .iter()
            .map(|s| (s.number, s.blocks.clone(), s.depth))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some(1), 2..4, 2),
                (None, 5..6, 1),
                (Some(2), 7..8, 0),
            ]
        );
    }

    #[test]
    fn test_characters_are_normalized_and_distinct() {
        let doc = blocks(&[
            (SceneHeading, "INT. BAR - NIGHT"),
            (SceneCharacters, "Bartender, Mary"),
            (Character, "mary (V.O.)"),
            (Dialogue, "Two, please."),
            (Character, "JOHN"),
            (Dialogue, "Make it three."),
            (Character, "MARY (CONT'D)"),
            (Dialogue, "Fine."),
        ]);
        let scene = &segment(&doc)[0];
        assert_eq!(scene.characters, vec!["BARTENDER", "MARY", "JOHN"]);
        assert_eq!(scene.nonspeaking, vec!["BARTENDER"]);
        assert_eq!(scene.speaking().collect::<Vec<_>>(), vec!["MARY", "JOHN"]);
    }

    #[test]
    fn test_structural_only_document_has_no_scenes() {
        let doc = blocks(&[(Folder, "A"), (FolderFooter, "")]);
        assert!(segment(&doc).is_empty());
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let doc = blocks(&[
            (SceneHeading, "INT. A - DAY"),
            (Character, "X"),
            (SceneHeading, "INT. B - DAY"),
        ]);
        assert_eq!(segment(&doc), segment(&doc));
    }
}
