//! Text corrector: typography rules and page-break continuity.
//!
//! Text rules run in a fixed order on each block: ellipsis, smart quotes,
//! double capitals, sentence capitalization. Every rule is idempotent, so
//! running the corrector twice changes nothing the second time. Blocks the
//! corrector generated itself are never rewritten by the text rules.

pub mod continuity;
pub mod rules;

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::editing::{Cmd, Document, EditError};
use crate::layout::PageBreak;
use crate::models::{Block, BlockType, Locale};
use crate::template::{StyleRule, Template};

pub use continuity::{correct_page_breaks, reflow, remove_decorations};

/// Which corrections run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    pub capitalize_sentences: bool,
    pub fix_double_capitals: bool,
    pub ellipsis: bool,
    pub smart_quotes: bool,
    pub continuity: bool,
    pub locale: Locale,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            capitalize_sentences: true,
            fix_double_capitals: true,
            ellipsis: true,
            smart_quotes: true,
            continuity: true,
            locale: Locale::English,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Corrector {
    config: CorrectorConfig,
}

impl Corrector {
    pub fn new(config: CorrectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CorrectorConfig) {
        self.config = config;
    }

    /// Corrected copy of one block, or `None` if no rule applies.
    pub fn correct_block(&self, block: &Block, rule: &StyleRule) -> Option<Block> {
        if block.is_decoration() || block.block_type.is_structural() {
            return None;
        }

        let mut corrected = block.clone();
        let mut changed = false;

        if self.config.ellipsis
            && let Some((text, collapsed)) = rules::fix_ellipsis(&corrected.text)
        {
            for mark in &mut corrected.review_marks {
                mark.range = rules::map_ellipsis_offset(mark.range.start, &collapsed)
                    ..rules::map_ellipsis_offset(mark.range.end, &collapsed);
            }
            corrected.replace_text(text);
            changed = true;
        }
        if self.config.smart_quotes
            && let Some(text) = rules::smart_quotes(&corrected.text, self.config.locale)
        {
            corrected.text = text;
            changed = true;
        }
        if self.config.fix_double_capitals
            && !rule.is_uppercase()
            && let Some(text) = rules::fix_double_capitals(&corrected.text)
        {
            corrected.text = text;
            changed = true;
        }
        if self.config.capitalize_sentences
            && matches!(block.block_type, BlockType::Action | BlockType::Dialogue)
            && let Some(text) = rules::capitalize_sentences(&corrected.text)
        {
            corrected.text = text;
            changed = true;
        }

        changed.then_some(corrected)
    }

    /// Apply the text rules to blocks in `range`. Returns the number of blocks changed.
    pub fn correct_text(
        &self,
        doc: &mut Document,
        template: &Template,
        range: Range<usize>,
    ) -> Result<usize, EditError> {
        let end = range.end.min(doc.len());
        let mut corrected = 0;
        for index in range.start..end {
            let Some(block) = doc.get(index) else {
                break;
            };
            let rule = template.resolve(block.block_type);
            if let Some(fixed) = self.correct_block(block, rule) {
                doc.apply(Cmd::ReplaceRange {
                    range: index..index + 1,
                    blocks: vec![fixed],
                })?;
                corrected += 1;
            }
        }
        if corrected > 0 {
            log::debug!("Corrected text of {corrected} blocks in {range:?}");
        }
        Ok(corrected)
    }

    /// Insert continuity markers at the given breaks, if enabled.
    pub fn correct_page_breaks(
        &self,
        doc: &mut Document,
        breaks: &[PageBreak],
    ) -> Result<usize, EditError> {
        if !self.config.continuity {
            return Ok(0);
        }
        correct_page_breaks(doc, breaks, self.config.locale)
    }

    /// Join split dialogue back, run the text rules over the whole document,
    /// then insert fresh continuity markers if enabled.
    pub fn correct_all(&self, doc: &mut Document, template: &Template) -> Result<(), EditError> {
        remove_decorations(doc)?;
        self.correct_text(doc, template, 0..doc.len())?;
        if self.config.continuity {
            reflow(doc, template, self.config.locale)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Decoration, ReviewKind, ReviewMark};
    use crate::template::PageMetrics;
    use pretty_assertions::assert_eq;
    use BlockType::*;

    #[test]
    fn test_rules_apply_in_order_and_only_where_allowed() {
        let corrector = Corrector::default();
        let template = Template::default();
        let mut doc = Document::from_blocks(vec![
            Block::new(Action, "he waits... then THe door opens."),
            Block::new(Character, "john"),
            Block::new(Dialogue, "\"hi.\" don't go"),
            Block::new(SceneDescription, "an intro"),
        ])
        .unwrap();

        let len = doc.len();
        let changed = corrector.correct_text(&mut doc, &template, 0..len).unwrap();

        assert_eq!(changed, 2);
        assert_eq!(doc.blocks()[0].text, "He waits… then The door opens.");
        assert_eq!(doc.blocks()[1].text, "john");
        assert_eq!(doc.blocks()[2].text, "“Hi.” Don’t go");
        assert_eq!(doc.blocks()[3].text, "an intro");
    }

    #[test]
    fn test_correction_is_idempotent() {
        let corrector = Corrector::default();
        let template = Template::default();
        let mut doc = Document::from_blocks(vec![Block::new(
            Action,
            "so... \"THis\" is it. isn't it",
        )])
        .unwrap();

        corrector.correct_text(&mut doc, &template, 0..1).unwrap();
        let once = doc.blocks().to_vec();
        let version = doc.version();

        assert_eq!(corrector.correct_text(&mut doc, &template, 0..1).unwrap(), 0);
        assert_eq!(doc.blocks(), once.as_slice());
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_disabled_rules_do_nothing() {
        let corrector = Corrector::new(CorrectorConfig {
            capitalize_sentences: false,
            fix_double_capitals: false,
            ellipsis: false,
            smart_quotes: false,
            continuity: false,
            locale: Locale::English,
        });
        let block = Block::new(Action, "he said \"THis...\"");
        assert!(corrector
            .correct_block(&block, &StyleRule::new(Action, "A"))
            .is_none());
    }

    #[test]
    fn test_decorations_are_left_alone() {
        let corrector = Corrector::default();
        let more = Block::decoration(Parenthetical, "(more...)", Decoration::More);
        assert!(corrector
            .correct_block(&more, &StyleRule::new(Parenthetical, "P"))
            .is_none());
    }

    #[test]
    fn test_ellipsis_remaps_review_marks() {
        let corrector = Corrector::default();
        let mut block = Block::new(Action, "Wait... Now go.");
        block
            .review_marks
            .push(ReviewMark::new(8..11, ReviewKind::Highlight, "editor"));

        let fixed = corrector
            .correct_block(&block, &StyleRule::new(Action, "A"))
            .unwrap();
        assert_eq!(fixed.text, "Wait… Now go.");
        assert_eq!(fixed.review_marks[0].range, 6..9);
    }

    #[test]
    fn test_correct_all_twice_keeps_one_marker_pair() {
        let template = Template::new(
            "Tiny",
            1,
            PageMetrics {
                lines_per_page: 5,
                ..PageMetrics::a4()
            },
            BlockType::ALL
                .iter()
                .map(|t| Template::default().resolve(*t).clone())
                .collect(),
        )
        .unwrap();
        let speech = vec!["Word"; 40].join(" ");
        let mut doc = Document::from_blocks(vec![
            Block::new(Action, "Night."),
            Block::new(Character, "JOHN"),
            Block::new(Dialogue, speech.clone()),
        ])
        .unwrap();

        let corrector = Corrector::default();
        corrector.correct_all(&mut doc, &template).unwrap();
        let once = doc.blocks().to_vec();
        corrector.correct_all(&mut doc, &template).unwrap();

        assert_eq!(doc.blocks(), once.as_slice());
        let more = doc
            .blocks()
            .iter()
            .filter(|b| b.decoration == Some(Decoration::More))
            .count();
        let contd = doc
            .blocks()
            .iter()
            .filter(|b| b.decoration == Some(Decoration::ContinuedCharacter))
            .count();
        assert!(more >= 1);
        assert_eq!(more, contd);

        remove_decorations(&mut doc).unwrap();
        assert_eq!(doc.blocks()[2].text, speech);
    }

    #[test]
    fn test_edited_continuation_is_corrected_once() {
        let template = Template::new(
            "Tiny",
            1,
            PageMetrics {
                lines_per_page: 5,
                ..PageMetrics::a4()
            },
            BlockType::ALL
                .iter()
                .map(|t| Template::default().resolve(*t).clone())
                .collect(),
        )
        .unwrap();
        let mut doc = Document::from_blocks(vec![
            Block::new(Action, "Night."),
            Block::new(Character, "JOHN"),
            Block::new(Dialogue, vec!["Word"; 40].join(" ")),
        ])
        .unwrap();
        let corrector = Corrector::default();
        corrector.correct_all(&mut doc, &template).unwrap();

        let tail = doc
            .blocks()
            .iter()
            .position(|b| b.decoration == Some(Decoration::Continuation))
            .unwrap();
        doc.set_text(tail, "we go... now. i said so.").unwrap();

        corrector.correct_all(&mut doc, &template).unwrap();
        let once = doc.blocks().to_vec();
        corrector.correct_all(&mut doc, &template).unwrap();
        assert_eq!(doc.blocks(), once.as_slice());

        remove_decorations(&mut doc).unwrap();
        assert!(doc.blocks()[2].text.ends_with("go… now. I said so."));
    }
}
