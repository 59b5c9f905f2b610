//! "(MORE)" / "NAME (CONT'D)" markers around dialogue split across pages.
//!
//! Markers are ordinary blocks flagged with a [`Decoration`], so they can be
//! found and removed again without touching user text.

use crate::editing::{Cmd, Document, EditError};
use crate::layout::{PageBreak, PageLayout};
use crate::models::{Block, BlockType, Decoration, Locale, ReviewMark};
use crate::models::block::byte_index;
use crate::scenes::normalize_name;
use crate::template::Template;

/// Insert continuity markers at each break. Returns the number of splits made.
///
/// Breaks are processed from the end of the document so earlier indices stay
/// valid. A break is skipped when the block is not dialogue, the offset is
/// not strictly inside the text, the split already exists, or no speaker can
/// be found above the block.
pub fn correct_page_breaks(
    doc: &mut Document,
    breaks: &[PageBreak],
    locale: Locale,
) -> Result<usize, EditError> {
    let mut ordered = breaks.to_vec();
    ordered.sort_by(|a, b| (b.block, b.offset).cmp(&(a.block, a.offset)));
    ordered.dedup();

    let mut splits = 0;
    for page_break in ordered {
        let Some(blocks) = split_blocks(doc, page_break, locale) else {
            continue;
        };
        doc.apply(Cmd::ReplaceRange {
            range: page_break.block..page_break.block + 1,
            blocks,
        })?;
        splits += 1;
    }

    if splits > 0 {
        log::debug!("Inserted {splits} continuity markers");
    }
    Ok(splits)
}

/// The four replacement blocks for a split, or `None` if the break is a no-op.
fn split_blocks(doc: &Document, page_break: PageBreak, locale: Locale) -> Option<Vec<Block>> {
    let PageBreak { block: index, offset } = page_break;
    let block = doc.get(index)?;
    if block.block_type != BlockType::Dialogue {
        return None;
    }

    let already_split = doc
        .get(index + 1)
        .is_some_and(|next| next.decoration == Some(Decoration::More));
    if already_split && block.char_len() == offset {
        return None;
    }
    if offset == 0 || offset >= block.char_len() {
        return None;
    }

    let speaker = find_speaker(doc.blocks(), index)?;

    let split_at = byte_index(&block.text, offset);
    let mut head = block.clone();
    head.text = block.text[..split_at].to_string();
    head.review_marks = Vec::new();
    let mut tail = Block::decoration(
        BlockType::Dialogue,
        &block.text[split_at..],
        Decoration::Continuation,
    );
    tail.style_overrides = block.style_overrides.clone();

    for mark in &block.review_marks {
        if mark.range.start < offset {
            let mut part = mark.clone();
            part.range.end = part.range.end.min(offset);
            head.review_marks.push(part);
        }
        if mark.range.end > offset {
            let mut part = mark.clone();
            part.range.start = part.range.start.max(offset);
            part.shift_left(offset);
            tail.review_marks.push(part);
        }
    }

    Some(vec![
        head,
        Block::decoration(BlockType::Parenthetical, locale.more_marker(), Decoration::More),
        Block::decoration(
            BlockType::Character,
            format!("{speaker} {}", locale.continued_suffix()),
            Decoration::ContinuedCharacter,
        ),
        tail,
    ])
}

/// Walk back over the speech to its Character cue.
fn find_speaker(blocks: &[Block], index: usize) -> Option<String> {
    for block in blocks[..index].iter().rev() {
        match block.block_type {
            BlockType::Dialogue | BlockType::Parenthetical => continue,
            BlockType::Character => {
                let name = normalize_name(&block.text);
                return (!name.is_empty()).then_some(name);
            }
            _ => return None,
        }
    }
    None
}

/// Drop every marker and join continuations back onto their first half.
/// Returns the number of decoration blocks removed.
pub fn remove_decorations(doc: &mut Document) -> Result<usize, EditError> {
    let Some(first) = doc.blocks().iter().position(Block::is_decoration) else {
        return Ok(0);
    };
    let start = first.saturating_sub(1);

    let (rebuilt, removed) = strip_decorations(&doc.blocks()[start..]);
    let end = doc.len();
    doc.apply(Cmd::ReplaceRange {
        range: start..end,
        blocks: rebuilt,
    })?;
    log::debug!("Removed {removed} continuity blocks");
    Ok(removed)
}

/// Copy of `blocks` with markers dropped and continuations joined.
pub(crate) fn strip_decorations(blocks: &[Block]) -> (Vec<Block>, usize) {
    strip_decorations_while(blocks, || true).unwrap_or_default()
}

/// [`strip_decorations`] polling `keep_going` before each block.
/// Returns `None` as soon as it answers false.
pub(crate) fn strip_decorations_while(
    blocks: &[Block],
    mut keep_going: impl FnMut() -> bool,
) -> Option<(Vec<Block>, usize)> {
    let mut rebuilt: Vec<Block> = Vec::with_capacity(blocks.len());
    let mut removed = 0;
    for block in blocks {
        if !keep_going() {
            return None;
        }
        match block.decoration {
            None => rebuilt.push(block.clone()),
            Some(Decoration::More) | Some(Decoration::ContinuedCharacter) => removed += 1,
            Some(Decoration::Continuation) => {
                removed += 1;
                match rebuilt.last_mut() {
                    Some(head) if head.block_type == BlockType::Dialogue => join(head, block),
                    _ => {
                        let mut orphan = block.clone();
                        orphan.decoration = None;
                        rebuilt.push(orphan);
                    }
                }
            }
        }
    }
    Some((rebuilt, removed))
}

/// Append a continuation to its head, rejoining review marks split with it.
fn join(head: &mut Block, tail: &Block) {
    let offset = head.char_len();
    head.text.push_str(&tail.text);
    for mark in &tail.review_marks {
        let mut part: ReviewMark = mark.clone();
        part.shift_right(offset);
        match head
            .review_marks
            .iter_mut()
            .find(|m| m.id == part.id && m.range.end == offset)
        {
            Some(existing) => existing.range.end = part.range.end,
            None => head.review_marks.push(part),
        }
    }
}

/// Remove old markers, paginate, and insert fresh ones.
pub fn reflow(doc: &mut Document, template: &Template, locale: Locale) -> Result<usize, EditError> {
    remove_decorations(doc)?;
    let layout = PageLayout::compute(doc.blocks(), template);
    correct_page_breaks(doc, &layout.breaks(), locale)
}
