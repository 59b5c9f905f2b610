use std::ops::Range;

use crate::editing::{Document, EditError};
use crate::models::{Block, BlockType, Comment, GroupKind, ReviewMark, ReviewMarkId, StyleOverrides};

/// Edit commands. Every command compiles to a single [`Splice`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertBlock {
        at: usize,
        block_type: BlockType,
        text: String,
    },
    InsertBlocks {
        at: usize,
        blocks: Vec<Block>,
    },
    /// Insert an empty opener/footer pair.
    InsertGroup {
        at: usize,
        kind: GroupKind,
        title: String,
    },
    /// Wrap existing blocks in a new group.
    WrapInGroup {
        range: Range<usize>,
        kind: GroupKind,
        title: String,
    },
    DeleteBlock {
        at: usize,
    },
    DeleteRange {
        range: Range<usize>,
    },
    /// Replace a range with new blocks in one step.
    ReplaceRange {
        range: Range<usize>,
        blocks: Vec<Block>,
    },
    SetBlockType {
        at: usize,
        block_type: BlockType,
    },
    SetText {
        at: usize,
        text: String,
    },
    SetStyleOverrides {
        at: usize,
        overrides: StyleOverrides,
    },
    SetColorTag {
        at: usize,
        color: Option<String>,
    },
    SetDraft {
        at: usize,
        is_draft: bool,
    },
    /// Move `range` so it starts at `dest` (an index in the current document).
    MoveRange {
        range: Range<usize>,
        dest: usize,
    },
    AddReviewMark {
        at: usize,
        mark: ReviewMark,
    },
    SetReviewDone {
        at: usize,
        id: ReviewMarkId,
        done: bool,
    },
    ReplyToReview {
        at: usize,
        id: ReviewMarkId,
        reply: Comment,
    },
    RemoveReviewMark {
        at: usize,
        id: ReviewMarkId,
    },
}

/// Replace `range` of the current blocks with `blocks`.
#[derive(Debug, Clone, PartialEq)]
pub struct Splice {
    pub range: Range<usize>,
    pub blocks: Vec<Block>,
}

impl Splice {
    fn single(at: usize, block: Block) -> Self {
        Self {
            range: at..at + 1,
            blocks: vec![block],
        }
    }

    /// Whether the splice can change group nesting.
    pub(crate) fn touches_structure(&self, current: &[Block]) -> bool {
        current[self.range.clone()]
            .iter()
            .chain(self.blocks.iter())
            .any(|b| b.block_type.is_structural())
    }
}

pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Result<Splice, EditError> {
    let blocks = doc.blocks();
    let len = blocks.len();

    match cmd {
        Cmd::InsertBlock {
            at,
            block_type,
            text,
        } => {
            check_insert(*at, len)?;
            Ok(Splice {
                range: *at..*at,
                blocks: vec![Block::new(*block_type, text.clone())],
            })
        }
        Cmd::InsertBlocks { at, blocks } => {
            check_insert(*at, len)?;
            Ok(Splice {
                range: *at..*at,
                blocks: blocks.clone(),
            })
        }
        Cmd::InsertGroup { at, kind, title } => {
            check_insert(*at, len)?;
            Ok(Splice {
                range: *at..*at,
                blocks: vec![
                    Block::new(kind.opener(), title.clone()),
                    Block::new(kind.footer(), ""),
                ],
            })
        }
        Cmd::WrapInGroup { range, kind, title } => {
            check_range(range, len)?;
            let mut wrapped = Vec::with_capacity(range.len() + 2);
            wrapped.push(Block::new(kind.opener(), title.clone()));
            wrapped.extend_from_slice(&blocks[range.clone()]);
            wrapped.push(Block::new(kind.footer(), ""));
            Ok(Splice {
                range: range.clone(),
                blocks: wrapped,
            })
        }
        Cmd::DeleteBlock { at } => {
            check_position(*at, len)?;
            Ok(Splice {
                range: *at..*at + 1,
                blocks: Vec::new(),
            })
        }
        Cmd::DeleteRange { range } => {
            check_range(range, len)?;
            Ok(Splice {
                range: range.clone(),
                blocks: Vec::new(),
            })
        }
        Cmd::ReplaceRange { range, blocks } => {
            check_range(range, len)?;
            Ok(Splice {
                range: range.clone(),
                blocks: blocks.clone(),
            })
        }
        Cmd::SetBlockType { at, block_type } => modify(blocks, *at, |b| {
            b.block_type = *block_type;
            Ok(())
        }),
        Cmd::SetText { at, text } => modify(blocks, *at, |b| {
            b.replace_text(text.clone());
            Ok(())
        }),
        Cmd::SetStyleOverrides { at, overrides } => modify(blocks, *at, |b| {
            b.style_overrides = overrides.clone();
            Ok(())
        }),
        Cmd::SetColorTag { at, color } => modify(blocks, *at, |b| {
            b.color_tag = color.clone();
            Ok(())
        }),
        Cmd::SetDraft { at, is_draft } => modify(blocks, *at, |b| {
            b.is_draft = *is_draft;
            Ok(())
        }),
        Cmd::MoveRange { range, dest } => compile_move(blocks, range, *dest),
        Cmd::AddReviewMark { at, mark } => modify(blocks, *at, |b| {
            let mut mark = mark.clone();
            let text_len = b.char_len();
            if mark.range.start >= mark.range.end || !mark.clamp_to(text_len) {
                return Err(EditError::InvalidRange {
                    start: mark.range.start,
                    end: mark.range.end,
                    len: text_len,
                });
            }
            b.review_marks.push(mark);
            Ok(())
        }),
        Cmd::SetReviewDone { at, id, done } => modify(blocks, *at, |b| {
            find_mark(b, *id)?.is_done = *done;
            Ok(())
        }),
        Cmd::ReplyToReview { at, id, reply } => modify(blocks, *at, |b| {
            find_mark(b, *id)?.replies.push(reply.clone());
            Ok(())
        }),
        Cmd::RemoveReviewMark { at, id } => modify(blocks, *at, |b| {
            let before = b.review_marks.len();
            b.review_marks.retain(|m| m.id != *id);
            if b.review_marks.len() == before {
                return Err(EditError::ReviewMarkNotFound(*id));
            }
            Ok(())
        }),
    }
}

fn modify<F>(blocks: &[Block], at: usize, f: F) -> Result<Splice, EditError>
where
    F: FnOnce(&mut Block) -> Result<(), EditError>,
{
    check_position(at, blocks.len())?;
    let mut block = blocks[at].clone();
    f(&mut block)?;
    Ok(Splice::single(at, block))
}

fn find_mark(block: &mut Block, id: ReviewMarkId) -> Result<&mut ReviewMark, EditError> {
    block
        .review_marks
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or(EditError::ReviewMarkNotFound(id))
}

/// A move rewrites the span between the moved blocks and the destination.
fn compile_move(blocks: &[Block], range: &Range<usize>, dest: usize) -> Result<Splice, EditError> {
    check_range(range, blocks.len())?;
    check_insert(dest, blocks.len())?;
    if range.start < dest && dest < range.end {
        return Err(EditError::InvalidMove {
            start: range.start,
            end: range.end,
            dest,
        });
    }

    let moved = &blocks[range.clone()];
    if dest <= range.start {
        let mut span = moved.to_vec();
        span.extend_from_slice(&blocks[dest..range.start]);
        Ok(Splice {
            range: dest..range.end,
            blocks: span,
        })
    } else {
        let mut span = blocks[range.end..dest].to_vec();
        span.extend_from_slice(moved);
        Ok(Splice {
            range: range.start..dest,
            blocks: span,
        })
    }
}

fn check_position(at: usize, len: usize) -> Result<(), EditError> {
    if at >= len {
        return Err(EditError::OutOfBounds { position: at, len });
    }
    Ok(())
}

fn check_insert(at: usize, len: usize) -> Result<(), EditError> {
    if at > len {
        return Err(EditError::OutOfBounds { position: at, len });
    }
    Ok(())
}

fn check_range(range: &Range<usize>, len: usize) -> Result<(), EditError> {
    if range.start > range.end || range.end > len {
        return Err(EditError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}
