//! Balance checking and boundary discovery for folder/group pairs.
//!
//! Nesting is never cached: every question about structure is answered by a
//! single linear scan that keeps a stack of open groups.

use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockType, GroupKind};

/// Why a block sequence is not properly nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureViolation {
    /// A footer with no open group before it.
    UnexpectedFooter { position: usize, kind: GroupKind },
    /// A footer closing a different kind of group than the innermost open one.
    MismatchedFooter {
        position: usize,
        expected: GroupKind,
        found: GroupKind,
    },
    /// A group still open at the end of the document.
    UnclosedGroup { position: usize, kind: GroupKind },
}

impl std::fmt::Display for StructureViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureViolation::UnexpectedFooter { position, kind } => {
                write!(f, "{kind:?} footer at {position} has no opener")
            }
            StructureViolation::MismatchedFooter {
                position,
                expected,
                found,
            } => write!(
                f,
                "{found:?} footer at {position} closes an open {expected:?}"
            ),
            StructureViolation::UnclosedGroup { position, kind } => {
                write!(f, "{kind:?} opened at {position} is never closed")
            }
        }
    }
}

/// A matched opener/footer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub kind: GroupKind,
    pub open: usize,
    pub close: usize,
    /// 0 for top-level groups.
    pub depth: usize,
}

impl Boundary {
    /// Whether `position` lies strictly between the opener and the footer.
    pub fn contains(&self, position: usize) -> bool {
        self.open < position && position < self.close
    }
}

/// Check that every opener in `types` is closed by a matching footer.
pub fn check_balance<I>(types: I) -> Result<(), StructureViolation>
where
    I: IntoIterator<Item = BlockType>,
{
    let mut stack: Vec<(GroupKind, usize)> = Vec::new();

    for (position, block_type) in types.into_iter().enumerate() {
        if let Some(kind) = block_type.opens() {
            stack.push((kind, position));
        } else if let Some(kind) = block_type.closes() {
            match stack.pop() {
                Some((open_kind, _)) if open_kind == kind => {}
                Some((open_kind, _)) => {
                    return Err(StructureViolation::MismatchedFooter {
                        position,
                        expected: open_kind,
                        found: kind,
                    });
                }
                None => return Err(StructureViolation::UnexpectedFooter { position, kind }),
            }
        }
    }

    match stack.pop() {
        Some((kind, position)) => Err(StructureViolation::UnclosedGroup { position, kind }),
        None => Ok(()),
    }
}

/// All matched pairs, ordered by opener position.
pub fn all_boundaries(blocks: &[Block]) -> Vec<Boundary> {
    let mut stack: Vec<(GroupKind, usize)> = Vec::new();
    let mut found = Vec::new();

    for (position, block) in blocks.iter().enumerate() {
        let block_type = block.block_type;
        if let Some(kind) = block_type.opens() {
            stack.push((kind, position));
        } else if let Some(kind) = block_type.closes()
            && let Some(&(open_kind, open)) = stack.last()
            && open_kind == kind
        {
            stack.pop();
            found.push(Boundary {
                kind,
                open,
                close: position,
                depth: stack.len(),
            });
        }
    }

    found.sort_by_key(|b| b.open);
    found
}

/// Matched pairs of one kind, ordered by opener position.
pub fn find_boundaries(blocks: &[Block], kind: GroupKind) -> Vec<Boundary> {
    all_boundaries(blocks)
        .into_iter()
        .filter(|b| b.kind == kind)
        .collect()
}

/// Number of groups open at `position` (a footer counts as inside its group).
pub fn depth_at(blocks: &[Block], position: usize) -> usize {
    let mut depth: usize = 0;
    for block in blocks.iter().take(position) {
        if block.block_type.opens().is_some() {
            depth += 1;
        } else if block.block_type.closes().is_some() {
            depth = depth.saturating_sub(1);
        }
    }
    depth
}
