/*!
 * # Editing Core
 *
 * The document is a flat, ordered sequence of typed blocks. Folder and scene
 * group nesting is implicit: an opener block and its matching footer bracket
 * everything between them.
 *
 * ## Architecture Overview
 *
 * ### 1. Single source of truth
 * - [`Document`] owns the `Vec<Block>`; position is identity.
 * - No tree is stored. Depth, parents and boundaries are answered by scanning
 *   with a stack (see [`structure`]).
 *
 * ### 2. Command-based editing
 * - Every mutation is a [`Cmd`] passed to [`Document::apply`].
 * - A command compiles to one [`commands::Splice`]: replace a range of blocks
 *   with new ones. Moves, review edits and corrector output all use it.
 * - If the splice touches structural blocks, the resulting type sequence is
 *   simulated and checked for balance before anything is written. A failing
 *   edit leaves the document untouched.
 *
 * ### 3. Versions and patches
 * - Each applied edit bumps `version` and returns a [`Patch`] describing the
 *   splice in block indices.
 * - A bounded journal of recent patches lets incremental consumers (counters)
 *   catch up; if they fall too far behind they rebuild.
 *
 * ### 4. Read API
 * - [`Document::snapshot`] produces an immutable deep copy for background
 *   jobs and presentation.
 *
 * ```rust
 * use screenplay_engine::editing::{Cmd, Document};
 * use screenplay_engine::models::BlockType;
 *
 * let mut doc = Document::new();
 * doc.insert_block(0, BlockType::SceneHeading, "INT. HOUSE - DAY").unwrap();
 * let patch = doc.apply(Cmd::InsertBlock {
 *     at: 1,
 *     block_type: BlockType::Action,
 *     text: "Rain.".to_string(),
 * }).unwrap();
 * assert_eq!(patch.version, doc.version());
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;
pub mod snapshot;
pub mod structure;

pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;
pub use snapshot::DocumentSnapshot;
pub use structure::{Boundary, StructureViolation};

use crate::models::ReviewMarkId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Edit would unbalance the document structure: {0}")]
    UnbalancedStructure(StructureViolation),
    #[error("Position {position} is out of bounds for a document of {len} blocks")]
    OutOfBounds { position: usize, len: usize },
    #[error("Range {start}..{end} is invalid for a length of {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("Cannot move {start}..{end} to {dest} inside itself")]
    InvalidMove { start: usize, end: usize, dest: usize },
    #[error("Review mark {0:?} not found")]
    ReviewMarkNotFound(ReviewMarkId),
}
