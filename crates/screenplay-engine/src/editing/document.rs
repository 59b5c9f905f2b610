use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::Range;

use crate::editing::commands::{self, Cmd, Splice};
use crate::editing::structure::{self, Boundary};
use crate::editing::{DocumentSnapshot, EditError, Patch};
use crate::models::{
    Block, BlockType, Comment, GroupKind, ReviewMark, ReviewMarkId, ScriptInfo, StyleOverrides,
};

/// Patches kept for incremental consumers.
const JOURNAL_CAPACITY: usize = 256;

/// Screenplay document: an ordered block sequence with balanced group nesting.
///
/// All mutation goes through [`Document::apply`]; the convenience methods
/// below build a [`Cmd`] and apply it. A rejected edit leaves the document
/// exactly as it was.
///
/// ```rust
/// use screenplay_engine::editing::{Document, EditError};
/// use screenplay_engine::models::{BlockType, GroupKind};
///
/// let mut doc = Document::new();
/// doc.insert_group(0, GroupKind::Folder, "ACT ONE").unwrap();
/// doc.insert_block(1, BlockType::SceneHeading, "INT. HOUSE - DAY").unwrap();
///
/// // Removing the opener alone would orphan the footer.
/// assert!(matches!(
///     doc.delete_block(0),
///     Err(EditError::UnbalancedStructure(_))
/// ));
/// assert_eq!(doc.len(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DocumentFile", into = "DocumentFile")]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) info: ScriptInfo,
    /// Incremented on every applied edit.
    pub(crate) version: u64,
    pub(crate) journal: VecDeque<Patch>,
}

/// Persisted shape: version and journal are session state.
#[derive(Serialize, Deserialize)]
struct DocumentFile {
    #[serde(default)]
    info: ScriptInfo,
    #[serde(default)]
    blocks: Vec<Block>,
}

impl TryFrom<DocumentFile> for Document {
    type Error = EditError;

    fn try_from(file: DocumentFile) -> Result<Self, Self::Error> {
        let mut doc = Document::from_blocks(file.blocks)?;
        doc.info = file.info;
        Ok(doc)
    }
}

impl From<Document> for DocumentFile {
    fn from(doc: Document) -> Self {
        DocumentFile {
            info: doc.info,
            blocks: doc.blocks,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            info: ScriptInfo::default(),
            version: 0,
            journal: VecDeque::new(),
        }
    }

    /// Build a document from blocks, rejecting unbalanced nesting.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, EditError> {
        structure::check_balance(blocks.iter().map(|b| b.block_type))
            .map_err(EditError::UnbalancedStructure)?;
        Ok(Self {
            blocks,
            ..Self::new()
        })
    }

    /// Load a document saved with [`Document::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let doc: Document = serde_json::from_str(text)?;
        log::info!("Loaded document with {} blocks", doc.blocks.len());
        Ok(doc)
    }

    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn info(&self) -> &ScriptInfo {
        &self.info
    }

    /// Replace the title-page data. Bumps the version without touching blocks.
    pub fn set_info(&mut self, info: ScriptInfo) -> Patch {
        self.info = info;
        self.record(0..0, 0)
    }

    /// Apply a command atomically.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let splice = self.compile_command(&cmd).inspect_err(|e| {
            log::warn!("Rejected {cmd:?}: {e}");
        })?;
        self.apply_splice(splice)
    }

    pub(crate) fn compile_command(&self, cmd: &Cmd) -> Result<Splice, EditError> {
        commands::compile_command(self, cmd)
    }

    /// Validate and write a splice.
    pub(crate) fn apply_splice(&mut self, splice: Splice) -> Result<Patch, EditError> {
        let Splice { range, blocks } = splice;

        let structural = self.blocks[range.clone()]
            .iter()
            .chain(blocks.iter())
            .any(|b| b.block_type.is_structural());
        if structural {
            let simulated = self.blocks[..range.start]
                .iter()
                .chain(blocks.iter())
                .chain(self.blocks[range.end..].iter())
                .map(|b| b.block_type);
            if let Err(violation) = structure::check_balance(simulated) {
                log::warn!("Rejected edit at {range:?}: {violation}");
                return Err(EditError::UnbalancedStructure(violation));
            }
        }

        let start = range.start;
        let replaced = range.len();
        let inserted = blocks.len();
        self.blocks.splice(range, blocks);
        Ok(self.record(start..start + inserted, replaced))
    }

    fn record(&mut self, changed: Range<usize>, replaced: usize) -> Patch {
        self.version += 1;
        let patch = Patch {
            changed,
            replaced,
            version: self.version,
        };
        log::debug!(
            "Applied edit v{}: {:?} replacing {} blocks",
            patch.version,
            patch.changed,
            patch.replaced
        );
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(patch.clone());
        patch
    }

    /// Patches applied after `version`, oldest first.
    ///
    /// `None` when the journal no longer reaches back that far.
    pub fn patches_since(&self, version: u64) -> Option<impl Iterator<Item = &Patch>> {
        if version > self.version {
            return None;
        }
        let reachable = version == self.version
            || self
                .journal
                .front()
                .is_some_and(|oldest| oldest.version <= version + 1);
        if !reachable {
            return None;
        }
        Some(self.journal.iter().filter(move |p| p.version > version))
    }

    pub fn insert_block(
        &mut self,
        position: usize,
        block_type: BlockType,
        text: impl Into<String>,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::InsertBlock {
            at: position,
            block_type,
            text: text.into(),
        })
    }

    pub fn insert_blocks(&mut self, position: usize, blocks: Vec<Block>) -> Result<Patch, EditError> {
        self.apply(Cmd::InsertBlocks {
            at: position,
            blocks,
        })
    }

    pub fn insert_group(
        &mut self,
        position: usize,
        kind: GroupKind,
        title: impl Into<String>,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::InsertGroup {
            at: position,
            kind,
            title: title.into(),
        })
    }

    pub fn delete_block(&mut self, position: usize) -> Result<Patch, EditError> {
        self.apply(Cmd::DeleteBlock { at: position })
    }

    pub fn delete_range(&mut self, range: Range<usize>) -> Result<Patch, EditError> {
        self.apply(Cmd::DeleteRange { range })
    }

    pub fn set_block_type(
        &mut self,
        position: usize,
        block_type: BlockType,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::SetBlockType {
            at: position,
            block_type,
        })
    }

    pub fn set_text(&mut self, position: usize, text: impl Into<String>) -> Result<Patch, EditError> {
        self.apply(Cmd::SetText {
            at: position,
            text: text.into(),
        })
    }

    pub fn set_style_overrides(
        &mut self,
        position: usize,
        overrides: StyleOverrides,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::SetStyleOverrides {
            at: position,
            overrides,
        })
    }

    pub fn move_range(&mut self, range: Range<usize>, dest: usize) -> Result<Patch, EditError> {
        self.apply(Cmd::MoveRange { range, dest })
    }

    pub fn add_review_mark(
        &mut self,
        position: usize,
        mark: ReviewMark,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::AddReviewMark { at: position, mark })
    }

    pub fn set_review_done(
        &mut self,
        position: usize,
        id: ReviewMarkId,
        done: bool,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::SetReviewDone {
            at: position,
            id,
            done,
        })
    }

    pub fn reply_to_review(
        &mut self,
        position: usize,
        id: ReviewMarkId,
        reply: Comment,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::ReplyToReview {
            at: position,
            id,
            reply,
        })
    }

    pub fn remove_review_mark(
        &mut self,
        position: usize,
        id: ReviewMarkId,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::RemoveReviewMark { at: position, id })
    }

    /// Blocks in `range`, clamped to the document. The iterator is `Clone`,
    /// so it can be restarted without touching the document again.
    pub fn iterate(&self, range: Range<usize>) -> std::slice::Iter<'_, Block> {
        let end = range.end.min(self.blocks.len());
        let start = range.start.min(end);
        self.blocks[start..end].iter()
    }

    /// Opener/footer pairs of one kind, in document order.
    pub fn find_boundaries(&self, kind: GroupKind) -> Vec<Boundary> {
        structure::find_boundaries(&self.blocks, kind)
    }

    /// Innermost group strictly enclosing `position`.
    pub fn parent_group(&self, position: usize) -> Option<Boundary> {
        structure::all_boundaries(&self.blocks)
            .into_iter()
            .filter(|b| b.contains(position))
            .max_by_key(|b| b.depth)
    }

    pub fn depth_at(&self, position: usize) -> usize {
        structure::depth_at(&self.blocks, position)
    }

    /// Immutable deep copy for background work and rendering.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            version: self.version,
            blocks: self.blocks.clone(),
            info: self.info.clone(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewKind;
    use pretty_assertions::assert_eq;
    use BlockType::*;

    fn types(doc: &Document) -> Vec<BlockType> {
        doc.blocks().iter().map(|b| b.block_type).collect()
    }

    fn sample() -> Document {
        Document::from_blocks(vec![
            Block::new(Folder, "ACT ONE"),
            Block::new(SceneHeading, "INT. HOUSE - DAY"),
            Block::new(Character, "JOHN"),
            Block::new(Dialogue, "Hello there."),
            Block::new(FolderFooter, ""),
            Block::new(Action, "Outside, rain."),
        ])
        .unwrap()
    }

    #[test]
    fn test_deleting_folder_opener_is_rejected_and_document_unchanged() {
        let mut doc = sample();
        let before = doc.blocks().to_vec();

        let err = doc.delete_block(0).unwrap_err();

        assert!(matches!(err, EditError::UnbalancedStructure(_)));
        assert_eq!(doc.blocks(), before.as_slice());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_deleting_whole_group_is_allowed() {
        let mut doc = sample();
        let patch = doc.delete_range(0..5).unwrap();
        assert_eq!(types(&doc), vec![Action]);
        assert_eq!(patch.changed, 0..0);
        assert_eq!(patch.replaced, 5);
    }

    #[test]
    fn test_text_edits_bump_version_and_journal() {
        let mut doc = sample();
        let p1 = doc.set_text(3, "Hi.").unwrap();
        let p2 = doc.insert_block(5, Transition, "CUT TO:").unwrap();

        assert_eq!(p1.version, 1);
        assert_eq!(p1.changed, 3..4);
        assert_eq!(p1.replaced, 1);
        assert_eq!(p2.version, 2);
        assert_eq!(p2.len_delta(), 1);

        let since: Vec<_> = doc.patches_since(0).unwrap().cloned().collect();
        assert_eq!(since, vec![p1, p2.clone()]);
        let since: Vec<_> = doc.patches_since(1).unwrap().cloned().collect();
        assert_eq!(since, vec![p2]);
        assert_eq!(doc.patches_since(2).unwrap().count(), 0);
        assert!(doc.patches_since(3).is_none());
    }

    #[test]
    fn test_journal_is_bounded() {
        let mut doc = Document::from_blocks(vec![Block::new(Action, "")]).unwrap();
        for i in 0..(JOURNAL_CAPACITY + 10) {
            doc.set_text(0, format!("{i}")).unwrap();
        }
        assert!(doc.patches_since(0).is_none());
        assert!(doc.patches_since(doc.version() - 5).is_some());
    }

    #[test]
    fn test_changing_footer_type_is_rejected() {
        let mut doc = sample();
        assert!(doc.set_block_type(4, SceneGroupFooter).is_err());
        assert!(doc.set_block_type(2, Action).is_ok());
    }

    #[test]
    fn test_move_range_keeps_balance() {
        let mut doc = sample();
        // Moving the trailing action into the folder is fine.
        doc.move_range(5..6, 1).unwrap();
        assert_eq!(
            types(&doc),
            vec![Folder, Action, SceneHeading, Character, Dialogue, FolderFooter]
        );

        // Moving the opener past its footer is not.
        let before = doc.blocks().to_vec();
        assert!(matches!(
            doc.move_range(0..1, 6),
            Err(EditError::UnbalancedStructure(_))
        ));
        assert_eq!(doc.blocks(), before.as_slice());
    }

    #[test]
    fn test_insert_and_wrap_groups() {
        let mut doc = sample();
        doc.apply(Cmd::WrapInGroup {
            range: 1..4,
            kind: GroupKind::SceneGroup,
            title: "Opening".into(),
        })
        .unwrap();

        assert_eq!(
            types(&doc),
            vec![
                Folder,
                SceneGroup,
                SceneHeading,
                Character,
                Dialogue,
                SceneGroupFooter,
                FolderFooter,
                Action
            ]
        );
        let groups = doc.find_boundaries(GroupKind::SceneGroup);
        assert_eq!(groups.len(), 1);
        assert_eq!((groups[0].open, groups[0].close, groups[0].depth), (1, 5, 1));

        let parent = doc.parent_group(3).unwrap();
        assert_eq!(parent.kind, GroupKind::SceneGroup);
        assert_eq!(doc.parent_group(1).unwrap().kind, GroupKind::Folder);
        assert!(doc.parent_group(7).is_none());
        assert_eq!(doc.depth_at(3), 2);

        doc.insert_group(8, GroupKind::Folder, "ACT TWO").unwrap();
        assert_eq!(doc.find_boundaries(GroupKind::Folder).len(), 2);
    }

    #[test]
    fn test_iterate_is_restartable_and_clamped() {
        let doc = sample();
        let iter = doc.iterate(1..4);
        let first: Vec<_> = iter.clone().map(|b| b.block_type).collect();
        let second: Vec<_> = iter.map(|b| b.block_type).collect();
        assert_eq!(first, vec![SceneHeading, Character, Dialogue]);
        assert_eq!(first, second);

        assert_eq!(doc.iterate(4..100).count(), 2);
        assert_eq!(doc.iterate(50..100).count(), 0);
    }

    #[test]
    fn test_review_mark_lifecycle() {
        let mut doc = sample();
        let mark = ReviewMark::new(0..5, ReviewKind::Comment, "editor");
        let id = mark.id;

        doc.add_review_mark(3, mark).unwrap();
        doc.set_review_done(3, id, true).unwrap();
        doc.reply_to_review(
            3,
            id,
            Comment {
                author: "writer".into(),
                text: "Fixed".into(),
            },
        )
        .unwrap();

        let stored = &doc.get(3).unwrap().review_marks[0];
        assert!(stored.is_done);
        assert_eq!(stored.replies.len(), 1);

        doc.remove_review_mark(3, id).unwrap();
        assert!(doc.get(3).unwrap().review_marks.is_empty());
        assert_eq!(
            doc.remove_review_mark(3, id),
            Err(EditError::ReviewMarkNotFound(id))
        );
    }

    #[test]
    fn test_empty_review_range_is_rejected() {
        let mut doc = sample();
        let mark = ReviewMark::new(20..40, ReviewKind::Highlight, "editor");
        assert!(matches!(
            doc.add_review_mark(3, mark),
            Err(EditError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_validates_balance() {
        let doc = sample();
        let bytes = doc.to_bytes().unwrap();
        let loaded = Document::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.blocks(), doc.blocks());
        assert_eq!(loaded.version(), 0);

        let broken = r#"{"blocks":[{"block_type":"folder","text":"A"}]}"#;
        assert!(Document::from_bytes(broken.as_bytes()).is_err());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut doc = sample();
        let snapshot = doc.snapshot();
        doc.set_text(3, "Changed.").unwrap();
        assert_eq!(snapshot.blocks[3].text, "Hello there.");
        assert_eq!(snapshot.version, 0);
    }

    #[test]
    fn test_set_info_bumps_version() {
        let mut doc = sample();
        let patch = doc.set_info(ScriptInfo {
            name: "Rain".into(),
            ..ScriptInfo::default()
        });
        assert!(patch.is_empty());
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.info().name, "Rain");
    }
}
