use crate::editing::{Document, EditError};
use crate::models::{Block, ScriptInfo};

/// Frozen copy of a document at one version.
///
/// Background jobs and renderers read from snapshots so the live document can
/// keep changing underneath them.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub version: u64,
    pub blocks: Vec<Block>,
    pub info: ScriptInfo,
}

impl DocumentSnapshot {
    /// Rebuild a standalone document (version 0) from the snapshot.
    pub fn to_document(&self) -> Result<Document, EditError> {
        let mut doc = Document::from_blocks(self.blocks.clone())?;
        doc.info = self.info.clone();
        Ok(doc)
    }
}
