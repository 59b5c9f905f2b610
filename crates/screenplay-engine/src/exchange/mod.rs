//! Block-sequence contract shared with format converters.
//!
//! Converters see a flat list of records. Group and folder openers are plain
//! blocks; the matching footers travel as sentinels, so a converter never has
//! to invent footer text. Corrector markers never leave the engine: export
//! joins split dialogue back together.

use serde::{Deserialize, Serialize};

use crate::corrector::continuity::strip_decorations_while;
use crate::editing::{Document, EditError};
use crate::models::{Block, BlockType, StyleOverrides};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum BlockRecord {
    Block {
        block_type: BlockType,
        text: String,
        #[serde(default, skip_serializing_if = "StyleOverrides::is_empty")]
        style_overrides: StyleOverrides,
    },
    EndOfGroup,
    EndOfFolder,
}

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Imported blocks are not balanced: {0}")]
    Structure(#[from] EditError),
    #[error("Invalid block-sequence JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        match block.block_type {
            BlockType::SceneGroupFooter => BlockRecord::EndOfGroup,
            BlockType::FolderFooter => BlockRecord::EndOfFolder,
            block_type => BlockRecord::Block {
                block_type,
                text: block.text.clone(),
                style_overrides: block.style_overrides.clone(),
            },
        }
    }
}

impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        match record {
            BlockRecord::Block {
                block_type,
                text,
                style_overrides,
            } => Block::new(block_type, text).with_overrides(style_overrides),
            BlockRecord::EndOfGroup => Block::new(BlockType::SceneGroupFooter, ""),
            BlockRecord::EndOfFolder => Block::new(BlockType::FolderFooter, ""),
        }
    }
}

/// The document as converter records, with continuity markers removed.
pub fn export(doc: &Document) -> Vec<BlockRecord> {
    export_while(doc.blocks(), || true).unwrap_or_default()
}

/// [`export`] over a block slice, polling `keep_going` once per block in each
/// pass. Returns `None` as soon as it answers false.
pub fn export_while(
    blocks: &[Block],
    mut keep_going: impl FnMut() -> bool,
) -> Option<Vec<BlockRecord>> {
    let (blocks, _) = strip_decorations_while(blocks, &mut keep_going)?;
    let mut records = Vec::with_capacity(blocks.len());
    for block in &blocks {
        if !keep_going() {
            return None;
        }
        records.push(BlockRecord::from(block));
    }
    Some(records)
}

/// Build a document from converter records. Unbalanced input is rejected.
pub fn import(records: impl IntoIterator<Item = BlockRecord>) -> Result<Document, ExchangeError> {
    let blocks: Vec<Block> = records.into_iter().map(Block::from).collect();
    let count = blocks.len();
    let doc = Document::from_blocks(blocks)?;
    log::debug!("Imported {count} blocks");
    Ok(doc)
}

pub fn to_json(records: &[BlockRecord]) -> Result<String, ExchangeError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn from_json(json: &str) -> Result<Vec<BlockRecord>, ExchangeError> {
    Ok(serde_json::from_str(json)?)
}
