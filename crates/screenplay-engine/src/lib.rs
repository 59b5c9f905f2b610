pub mod corrector;
pub mod counters;
pub mod editing;
pub mod errors;
pub mod exchange;
pub mod layout;
pub mod models;
pub mod reports;
pub mod scenes;
pub mod session;
pub mod template;
pub mod worker;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use counters::{ChronometryConfig, CounterEngine, CounterSnapshot};
pub use editing::{Cmd, Document, DocumentSnapshot, EditError, Patch};
pub use errors::EngineError;
pub use models::{Block, BlockType, GroupKind};
pub use session::{RenderSnapshot, ScriptSession};
pub use template::{Template, TemplateError};
