pub mod block;
pub mod block_type;
pub mod locale;
pub mod review;
pub mod title_page;

pub use block::{Block, Decoration, StyleOverrides};
pub use block_type::{BlockType, GroupKind};
pub use locale::Locale;
pub use review::{Comment, ReviewKind, ReviewMark, ReviewMarkId};
pub use title_page::{ScriptInfo, TitleAlign, TitleLine};
