//! Word wrapping and line-based pagination.
//!
//! Layout is a pure function of the blocks and the template: monospaced lines
//! per block, top spacing dropped at the top of a page, and dialogue split
//! across pages with room for the continuity markers.

pub mod paginator;
pub mod wrap;

pub use paginator::{LayoutState, PageBreak, PageLayout, Placement};
