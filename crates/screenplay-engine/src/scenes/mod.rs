//! Scene segmentation: headings, locations and the characters in each scene.
//!
//! Everything here is a pure function of the block sequence. The
//! [`SceneCache`] only saves recomputation between edits.

pub mod cache;
pub mod character;
pub mod heading;
pub mod segmenter;

pub use cache::SceneCache;
pub use character::normalize_name;
pub use heading::{Location, Place, TimeOfDay, UNDEFINED};
pub use segmenter::{segment, Scene, Scenes};
