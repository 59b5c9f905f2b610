//! Chronometry and counters: words, characters, pages and screen time.

pub mod chronometry;
pub mod engine;
pub mod metrics;

pub use chronometry::{ChronometryConfig, ChronometryError};
pub use engine::{CounterEngine, CounterSnapshot};
pub use metrics::BlockMetrics;
