//! Timing data module
//!
//! Everything needed to turn the benchmark CSV files into typed tables and
//! to resolve the plot properties that drive the chart.
//!
//! Structure:
//! - `table.rs`: `TimingRecord` / `TimingTable`, CSV loading and rescaling
//! - `properties.rs`: property registry from plot.json and typed reader
//! - `colors.rs`: color name / hex parsing
//! - `error.rs`: Error types

pub mod colors;
pub mod error;
pub mod properties;
pub mod table;

// Re-exports for convenience
pub use colors::parse_color;
pub use error::{ConfigError, DataLoadError};
pub use properties::{registry, PropertyReader};
pub use table::{TimingRecord, TimingTable, MEMO_TIME_DIVISOR};
