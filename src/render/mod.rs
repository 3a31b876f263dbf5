//! Chart construction and rendering
//!
//! - `chart.rs`: backend-independent description of the comparison chart
//! - `backend.rs`: drawing a chart with plotters (SVG, PNG with `bitmap`)
//! - `error.rs`: Error types

pub mod backend;
pub mod chart;
pub mod error;

pub use backend::{render, render_svg_string, OutputFormat, OutputTarget, RenderedPlot};
pub use chart::{ChartSpec, LegendEntry, MarkerShape, Series};
pub use error::RenderError;
