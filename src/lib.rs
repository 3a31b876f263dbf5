//! Fibonacci memoization comparison plot
//!
//! Loads two timing tables (with and without memoization), brings the
//! memoized timings to seconds and renders both as one scatter chart.
//!
//! Module organization:
//! - `timing`: timing tables, plot properties, colors
//! - `render`: chart description and plotters rendering
//! - `config`: plot configuration
//! - `pipeline`: load → rescale → render

pub mod config;
pub mod pipeline;
pub mod render;
pub mod timing;
