use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing the chart
#[derive(Debug, Error)]
pub enum RenderError {
    /// No output path configured and no interactive display available
    #[error("No output configured: set output.path to write the chart to a file")]
    NoOutput,

    /// Output format not compiled into this build
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The plotting backend failed while drawing or writing the chart
    #[error("Plotting backend error: {0}")]
    Backend(String),

    /// The rendered file could not be inspected
    #[error("Failed to read rendered chart {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
