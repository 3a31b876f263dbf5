use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a timing table
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The file does not exist
    #[error("{}: file not found", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read
    #[error("{}: failed to read file", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file (empty file, ragged rows, bad encoding)
    #[error("{}: malformed CSV", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    /// A required column is absent from the header row
    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A required column appears more than once in the header row
    #[error("{}: column '{column}' appears more than once", path.display())]
    DuplicateColumn { path: PathBuf, column: String },

    /// A cell could not be converted to the column's type
    #[error(
        "{}:{line}: column '{column}': expected {expected}, found '{value}'",
        path.display()
    )]
    InvalidValue {
        path: PathBuf,
        /// 1-based line in the file (the header is line 1)
        line: usize,
        column: String,
        value: String,
        expected: &'static str,
    },
}

impl DataLoadError {
    /// Path of the file that failed to load
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::Csv { path, .. }
            | Self::MissingColumn { path, .. }
            | Self::DuplicateColumn { path, .. }
            | Self::InvalidValue { path, .. } => path,
        }
    }
}

/// Errors that can occur while resolving plot configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not a JSON object of properties
    #[error("Failed to parse config file {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `--set` argument without `=`
    #[error("Invalid property override '{0}', expected KEY=VALUE")]
    InvalidOverride(String),

    /// Property name not declared in plot.json
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    /// The memoized time divisor must be finite and non-zero
    #[error("Invalid memo.time.divisor {0}: must be finite and non-zero")]
    InvalidDivisor(f64),
}
