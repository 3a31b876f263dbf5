//! Timing tables loaded from benchmark CSV files
//!
//! Each file has a header row naming the columns `n` and `time`; every
//! subsequent row is one measurement. Cells are read as strings through
//! Polars and converted here so that a bad cell can be reported with its
//! line and column.

use super::error::DataLoadError;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Divisor that converts the memoized series' `time` column to seconds.
///
/// The input files carry no unit metadata; the memoized benchmark reports
/// milliseconds, so its values are divided by this constant before plotting.
pub const MEMO_TIME_DIVISOR: f64 = 1000.0;

/// Column holding the Fibonacci input size
pub const N_COLUMN: &str = "n";

/// Column holding the elapsed time
pub const TIME_COLUMN: &str = "time";

/// One measurement: input size and elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingRecord {
    pub n: u64,
    pub time: f64,
}

/// Ordered sequence of measurements from one CSV file
#[derive(Debug, Clone, PartialEq)]
pub struct TimingTable {
    /// File the records were loaded from (used in diagnostics)
    source: PathBuf,
    records: Vec<TimingRecord>,
}

impl TimingTable {
    /// Create a table from records already in memory
    pub fn new(source: impl Into<PathBuf>, records: Vec<TimingRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    /// Load a comma-delimited file with a header row containing `n` and `time`
    ///
    /// Extra columns are ignored. A file with only a header loads as an empty
    /// table. The file handle is released before this returns, on success or
    /// failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();

        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(DataLoadError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("not a regular file"),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataLoadError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(DataLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        // Schema inference disabled: every column arrives as String
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|source| DataLoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        let n_values = string_column(&df, path, N_COLUMN)?;
        let time_values = string_column(&df, path, TIME_COLUMN)?;

        let mut records = Vec::with_capacity(df.height());
        for (row, (n_cell, time_cell)) in n_values.into_iter().zip(time_values).enumerate() {
            // Header occupies line 1
            let line = row + 2;
            if is_blank(n_cell) && is_blank(time_cell) {
                continue;
            }
            let n = parse_cell(path, line, N_COLUMN, n_cell, "a non-negative integer", |s| {
                s.parse::<u64>().ok()
            })?;
            let time = parse_cell(path, line, TIME_COLUMN, time_cell, "a finite number", |s| {
                s.parse::<f64>().ok().filter(|v| v.is_finite())
            })?;
            records.push(TimingRecord { n, time });
        }

        tracing::debug!(path = %path.display(), rows = records.len(), "loaded timing table");

        Ok(Self {
            source: path.to_path_buf(),
            records,
        })
    }

    /// Return a copy with every `time` divided by `divisor`
    ///
    /// `n` values and record order are preserved.
    pub fn rescale(&self, divisor: f64) -> TimingTable {
        let mut rescaled = self.clone();
        rescaled.rescale_in_place(divisor);
        rescaled
    }

    /// Divide every `time` by `divisor` in place
    pub fn rescale_in_place(&mut self, divisor: f64) {
        for record in &mut self.records {
            record.time /= divisor;
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimingRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest `n`, None for an empty table
    pub fn n_range(&self) -> Option<(u64, u64)> {
        let min = self.records.iter().map(|r| r.n).min()?;
        let max = self.records.iter().map(|r| r.n).max()?;
        Some((min, max))
    }

    /// Smallest and largest `time`, None for an empty table
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.records.iter().fold(None, |acc, r| match acc {
            None => Some((r.time, r.time)),
            Some((lo, hi)) => Some((lo.min(r.time), hi.max(r.time))),
        })
    }

    /// Records as (n, time) points for plotting
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.records.iter().map(|r| (r.n as f64, r.time)).collect()
    }
}

impl<'a> IntoIterator for &'a TimingTable {
    type Item = &'a TimingRecord;
    type IntoIter = std::slice::Iter<'a, TimingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Blank lines come back from the reader as rows of nulls
fn is_blank(cell: Option<&str>) -> bool {
    cell.map_or(true, |s| s.trim().is_empty())
}

/// Look up a column by name (header cells are compared trimmed)
///
/// A name given twice is rejected. The CSV reader may keep repeated
/// headers under a `<name>_duplicated_<i>` alias, which counts as well.
fn string_column<'a>(
    df: &'a DataFrame,
    path: &Path,
    name: &str,
) -> Result<&'a StringChunked, DataLoadError> {
    let alias = format!("{name}_duplicated_");
    let mut matches = df.get_columns().iter().filter(|c| {
        let header = c.name().as_str().trim();
        header == name || header.starts_with(&alias)
    });

    let column = matches.next().ok_or_else(|| DataLoadError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })?;
    if matches.next().is_some() {
        return Err(DataLoadError::DuplicateColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        });
    }

    column
        .as_materialized_series()
        .str()
        .map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_cell<T>(
    path: &Path,
    line: usize,
    column: &str,
    cell: Option<&str>,
    expected: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, DataLoadError> {
    let raw = cell.unwrap_or("").trim();
    parse(raw).ok_or_else(|| DataLoadError::InvalidValue {
        path: path.to_path_buf(),
        line,
        column: column.to_string(),
        value: raw.to_string(),
        expected,
    })
}
