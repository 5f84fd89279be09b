//! Tabular output: CSV, TSV, and JSON. Consumes the extracted records and writes one file.

use crate::model::BookRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output format selector for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

/// Errors from the record writers.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to write output: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write JSON: {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What a successful call to [write_records] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No records; no file was touched.
    Skipped,
    /// File created or overwritten with this many data rows.
    Written { rows: usize },
}

/// Write records to `path` with a header row, creating or overwriting the file.
///
/// An empty slice is a no-op. Failures are logged here and also returned, so callers can
/// carry on without re-logging.
pub fn write_records(
    records: &[BookRecord],
    path: &Path,
    format: OutputFormat,
) -> Result<WriteOutcome, FormatError> {
    if records.is_empty() {
        tracing::warn!("No data to save.");
        return Ok(WriteOutcome::Skipped);
    }
    let result = match format {
        OutputFormat::Csv => write_delimited(records, path, b','),
        OutputFormat::Tsv => write_delimited(records, path, b'\t'),
        OutputFormat::Json => write_json(records, path),
    };
    match result {
        Ok(()) => {
            tracing::info!("Data saved to {}", path.display());
            Ok(WriteOutcome::Written {
                rows: records.len(),
            })
        }
        Err(e) => {
            tracing::error!("Error saving to {}: {}", format.extension().to_uppercase(), e);
            Err(e)
        }
    }
}

fn create(path: &Path) -> Result<File, FormatError> {
    File::create(path).map_err(|e| FormatError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Header comes from the record's field names, so every row shares its column order.
fn write_delimited(records: &[BookRecord], path: &Path, delimiter: u8) -> Result<(), FormatError> {
    let csv_err = |e: csv::Error| FormatError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let mut w = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(create(path)?);
    for record in records {
        w.serialize(record).map_err(csv_err)?;
    }
    w.flush().map_err(|e| FormatError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json(records: &[BookRecord], path: &Path) -> Result<(), FormatError> {
    let mut w = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut w, records).map_err(|e| FormatError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    let io_err = |e: std::io::Error| FormatError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    writeln!(w).map_err(io_err)?;
    w.flush().map_err(io_err)
}
