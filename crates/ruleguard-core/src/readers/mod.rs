//! Dataset ingestion from CSV and Parquet files.
//!
//! Files are read sequentially into Arrow batches and concatenated into a single
//! [`Dataset`]. CSV columns are always read as UTF-8 text.

mod csv_reader;
mod parquet_reader;

use std::path::Path;

pub use csv_reader::read_csv;
pub use parquet_reader::read_parquet;

use crate::{dataset::Dataset, errors::RuleError};

const BATCH_SIZE: usize = 256_000;

/// File format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(FileFormat::Csv),
            "parquet" => Some(FileFormat::Parquet),
            _ => None,
        }
    }
}

/// Reads a CSV or Parquet file, choosing the reader from the extension.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<Dataset, RuleError> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| RuleError::UnsupportedFormat(path.display().to_string()))?;
    tracing::debug!(path = %path.display(), ?format, "reading dataset");
    let batches = match format {
        FileFormat::Csv => read_csv(path)?,
        FileFormat::Parquet => read_parquet(path)?,
    };
    Dataset::from_batches(&batches)
}
