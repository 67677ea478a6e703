use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use arrow::{
    csv::ReaderBuilder as CsvReaderBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use regex::Regex;

use super::BATCH_SIZE;
use crate::errors::RuleError;

/// Generate UTF-8 schema from CSV file header
fn csv_generate_schema(path: &Path) -> Result<Schema, io::Error> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    if let Some(first) = lines.next() {
        let header = first?;
        let fields: Vec<Field> = header
            .trim_end_matches('\r')
            .split(',')
            .map(|c| Field::new(c.trim().trim_matches('"'), DataType::Utf8, true))
            .collect();
        Ok(Schema::new(fields))
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "CSV file is empty",
        ))
    }
}

/// Read a CSV file with a header row. Every column is text; empty fields are null.
pub fn read_csv(path: &Path) -> Result<Vec<Arc<RecordBatch>>, RuleError> {
    let schema = Arc::new(csv_generate_schema(path)?);
    let file = File::open(path)?;
    let null_regex = Regex::new("^$").map_err(io::Error::other)?;

    let reader = CsvReaderBuilder::new(schema)
        .with_header(true)
        .with_null_regex(null_regex)
        .with_batch_size(BATCH_SIZE)
        .build(file)?;

    let mut batches = Vec::new();
    for batch_result in reader {
        batches.push(Arc::new(batch_result?));
    }
    Ok(batches)
}
