use std::{fs::File, path::Path, sync::Arc};

use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::BATCH_SIZE;
use crate::errors::RuleError;

/// Read every column of a Parquet file, keeping its Arrow types.
pub fn read_parquet(path: &Path) -> Result<Vec<Arc<RecordBatch>>, RuleError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(BATCH_SIZE)
        .build()?;

    let mut batches = Vec::new();
    for batch_result in reader {
        batches.push(Arc::new(batch_result?));
    }
    Ok(batches)
}
