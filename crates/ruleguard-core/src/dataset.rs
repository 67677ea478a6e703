//! Read-only tabular input for the rule engine.
//!
//! A [`Dataset`] wraps a single Arrow `RecordBatch`. Readers that produce several
//! batches are concatenated once on construction so rules can address rows
//! positionally across columns.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::{cast_with_options, concat_batches, CastOptions};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema,
    TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::errors::RuleError;
use crate::types::{Batch, Value};
use crate::utils::date_parser::{
    from_epoch_days, from_epoch_micros, from_epoch_millis, from_epoch_nanos, from_epoch_seconds,
};

#[derive(Debug, Clone)]
pub struct Dataset {
    batch: Batch,
}

impl Dataset {
    pub fn new(batch: Batch) -> Self {
        Self { batch }
    }

    /// A dataset with no columns and no rows.
    pub fn empty() -> Self {
        Self::new(Batch::new_empty(Arc::new(Schema::empty())))
    }

    /// Concatenate reader output into one dataset. All batches must share a schema.
    pub fn from_batches(batches: &[Arc<Batch>]) -> Result<Self, RuleError> {
        let Some(first) = batches.first() else {
            return Ok(Self::empty());
        };
        let schema = first.schema();
        let batch = concat_batches(&schema, batches.iter().map(|b| b.as_ref()))?;
        Ok(Self::new(batch))
    }

    /// Build a dataset from named arrays of equal length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: AsRef<str>,
    {
        let batch = Batch::try_from_iter(columns)?;
        Ok(Self::new(batch))
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema_ref().index_of(name).is_ok()
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    fn require(&self, name: &str) -> Result<&ArrayRef, RuleError> {
        self.column(name)
            .ok_or_else(|| RuleError::ColumnNotFound(name.to_string()))
    }

    /// Every cell of a column, in row order.
    pub fn values(&self, name: &str) -> Result<Vec<Value>, RuleError> {
        let array = self.require(name)?;
        Ok((0..array.len())
            .map(|row| array_value(array.as_ref(), row))
            .collect())
    }

    /// Strict numeric view of a column. Any value that does not convert is an error.
    pub fn numeric_column(&self, name: &str) -> Result<Float64Array, RuleError> {
        let array = self.require(name)?;
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };
        let casted = cast_with_options(array, &DataType::Float64, &options)
            .map_err(|e| RuleError::TypeCastError(name.to_string(), e.to_string()))?;
        Ok(casted.as_primitive::<Float64Type>().clone())
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }
}

/// Read one cell of an Arrow array as a [`Value`].
pub fn array_value(array: &dyn Array, row: usize) -> Value {
    if array.is_null(row) {
        return Value::Null;
    }
    match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Boolean => Value::Boolean(array.as_boolean().value(row)),
        DataType::Int8 => Value::Integer(array.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => Value::Integer(array.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => Value::Integer(array.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(array.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => Value::Integer(array.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => Value::Integer(array.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = array.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(Value::Integer)
                .unwrap_or(Value::Float(v as f64))
        }
        DataType::Float32 => Value::Float(array.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => Value::Text(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(array.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => Value::Text(array.as_string_view().value(row).to_string()),
        DataType::Date32 => temporal(from_epoch_days(
            array
                .as_primitive::<arrow::datatypes::Date32Type>()
                .value(row),
        )),
        DataType::Date64 => temporal(from_epoch_millis(
            array
                .as_primitive::<arrow::datatypes::Date64Type>()
                .value(row),
        )),
        DataType::Timestamp(unit, _) => temporal(match unit {
            TimeUnit::Second => {
                from_epoch_seconds(array.as_primitive::<TimestampSecondType>().value(row))
            }
            TimeUnit::Millisecond => {
                from_epoch_millis(array.as_primitive::<TimestampMillisecondType>().value(row))
            }
            TimeUnit::Microsecond => {
                from_epoch_micros(array.as_primitive::<TimestampMicrosecondType>().value(row))
            }
            TimeUnit::Nanosecond => {
                from_epoch_nanos(array.as_primitive::<TimestampNanosecondType>().value(row))
            }
        }),
        _ => formatted(array, row),
    }
}

fn temporal(value: Option<chrono::NaiveDateTime>) -> Value {
    value.map(Value::Temporal).unwrap_or(Value::Null)
}

// Decimals, intervals and nested types fall back to their display form.
fn formatted(array: &dyn Array, row: usize) -> Value {
    let options = FormatOptions::default();
    match ArrayFormatter::try_new(array, &options) {
        Ok(formatter) => Value::Text(formatter.value(row).to_string()),
        Err(_) => Value::Null,
    }
}
