use std::collections::HashSet;

use super::{target, Rule};
use crate::{
    dataset::Dataset,
    errors::RuleError,
    types::Value,
    utils::hasher::{hash_value, PrehashedBuilder},
};

/// `NOT_NULL`: no null (or NaN) value in the column.
#[derive(Default)]
pub struct NotNull {}

impl NotNull {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for NotNull {
    fn name(&self) -> &'static str {
        "NotNull"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        _parameter: &str,
    ) -> Result<bool, RuleError> {
        let column = target(columns)?;
        let array = dataset
            .column(column)
            .ok_or_else(|| RuleError::ColumnNotFound(column.to_string()))?;
        if array.null_count() > 0 {
            return Ok(false);
        }
        Ok(!dataset.values(column)?.iter().any(Value::is_missing))
    }
}

/// `UNIQUE`: no value appears twice. Missing values are equal to each other.
///
/// Only the 64-bit xxh3 digest of each value is kept, so two distinct values
/// with colliding digests are reported as a duplicate.
#[derive(Default)]
pub struct Unique {}

impl Unique {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for Unique {
    fn name(&self) -> &'static str {
        "Unique"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        _parameter: &str,
    ) -> Result<bool, RuleError> {
        let values = dataset.values(target(columns)?)?;
        let mut seen = HashSet::with_capacity_and_hasher(values.len(), PrehashedBuilder);
        Ok(values.iter().all(|value| seen.insert(hash_value(value))))
    }
}

/// `RECORD_COUNT`: the dataset has exactly `parameter` rows.
#[derive(Default)]
pub struct RecordCount {}

impl RecordCount {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for RecordCount {
    fn name(&self) -> &'static str {
        "RecordCount"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        _columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        match parameter.trim().parse::<usize>() {
            Ok(expected) => Ok(dataset.num_rows() == expected),
            Err(_) => {
                tracing::warn!(parameter, "record count parameter is not an integer");
                Ok(false)
            }
        }
    }
}

/// `COLUMNS`: the dataset has exactly the listed columns, in any order.
#[derive(Default)]
pub struct ColumnSet {}

impl ColumnSet {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for ColumnSet {
    fn name(&self) -> &'static str {
        "ColumnSet"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        _columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let expected: HashSet<&str> = parameter.split(',').map(str::trim).collect();
        let actual: HashSet<&str> = dataset.column_names().into_iter().collect();
        Ok(expected == actual)
    }
}
