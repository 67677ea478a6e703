use super::{target, Rule};
use crate::{
    dataset::Dataset,
    errors::RuleError,
    utils::stats::{is_close, maximum, mean, minimum, sample_std, AGGREGATE_TOLERANCE},
};

/// Non-missing values of a strictly numeric column, or `None` if the column
/// does not convert.
fn numeric_values(dataset: &Dataset, column: &str) -> Result<Option<Vec<f64>>, RuleError> {
    if !dataset.has_column(column) {
        return Err(RuleError::ColumnNotFound(column.to_string()));
    }
    match dataset.numeric_column(column) {
        Ok(array) => Ok(Some(
            array.iter().flatten().filter(|v| !v.is_nan()).collect(),
        )),
        Err(e) => {
            tracing::debug!(column, error = %e, "column is not numeric");
            Ok(None)
        }
    }
}

fn threshold(parameter: &str) -> Option<f64> {
    match parameter.trim().parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(parameter, "numeric rule parameter is not a number");
            None
        }
    }
}

/// Shared shape of the aggregate rules: reduce the column, compare with the parameter.
fn compare_aggregate(
    dataset: &Dataset,
    columns: &[String],
    parameter: &str,
    reduce: fn(&[f64]) -> Option<f64>,
    accept: fn(f64, f64) -> bool,
) -> Result<bool, RuleError> {
    let Some(values) = numeric_values(dataset, target(columns)?)? else {
        return Ok(false);
    };
    let (Some(actual), Some(expected)) = (reduce(&values), threshold(parameter)) else {
        return Ok(false);
    };
    Ok(accept(actual, expected))
}

/// `MINIMUM`: the smallest value is at least `parameter`.
#[derive(Default)]
pub struct Minimum {}

impl Minimum {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for Minimum {
    fn name(&self) -> &'static str {
        "Minimum"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        compare_aggregate(dataset, columns, parameter, minimum, |min, bound| {
            min >= bound
        })
    }
}

/// `MAXIMUM`: the largest value is at most `parameter`.
#[derive(Default)]
pub struct Maximum {}

impl Maximum {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for Maximum {
    fn name(&self) -> &'static str {
        "Maximum"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        compare_aggregate(dataset, columns, parameter, maximum, |max, bound| {
            max <= bound
        })
    }
}

/// `AVERAGE`: the mean is within 0.01 of `parameter`.
#[derive(Default)]
pub struct Average {}

impl Average {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for Average {
    fn name(&self) -> &'static str {
        "Average"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        compare_aggregate(dataset, columns, parameter, mean, |avg, expected| {
            is_close(avg, expected, AGGREGATE_TOLERANCE)
        })
    }
}

/// `STD_DEV`: the sample standard deviation is within 0.01 of `parameter`.
#[derive(Default)]
pub struct StdDev {}

impl StdDev {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for StdDev {
    fn name(&self) -> &'static str {
        "StdDev"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        compare_aggregate(dataset, columns, parameter, sample_std, |std, expected| {
            is_close(std, expected, AGGREGATE_TOLERANCE)
        })
    }
}
