//! Drift checks against an externally computed historical aggregate.
//!
//! Each evaluation performs exactly one fetch on the stats source, using the rule
//! parameter as the query key. Fetch failures propagate.

use std::sync::Arc;

use arrow_array::{Array, Float64Array};
use arrow_ord::cmp::{gt, lt};

use super::{target, Rule};
use crate::{
    dataset::Dataset, errors::RuleError, sources::HistoricalStatsSource, types::HistoricalStat,
};

fn fetch(
    stats: &dyn HistoricalStatsSource,
    query: &str,
) -> Result<HistoricalStat, RuleError> {
    tracing::debug!(query, "fetching historical stats");
    stats.fetch(query)
}

fn numeric(dataset: &Dataset, column: &str) -> Result<Option<Float64Array>, RuleError> {
    if !dataset.has_column(column) {
        return Err(RuleError::ColumnNotFound(column.to_string()));
    }
    match dataset.numeric_column(column) {
        Ok(array) => Ok(Some(array)),
        Err(e) => {
            tracing::debug!(column, error = %e, "column is not numeric");
            Ok(None)
        }
    }
}

/// `HISTORICAL_GREATER`: every value is strictly greater than the historical total.
pub struct HistoricalGreater {
    stats: Arc<dyn HistoricalStatsSource>,
}

impl HistoricalGreater {
    pub fn new(stats: Arc<dyn HistoricalStatsSource>) -> Self {
        Self { stats }
    }
}

impl Rule for HistoricalGreater {
    fn name(&self) -> &'static str {
        "HistoricalGreater"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let stat = fetch(self.stats.as_ref(), parameter)?;
        let Some(values) = numeric(dataset, target(columns)?)? else {
            return Ok(false);
        };
        let above = gt(&values, &Float64Array::new_scalar(stat.total))?;
        Ok(above.true_count() == values.len())
    }
}

/// `HISTORICAL_LESS`: every value is strictly lower than the historical total.
pub struct HistoricalLess {
    stats: Arc<dyn HistoricalStatsSource>,
}

impl HistoricalLess {
    pub fn new(stats: Arc<dyn HistoricalStatsSource>) -> Self {
        Self { stats }
    }
}

impl Rule for HistoricalLess {
    fn name(&self) -> &'static str {
        "HistoricalLess"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let stat = fetch(self.stats.as_ref(), parameter)?;
        let Some(values) = numeric(dataset, target(columns)?)? else {
            return Ok(false);
        };
        let below = lt(&values, &Float64Array::new_scalar(stat.total))?;
        Ok(below.true_count() == values.len())
    }
}

/// `HISTORICAL_STD_DEV`: every value deviates from the historical total by more
/// than the historical standard deviation.
///
/// Values within one standard deviation fail the rule.
pub struct HistoricalStdDev {
    stats: Arc<dyn HistoricalStatsSource>,
}

impl HistoricalStdDev {
    pub fn new(stats: Arc<dyn HistoricalStatsSource>) -> Self {
        Self { stats }
    }
}

impl Rule for HistoricalStdDev {
    fn name(&self) -> &'static str {
        "HistoricalStdDev"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let stat = fetch(self.stats.as_ref(), parameter)?;
        let Some(values) = numeric(dataset, target(columns)?)? else {
            return Ok(false);
        };
        Ok(values
            .iter()
            .all(|v| v.is_some_and(|v| (v - stat.total).abs() > stat.std)))
    }
}
