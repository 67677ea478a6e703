pub mod generic;
pub mod historical;
pub mod numeric;
pub mod range;
pub mod string;

use std::sync::Arc;

pub use generic::{ColumnSet, NotNull, RecordCount, Unique};
pub use historical::{HistoricalGreater, HistoricalLess, HistoricalStdDev};
pub use numeric::{Average, Maximum, Minimum, StdDev};
pub use range::{InRange, RangeWithSecondary};
pub use string::{CustomFunction, RegexMatch};

use crate::{dataset::Dataset, errors::RuleError, sources::HistoricalStatsSource};

/// A business rule evaluated against a whole dataset.
///
/// `Ok(false)` is a data-quality finding. `Err` is reserved for misconfiguration
/// and collaborator failures that must abort the run.
pub trait Rule: Send + Sync {
    /// Returns the name of the rule.
    fn name(&self) -> &'static str;
    /// Evaluates the rule; `columns[0]` is the target column.
    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError>;
}

/// Collaborators handed to rule constructors.
#[derive(Clone)]
pub struct RuleContext {
    pub stats: Arc<dyn HistoricalStatsSource>,
}

impl RuleContext {
    pub fn new(stats: Arc<dyn HistoricalStatsSource>) -> Self {
        Self { stats }
    }
}

pub(crate) fn target(columns: &[String]) -> Result<&str, RuleError> {
    columns
        .first()
        .map(String::as_str)
        .ok_or_else(|| RuleError::ColumnNotFound(String::new()))
}
