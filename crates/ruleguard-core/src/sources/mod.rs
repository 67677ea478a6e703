//! Collaborators the engine reads from: rule definitions and historical aggregates.
//!
//! The storage behind them is not the engine's concern. Implementations here cover
//! in-memory configuration and a caching decorator; anything backed by a database
//! or a service implements the same traits.

mod definitions;
mod stats;

pub use definitions::InMemoryRuleSource;
pub use stats::{CachedStatsSource, NoHistory, StaticStatsSource};

use crate::{
    errors::RuleError,
    types::{HistoricalStat, RuleDefinition},
};

/// Provides the ordered rule set attached to a flow.
pub trait RuleDefinitionSource: Send + Sync {
    fn fetch(&self, flow_id: &str) -> Result<Vec<RuleDefinition>, RuleError>;
}

/// Provides a single-row historical aggregate for a query key.
///
/// Called once per historical rule evaluation.
pub trait HistoricalStatsSource: Send + Sync {
    fn fetch(&self, query: &str) -> Result<HistoricalStat, RuleError>;
}
