//! Business-rule validation over Arrow datasets.
//!
//! A [`RuleEngine`] applies an ordered list of [`RuleDefinition`]s to a
//! [`Dataset`] and returns the error messages of the rules that failed.

pub mod dataset;
pub mod engine;
pub mod errors;
pub mod predicate;
pub mod range;
pub mod readers;
pub mod registry;
pub mod results;
pub mod rules;
pub mod sources;
pub mod types;
pub mod utils;

pub use dataset::Dataset;
pub use engine::RuleEngine;
pub use errors::RuleError;
pub use readers::{read_dataset, FileFormat};
pub use registry::{RuleRegistry, RuleType};
pub use results::{OutcomeStatus, RuleOutcome, SkipReason, ValidationReport};
pub use rules::{Rule, RuleContext};
pub use sources::{
    CachedStatsSource, HistoricalStatsSource, InMemoryRuleSource, NoHistory,
    RuleDefinitionSource, StaticStatsSource,
};
pub use types::{HistoricalStat, RuleDefinition, Value};
