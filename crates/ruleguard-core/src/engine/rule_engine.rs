use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    dataset::Dataset,
    errors::RuleError,
    registry::RuleRegistry,
    results::{OutcomeStatus, RuleOutcome, SkipReason, ValidationReport},
    rules::RuleContext,
    sources::{HistoricalStatsSource, NoHistory, RuleDefinitionSource},
    types::RuleDefinition,
};

/// RuleEngine - applies an ordered set of rule definitions to a dataset.
///
/// Definitions whose target column is absent, or whose rule type is not registered,
/// are skipped. A rule evaluating to `false` contributes its error message. Hard
/// failures (bad custom function, stats fetch failure) abort the whole run.
pub struct RuleEngine {
    registry: RuleRegistry,
    context: RuleContext,
    definitions: Option<Arc<dyn RuleDefinitionSource>>,
    parallel: bool,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Engine over the built-in registry with no historical statistics.
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::default(),
            context: RuleContext::new(Arc::new(NoHistory)),
            definitions: None,
            parallel: false,
        }
    }

    pub fn with_stats(mut self, stats: Arc<dyn HistoricalStatsSource>) -> Self {
        self.context = RuleContext::new(stats);
        self
    }

    pub fn with_definitions(mut self, definitions: Arc<dyn RuleDefinitionSource>) -> Self {
        self.definitions = Some(definitions);
        self
    }

    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Evaluate definitions on the rayon pool. Output order is unchanged.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Returns the error messages of the failing definitions, in input order.
    pub fn apply(
        &self,
        dataset: &Dataset,
        definitions: &[RuleDefinition],
    ) -> Result<Vec<String>, RuleError> {
        let outcomes = self.evaluate(dataset, definitions)?;
        Ok(outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.status {
                OutcomeStatus::Failed(message) => Some(message),
                _ => None,
            })
            .collect())
    }

    /// Returns one outcome per definition, in input order.
    pub fn evaluate(
        &self,
        dataset: &Dataset,
        definitions: &[RuleDefinition],
    ) -> Result<Vec<RuleOutcome>, RuleError> {
        tracing::debug!(
            rules = definitions.len(),
            rows = dataset.num_rows(),
            parallel = self.parallel,
            "evaluating rule set"
        );
        if self.parallel {
            definitions
                .par_iter()
                .enumerate()
                .map(|(index, definition)| self.evaluate_one(index, dataset, definition))
                .collect()
        } else {
            definitions
                .iter()
                .enumerate()
                .map(|(index, definition)| self.evaluate_one(index, dataset, definition))
                .collect()
        }
    }

    pub fn report(
        &self,
        flow_id: &str,
        dataset: &Dataset,
        definitions: &[RuleDefinition],
    ) -> Result<ValidationReport, RuleError> {
        let outcomes = self.evaluate(dataset, definitions)?;
        let report = ValidationReport::new(flow_id.to_string(), dataset.num_rows(), outcomes);
        tracing::info!(
            flow = flow_id,
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "validation finished"
        );
        Ok(report)
    }

    /// Fetches the definitions of a flow from the configured source.
    pub fn load(&self, flow_id: &str) -> Result<Vec<RuleDefinition>, RuleError> {
        let Some(source) = &self.definitions else {
            return Err(RuleError::DefinitionFetch {
                flow: flow_id.to_string(),
                message: "no rule definition source configured".to_string(),
            });
        };
        source.fetch(flow_id)
    }

    /// Loads the definitions of a flow and applies them.
    pub fn validate(&self, flow_id: &str, dataset: &Dataset) -> Result<Vec<String>, RuleError> {
        let definitions = self.load(flow_id)?;
        self.apply(dataset, &definitions)
    }

    fn evaluate_one(
        &self,
        index: usize,
        dataset: &Dataset,
        definition: &RuleDefinition,
    ) -> Result<RuleOutcome, RuleError> {
        let columns = definition.column_names();
        let status = self.status(dataset, definition, &columns)?;
        Ok(RuleOutcome::new(
            index,
            definition.rule_type.clone(),
            columns,
            status,
        ))
    }

    fn status(
        &self,
        dataset: &Dataset,
        definition: &RuleDefinition,
        columns: &[String],
    ) -> Result<OutcomeStatus, RuleError> {
        let target = columns.first().map(String::as_str).unwrap_or_default();
        if !dataset.has_column(target) {
            tracing::warn!(
                column = target,
                rule_type = %definition.rule_type,
                "column not in dataset, skipping rule"
            );
            return Ok(OutcomeStatus::Skipped(SkipReason::ColumnMissing(
                target.to_string(),
            )));
        }

        let Some(rule) = self.registry.resolve(&definition.rule_type, &self.context) else {
            tracing::debug!(rule_type = %definition.rule_type, "unknown rule type, skipping rule");
            return Ok(OutcomeStatus::Skipped(SkipReason::UnknownRuleType(
                definition.rule_type.clone(),
            )));
        };

        let passed = rule
            .evaluate(dataset, columns, &definition.parameter)
            .inspect_err(|e| {
                tracing::error!(rule = rule.name(), column = target, error = %e, "rule aborted the run");
            })?;
        tracing::trace!(rule = rule.name(), column = target, passed, "rule evaluated");

        if passed {
            Ok(OutcomeStatus::Passed)
        } else {
            Ok(OutcomeStatus::Failed(definition.error_message.clone()))
        }
    }
}
