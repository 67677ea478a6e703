use serde::Serialize;

/// Why a definition was not evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    ColumnMissing(String),
    UnknownRuleType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Passed,
    Failed(String),
    Skipped(SkipReason),
}

/// The result of a single rule definition, tagged with its input position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub index: usize,
    pub rule_type: String,
    pub columns: Vec<String>,
    pub status: OutcomeStatus,
}

impl RuleOutcome {
    pub fn new(index: usize, rule_type: String, columns: Vec<String>, status: OutcomeStatus) -> Self {
        Self {
            index,
            rule_type,
            columns,
            status,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub flow_id: String,
    pub total_rows: usize,
    outcomes: Vec<RuleOutcome>,
}

impl ValidationReport {
    pub fn new(flow_id: String, total_rows: usize, outcomes: Vec<RuleOutcome>) -> Self {
        Self {
            flow_id,
            total_rows,
            outcomes,
        }
    }

    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Passed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// Failure messages in definition order, duplicates kept.
    pub fn error_messages(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error_message().map(str::to_string))
            .collect()
    }

    /// A run passes when no evaluated rule failed. Skipped rules do not count.
    pub fn is_passed(&self) -> bool {
        self.failed_count() == 0
    }
}
