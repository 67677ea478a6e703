use chrono::Local;
use ruleguard_core::{OutcomeStatus, SkipReason, ValidationReport};
use serde::{Deserialize, Serialize};
use serde_json::Error;

use crate::Reporter;

#[derive(Serialize, Deserialize)]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    flows: Vec<FlowFormatter>,
}

#[derive(Serialize, Deserialize)]
struct FlowFormatter {
    flow_id: String,
    n_rows: usize,
    pass: bool,
    passed: usize,
    failed: usize,
    skipped: usize,
    errors: Vec<String>,
    rules: Vec<RuleFormatter>,
}

#[derive(Serialize, Deserialize)]
struct RuleFormatter {
    index: usize,
    rule_type: String,
    columns: Vec<String>,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl JsonFormatter {
    pub fn new(version: String) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            flows: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_passed(&self) -> bool {
        self.flows.iter().all(|f| f.pass)
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self) {}

    fn on_loading(&self, _path: &str) {}

    fn on_dataset_loaded(&self, _rows: usize, _columns: usize) {}

    fn on_validation_start(&self, _flow_id: &str, _rules: usize) {}

    fn on_flow_result(&mut self, report: &ValidationReport) {
        let rules = report
            .outcomes()
            .iter()
            .map(|o| {
                let (status, message) = match &o.status {
                    OutcomeStatus::Passed => ("passed", None),
                    OutcomeStatus::Failed(message) => ("failed", Some(message.clone())),
                    OutcomeStatus::Skipped(SkipReason::ColumnMissing(column)) => {
                        ("skipped", Some(format!("column '{}' not found", column)))
                    }
                    OutcomeStatus::Skipped(SkipReason::UnknownRuleType(rule_type)) => {
                        ("skipped", Some(format!("unknown rule type '{}'", rule_type)))
                    }
                };
                RuleFormatter {
                    index: o.index,
                    rule_type: o.rule_type.clone(),
                    columns: o.columns.clone(),
                    status: status.to_string(),
                    message,
                }
            })
            .collect();

        self.flows.push(FlowFormatter {
            flow_id: report.flow_id.clone(),
            n_rows: report.total_rows,
            pass: report.is_passed(),
            passed: report.passed_count(),
            failed: report.failed_count(),
            skipped: report.skipped_count(),
            errors: report.error_messages(),
            rules,
        });
    }

    fn on_summary(&self, _passed: usize, _failed: usize) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use ruleguard_core::RuleOutcome;
    use serde_json::Value;

    #[test]
    fn test_json_document() {
        let mut formatter = JsonFormatter::new("0.1.0".to_string());
        formatter.on_flow_result(&ValidationReport::new(
            "orders".to_string(),
            3,
            vec![
                RuleOutcome::new(
                    0,
                    "NOT_NULL".to_string(),
                    vec!["id".to_string()],
                    OutcomeStatus::Failed("id has nulls".to_string()),
                ),
                RuleOutcome::new(
                    1,
                    "FOO".to_string(),
                    vec!["id".to_string()],
                    OutcomeStatus::Skipped(SkipReason::UnknownRuleType("FOO".to_string())),
                ),
            ],
        ));

        let json: Value = serde_json::from_str(&formatter.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], "0.1.0");
        let flow = &json["flows"][0];
        assert_eq!(flow["flow_id"], "orders");
        assert_eq!(flow["pass"], false);
        assert_eq!(flow["failed"], 1);
        assert_eq!(flow["skipped"], 1);
        assert_eq!(flow["errors"][0], "id has nulls");
        assert_eq!(flow["rules"][1]["status"], "skipped");
        assert_eq!(flow["rules"][1]["message"], "unknown rule type 'FOO'");
        assert!(!formatter.is_passed());
    }

    #[test]
    fn test_passed_rule_has_no_message() {
        let mut formatter = JsonFormatter::new("0.1.0".to_string());
        formatter.on_flow_result(&ValidationReport::new(
            "orders".to_string(),
            1,
            vec![RuleOutcome::new(
                0,
                "UNIQUE".to_string(),
                vec!["id".to_string()],
                OutcomeStatus::Passed,
            )],
        ));
        let json: Value = serde_json::from_str(&formatter.to_json().unwrap()).unwrap();
        assert!(json["flows"][0]["rules"][0].get("message").is_none());
        assert!(formatter.is_passed());
    }
}
