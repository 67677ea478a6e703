use std::fmt::Write;

use ruleguard_core::{OutcomeStatus, RuleOutcome, SkipReason, ValidationReport};

use crate::{
    utils::numbers::{format_numbers, percentage},
    Reporter,
};

pub struct StdOutFormatter {
    intro: String,
    intro_len: usize,
}

impl StdOutFormatter {
    pub fn new(version: String) -> Self {
        let s = format!("RuleGuard v{} - Validation Report", version);
        let n = s.len();
        Self {
            intro: s,
            intro_len: n,
        }
    }

    /// Renders one flow: a header line, then one dotted line per rule.
    pub fn render_report(&self, report: &ValidationReport) -> String {
        let status = if report.is_passed() {
            "PASSED"
        } else {
            "FAILED"
        };
        let mut out = String::new();
        let _ = writeln!(
            out,
            "\nflow {} ({} rows) - {}",
            report.flow_id,
            format_numbers(report.total_rows),
            status
        );

        let labels: Vec<String> = report.outcomes().iter().map(label).collect();
        let max_len = labels.iter().map(String::len).max().unwrap_or(0);

        for (outcome, label) in report.outcomes().iter().zip(labels) {
            let dots = ".".repeat(max_len - label.len() + 10);
            let _ = match &outcome.status {
                OutcomeStatus::Passed => writeln!(out, "  {} {} passed", label, dots),
                OutcomeStatus::Failed(message) => {
                    writeln!(out, "  {} {} FAILED: {}", label, dots, message)
                }
                OutcomeStatus::Skipped(SkipReason::ColumnMissing(column)) => writeln!(
                    out,
                    "  {} {} skipped (column '{}' not found)",
                    label, dots, column
                ),
                OutcomeStatus::Skipped(SkipReason::UnknownRuleType(rule_type)) => writeln!(
                    out,
                    "  {} {} skipped (unknown rule type '{}')",
                    label, dots, rule_type
                ),
            };
        }

        let total = report.outcomes().len();
        let _ = writeln!(
            out,
            "  {} passed, {} failed ({:.2}%), {} skipped",
            report.passed_count(),
            report.failed_count(),
            percentage(report.failed_count(), total),
            report.skipped_count()
        );
        out
    }

    pub fn render_summary(&self, passed: usize, failed: usize) -> String {
        format!(
            "\n{}\nResult: {} failed, {} passed",
            "=".repeat(self.intro_len),
            failed,
            passed
        )
    }
}

fn label(outcome: &RuleOutcome) -> String {
    format!(
        "[{}] {}({})",
        outcome.index + 1,
        outcome.rule_type,
        outcome.columns.join(",")
    )
}

impl Reporter for StdOutFormatter {
    fn on_start(&self) {
        let i = "=".repeat(self.intro_len);

        println!("{}", self.intro);
        println!("{}", i);
    }

    fn on_loading(&self, path: &str) {
        println!("Loading {}...", path);
    }

    fn on_dataset_loaded(&self, rows: usize, columns: usize) {
        println!("  {} rows, {} columns", format_numbers(rows), columns);
    }

    fn on_validation_start(&self, flow_id: &str, rules: usize) {
        println!("\nValidating flow {} ({} rules)...", flow_id, rules);
    }

    fn on_flow_result(&mut self, report: &ValidationReport) {
        print!("{}", self.render_report(report));
    }

    fn on_summary(&self, passed: usize, failed: usize) {
        println!("{}", self.render_summary(passed, failed));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn report() -> ValidationReport {
        ValidationReport::new(
            "orders".to_string(),
            2_500,
            vec![
                RuleOutcome::new(
                    0,
                    "NOT_NULL".to_string(),
                    vec!["id".to_string()],
                    OutcomeStatus::Passed,
                ),
                RuleOutcome::new(
                    1,
                    "RANGE_VALUE".to_string(),
                    vec!["amount".to_string(), "fee".to_string()],
                    OutcomeStatus::Failed("fee mismatch".to_string()),
                ),
                RuleOutcome::new(
                    2,
                    "UNIQUE".to_string(),
                    vec!["ghost".to_string()],
                    OutcomeStatus::Skipped(SkipReason::ColumnMissing("ghost".to_string())),
                ),
            ],
        )
    }

    #[test]
    fn test_render_report() {
        let formatter = StdOutFormatter::new("0.1.0".to_string());
        let out = formatter.render_report(&report());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[1], "flow orders (2.5K rows) - FAILED");
        assert!(lines[2].starts_with("  [1] NOT_NULL(id) ..."));
        assert!(lines[2].ends_with(" passed"));
        assert!(lines[3].ends_with("FAILED: fee mismatch"));
        assert!(lines[4].ends_with("skipped (column 'ghost' not found)"));
        assert_eq!(lines[5], "  1 passed, 1 failed (33.33%), 1 skipped");
    }

    #[test]
    fn test_dots_align_rule_status() {
        let formatter = StdOutFormatter::new("0.1.0".to_string());
        let out = formatter.render_report(&report());
        let widths: Vec<usize> = out
            .lines()
            .skip(2)
            .take(3)
            .map(|l| l.rfind('.').unwrap())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_render_summary() {
        let formatter = StdOutFormatter::new("0.1.0".to_string());
        let summary = formatter.render_summary(3, 1);
        assert!(summary.ends_with("Result: 1 failed, 3 passed"));
    }
}
