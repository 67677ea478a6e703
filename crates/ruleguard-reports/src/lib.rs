pub mod formatters;
pub mod utils;

use ruleguard_core::ValidationReport;
pub use formatters::{json::JsonFormatter, stdout::StdOutFormatter};

/// Hooks called by the CLI as a run progresses.
pub trait Reporter {
    fn on_start(&self);
    fn on_loading(&self, path: &str);
    fn on_dataset_loaded(&self, rows: usize, columns: usize);
    fn on_validation_start(&self, flow_id: &str, rules: usize);
    fn on_flow_result(&mut self, report: &ValidationReport);
    fn on_summary(&self, passed: usize, failed: usize);
}
