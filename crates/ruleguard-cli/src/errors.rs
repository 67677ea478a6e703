use ruleguard_core::RuleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No data file for flow '{flow_id}': set 'data' in the flow or pass --data")]
    MissingData { flow_id: String },
    // Validation errors from core
    #[error("Validation of flow '{flow_id}' aborted")]
    ValidationError {
        flow_id: String,
        #[source]
        source: RuleError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file contains no flow")]
    NoFlow,
    #[error("Flow '{flow_id}' is defined more than once")]
    DuplicateFlow { flow_id: String },
    #[error("Flow '{flow_id}' not found in configuration. Available: {available}")]
    UnknownFlow { flow_id: String, available: String },
    #[error("Rule #{index} of flow '{flow_id}' has no column")]
    EmptyColumns { flow_id: String, index: usize },
}
