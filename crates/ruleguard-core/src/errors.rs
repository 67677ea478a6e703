use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    /// The predicate source compiled but defines nothing callable
    #[error("No callable predicate found in custom function source")]
    NoCallableFound,

    /// The predicate source could not be parsed
    #[error("Custom function syntax error at offset {offset}: {message}")]
    PredicateSyntax { offset: usize, message: String },

    /// The historical statistics collaborator failed
    #[error("Failed to fetch historical statistics for '{query}': {message}")]
    StatsFetch { query: String, message: String },

    /// The rule definition collaborator has nothing for this flow
    #[error("No rule definitions found for flow '{0}'")]
    FlowNotFound(String),

    /// The rule definition collaborator failed
    #[error("Failed to load rule definitions for flow '{flow}': {message}")]
    DefinitionFetch { flow: String, message: String },

    /// Column not found in the dataset
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The value could not be cast to the expected type
    #[error("Failed to cast column '{0}' to type {1}")]
    TypeCastError(String, String),

    /// The Arrow kernel produced an error (e.g., unsupported cast)
    #[error("Arrow computation error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet decoding error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// File reading or IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input file extension is not a supported format
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),
}

impl RuleError {
    /// Whether the error comes from a user-supplied custom function.
    pub fn is_predicate_error(&self) -> bool {
        matches!(
            self,
            RuleError::NoCallableFound | RuleError::PredicateSyntax { .. }
        )
    }
}
