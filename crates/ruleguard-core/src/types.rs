use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::date_parser::parse_datetime;

pub type Batch = arrow::record_batch::RecordBatch;

/// A single cell read out of a [`crate::Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Temporal(NaiveDateTime),
}

impl Value {
    /// Null, or NaN in a float column.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value. Text is parsed, temporal values have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Null | Value::Temporal(_) => None,
        }
    }

    /// Temporal view of the value. Text is parsed, numbers have none.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Temporal(dt) => Some(*dt),
            Value::Text(s) => parse_datetime(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Temporal(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

/// One row of rule configuration, as produced by a [`crate::RuleDefinitionSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Comma separated column names; the first one is the rule target.
    pub columns: String,
    pub rule_type: String,
    #[serde(default)]
    pub parameter: String,
    pub error_message: String,
}

impl RuleDefinition {
    pub fn new(
        columns: impl Into<String>,
        rule_type: impl Into<String>,
        parameter: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            columns: columns.into(),
            rule_type: rule_type.into(),
            parameter: parameter.into(),
            error_message: error_message.into(),
        }
    }

    /// The column list split on commas, whitespace trimmed.
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .split(',')
            .map(|c| c.trim().to_string())
            .collect()
    }
}

/// Single-row aggregate returned by a [`crate::HistoricalStatsSource`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalStat {
    pub total: f64,
    #[serde(default)]
    pub std: f64,
}

impl HistoricalStat {
    pub fn new(total: f64, std: f64) -> Self {
        Self { total, std }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values() {
        assert!(Value::Null.is_missing());
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(!Value::Float(0.0).is_missing());
        assert!(!Value::Text(String::new()).is_missing());
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::from(" 12.5 ").as_f64(), Some(12.5));
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }

    #[test]
    fn test_temporal_view() {
        assert!(Value::from("2024-01-01").as_datetime().is_some());
        assert!(Value::Integer(20240101).as_datetime().is_none());
    }

    #[test]
    fn test_column_names_are_trimmed() {
        let definition = RuleDefinition::new("price, quantity", "RANGE_VALUE", "1,10,2,8", "bad");
        assert_eq!(definition.column_names(), vec!["price", "quantity"]);
    }
}
