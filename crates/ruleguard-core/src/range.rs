//! Range membership shared by the range family of rules.
//!
//! A range spec is a comma separated parameter string:
//!
//! - `"lo,hi"`: primary bounds only
//! - `"lo,hi,eq"`: primary bounds and an expected secondary value
//! - `"lo,hi,lo2,hi2"`: primary bounds and secondary bounds
//!
//! The primary bounds are either both dates or both numbers; the kind is decided
//! once, from the first bound. Secondary checks are always numeric and are only
//! enforced for rows whose primary value falls inside `[lo, hi]`.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::types::Value;
use crate::utils::date_parser::parse_datetime;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Range spec '{0}' needs at least two bounds")]
    TooFewBounds(String),
    #[error("Bound '{0}' is not a valid {1}")]
    InvalidBound(String, &'static str),
    #[error("Value '{0}' is not a valid {1}")]
    InvalidValue(String, &'static str),
    #[error("Range spec has no secondary bound")]
    MissingSecondary,
}

/// Primary bounds, resolved once to a single kind.
#[derive(Debug, Clone, PartialEq)]
enum Bounds {
    Numeric { lo: f64, hi: f64 },
    Temporal { lo: NaiveDateTime, hi: NaiveDateTime },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSpec {
    bounds: Bounds,
    // Tokens past the primary bounds, parsed only when a secondary check runs.
    extra: Vec<String>,
}

impl RangeSpec {
    pub fn parse(spec: &str) -> Result<Self, RangeError> {
        let tokens: Vec<&str> = spec.split(',').map(str::trim).collect();
        if tokens.len() < 2 {
            return Err(RangeError::TooFewBounds(spec.to_string()));
        }

        let bounds = match parse_datetime(tokens[0]) {
            Some(lo) => {
                let hi = parse_datetime(tokens[1])
                    .ok_or_else(|| RangeError::InvalidBound(tokens[1].to_string(), "date"))?;
                Bounds::Temporal { lo, hi }
            }
            None => Bounds::Numeric {
                lo: parse_number(tokens[0])?,
                hi: parse_number(tokens[1])?,
            },
        };

        Ok(Self {
            bounds,
            extra: tokens[2..].iter().map(|t| t.to_string()).collect(),
        })
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self.bounds, Bounds::Temporal { .. })
    }

    /// Whether `value` lies inside the primary bounds, inclusive.
    pub fn contains(&self, value: &Value) -> Result<bool, RangeError> {
        match self.bounds {
            Bounds::Numeric { lo, hi } => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| RangeError::InvalidValue(value.to_string(), "number"))?;
                Ok(lo <= v && v <= hi)
            }
            Bounds::Temporal { lo, hi } => {
                let v = value
                    .as_datetime()
                    .ok_or_else(|| RangeError::InvalidValue(value.to_string(), "date"))?;
                Ok(lo <= v && v <= hi)
            }
        }
    }

    /// Primary check, plus the conditional secondary check when `secondary` is given.
    ///
    /// A primary value outside the bounds makes the secondary check vacuously true.
    pub fn matches(&self, value: &Value, secondary: Option<&Value>) -> Result<bool, RangeError> {
        let in_range = self.contains(value)?;
        let Some(secondary) = secondary else {
            return Ok(in_range);
        };
        if !in_range {
            return Ok(true);
        }

        let other = secondary
            .as_f64()
            .ok_or_else(|| RangeError::InvalidValue(secondary.to_string(), "number"))?;
        if self.extra.len() == 2 {
            let lo = parse_number(&self.extra[0])?;
            let hi = parse_number(&self.extra[1])?;
            Ok(lo <= other && other <= hi)
        } else {
            let expected = self.extra.first().ok_or(RangeError::MissingSecondary)?;
            Ok(parse_number(expected)? == other)
        }
    }
}

fn parse_number(token: &str) -> Result<f64, RangeError> {
    token
        .parse::<f64>()
        .map_err(|_| RangeError::InvalidBound(token.to_string(), "number"))
}

/// Fail-closed range check: any malformed spec or value is a non-match.
pub fn matches(value: &Value, spec: &str, secondary: Option<&Value>) -> bool {
    RangeSpec::parse(spec)
        .and_then(|range| range.matches(value, secondary))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_range() {
        assert!(matches(&Value::Integer(5), "1,10", None));
        assert!(matches(&Value::Integer(1), "1,10", None));
        assert!(matches(&Value::Integer(10), "1,10", None));
        assert!(!matches(&Value::Integer(11), "1,10", None));
        assert!(matches(&Value::from("2.5"), "1.5, 3.5", None));
    }

    #[test]
    fn test_temporal_range() {
        let spec = "2024-01-01,2024-12-31";
        assert!(matches(&Value::from("2024-06-15"), spec, None));
        assert!(!matches(&Value::from("2025-01-01"), spec, None));
        let parsed = RangeSpec::parse(spec).unwrap();
        assert!(parsed.is_temporal());
    }

    #[test]
    fn test_temporal_range_rejects_numbers() {
        assert!(!matches(&Value::Integer(5), "2024-01-01,2024-12-31", None));
    }

    #[test]
    fn test_mixed_bounds_fail_closed() {
        assert!(!matches(&Value::from("2024-06-15"), "2024-01-01,10", None));
        assert!(!matches(&Value::Integer(5), "1,2024-01-01", None));
    }

    #[test]
    fn test_too_few_bounds() {
        assert_eq!(
            RangeSpec::parse("5").unwrap_err(),
            RangeError::TooFewBounds("5".to_string())
        );
        assert!(!matches(&Value::Integer(5), "5", None));
        assert!(!matches(&Value::Integer(5), "", None));
    }

    #[test]
    fn test_unparseable_value() {
        assert!(!matches(&Value::from("abc"), "1,10", None));
        assert!(!matches(&Value::Null, "1,10", None));
    }

    #[test]
    fn test_secondary_range() {
        let spec = "1,10,2,8";
        assert!(matches(&Value::Integer(5), spec, Some(&Value::Integer(2))));
        assert!(!matches(&Value::Integer(5), spec, Some(&Value::Integer(9))));
        assert!(matches(&Value::Integer(20), spec, Some(&Value::Integer(100))));
    }

    #[test]
    fn test_out_of_range_short_circuit_ignores_secondary() {
        assert!(matches(&Value::Integer(20), "1,10,x", Some(&Value::Null)));
        assert!(matches(&Value::Integer(20), "1,10", Some(&Value::Integer(1))));
    }

    #[test]
    fn test_secondary_equality() {
        let spec = "1,10,3";
        assert!(matches(&Value::Integer(5), spec, Some(&Value::from("3"))));
        assert!(!matches(&Value::Integer(5), spec, Some(&Value::Integer(4))));
    }

    #[test]
    fn test_secondary_equality_uses_third_token_beyond_four() {
        let spec = "1,10,3,4,5";
        assert!(matches(&Value::Integer(5), spec, Some(&Value::Integer(3))));
        assert!(!matches(&Value::Integer(5), spec, Some(&Value::Integer(4))));
    }

    #[test]
    fn test_secondary_without_extra_bounds_fails() {
        assert!(!matches(&Value::Integer(5), "1,10", Some(&Value::Integer(5))));
    }

    #[test]
    fn test_temporal_primary_numeric_secondary() {
        let spec = "2024-01-01,2024-12-31,0,100";
        assert!(matches(
            &Value::from("2024-03-01"),
            spec,
            Some(&Value::Float(50.0))
        ));
        assert!(!matches(
            &Value::from("2024-03-01"),
            spec,
            Some(&Value::Float(150.0))
        ));
    }
}
