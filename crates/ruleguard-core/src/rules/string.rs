use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow_string::regexp::regexp_is_match_scalar;
use regex::Regex;

use super::{target, Rule};
use crate::{dataset::Dataset, errors::RuleError, predicate};

/// `REGEX`: every value, rendered as text, matches the pattern from its start.
///
/// Missing values render as the empty string, never as a placeholder word such
/// as `nan` or `None`. A pattern that cannot match `""` therefore fails on any
/// null, even when it would accept such a placeholder.
#[derive(Default)]
pub struct RegexMatch {}

impl RegexMatch {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for RegexMatch {
    fn name(&self) -> &'static str {
        "RegexMatch"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let column = target(columns)?;
        let array = dataset
            .column(column)
            .ok_or_else(|| RuleError::ColumnNotFound(column.to_string()))?;

        let anchored = format!("^(?:{})", parameter);
        let regex = match Regex::new(&anchored) {
            Ok(regex) => regex,
            Err(e) => {
                tracing::warn!(column, pattern = parameter, error = %e, "invalid regex pattern");
                return Ok(false);
            }
        };

        let strings = cast(array, &DataType::Utf8)?;
        let strings = strings.as_string::<i32>();
        if strings.null_count() > 0 && !regex.is_match("") {
            return Ok(false);
        }
        let matched = regexp_is_match_scalar(strings, &anchored, None)?;
        Ok(matched.true_count() == strings.len() - strings.null_count())
    }
}

/// `CUSTOM_FUNCTION`: the predicate compiled from the parameter holds for every value.
#[derive(Default)]
pub struct CustomFunction {}

impl CustomFunction {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for CustomFunction {
    fn name(&self) -> &'static str {
        "CustomFunction"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let predicate = predicate::load(parameter)?;
        let values = dataset.values(target(columns)?)?;
        Ok(values.iter().all(|value| predicate.test(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use std::sync::Arc;

    fn dataset(array: ArrayRef) -> Dataset {
        Dataset::from_columns(vec![("code", array)]).unwrap()
    }

    fn code() -> Vec<String> {
        vec!["code".to_string()]
    }

    #[test]
    fn test_regex_matches_from_start() {
        let data = dataset(Arc::new(StringArray::from(vec!["AB-1", "CD-22"])));
        let rule = RegexMatch::new();
        assert!(rule.evaluate(&data, &code(), "[A-Z]{2}-[0-9]+").unwrap());
        // Prefix match is enough, the end is not anchored
        assert!(rule.evaluate(&data, &code(), "[A-Z]{2}").unwrap());
        assert!(!rule.evaluate(&data, &code(), "[0-9]").unwrap());
    }

    #[test]
    fn test_regex_violation() {
        let data = dataset(Arc::new(StringArray::from(vec!["AB-1", "x-2"])));
        assert!(!RegexMatch::new().evaluate(&data, &code(), "[A-Z]{2}-").unwrap());
    }

    #[test]
    fn test_regex_on_numbers() {
        let data = dataset(Arc::new(Int64Array::from(vec![12, 345])));
        assert!(RegexMatch::new().evaluate(&data, &code(), r"\d+$").unwrap());
    }

    #[test]
    fn test_regex_nulls_render_empty() {
        let data = dataset(Arc::new(StringArray::from(vec![Some("ab"), None])));
        let rule = RegexMatch::new();
        assert!(!rule.evaluate(&data, &code(), "[a-z]+").unwrap());
        assert!(rule.evaluate(&data, &code(), "[a-z]*").unwrap());
    }

    #[test]
    fn test_regex_invalid_pattern_fails() {
        let data = dataset(Arc::new(StringArray::from(vec!["ab"])));
        assert!(!RegexMatch::new().evaluate(&data, &code(), "(").unwrap());
    }

    #[test]
    fn test_custom_function_always_true() {
        let data = dataset(Arc::new(StringArray::from(vec![Some("a"), None])));
        assert!(CustomFunction::new().evaluate(&data, &code(), "|v| true").unwrap());
    }

    #[test]
    fn test_custom_function_violation() {
        let data = dataset(Arc::new(StringArray::from(vec!["A-1", "B-2", "c-3"])));
        let rule = CustomFunction::new();
        assert!(!rule
            .evaluate(&data, &code(), "|v| upper(v) == v")
            .unwrap());
        assert!(rule
            .evaluate(&data, &code(), "fn ok(v) { len(v) == 3 }")
            .unwrap());
    }

    #[test]
    fn test_custom_function_without_callable_is_an_error() {
        let data = dataset(Arc::new(StringArray::from(vec!["a"])));
        let err = CustomFunction::new()
            .evaluate(&data, &code(), "let x = 1")
            .unwrap_err();
        assert!(matches!(err, RuleError::NoCallableFound));
    }
}
