use super::{target, Rule};
use crate::{dataset::Dataset, errors::RuleError, range::RangeSpec};

/// `RANGE`: every value lies inside the range spec given as parameter.
#[derive(Default)]
pub struct InRange {}

impl InRange {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for InRange {
    fn name(&self) -> &'static str {
        "InRange"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let values = dataset.values(target(columns)?)?;
        let spec = match RangeSpec::parse(parameter) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(parameter, error = %e, "invalid range spec");
                return Ok(false);
            }
        };
        Ok(values
            .iter()
            .all(|value| spec.matches(value, None).unwrap_or(false)))
    }
}

/// `RANGE_VALUE` / `RANGE_RANGE`: rows whose first column is in range must have a
/// second column equal to, or inside, the secondary bounds.
#[derive(Default)]
pub struct RangeWithSecondary {}

impl RangeWithSecondary {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for RangeWithSecondary {
    fn name(&self) -> &'static str {
        "RangeWithSecondary"
    }

    fn evaluate(
        &self,
        dataset: &Dataset,
        columns: &[String],
        parameter: &str,
    ) -> Result<bool, RuleError> {
        let primary = dataset.values(target(columns)?)?;
        let Some(secondary_column) = columns.get(1).filter(|c| dataset.has_column(c)) else {
            tracing::warn!(
                columns = ?columns,
                "range rule with a secondary check needs a second existing column"
            );
            return Ok(false);
        };
        let secondary = dataset.values(secondary_column)?;
        let spec = match RangeSpec::parse(parameter) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(parameter, error = %e, "invalid range spec");
                return Ok(false);
            }
        };
        Ok(primary
            .iter()
            .zip(secondary.iter())
            .all(|(value, other)| spec.matches(value, Some(other)).unwrap_or(false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Date32Array, Int64Array, StringArray};
    use std::sync::Arc;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_range() {
        let inside = Dataset::from_columns(vec![(
            "qty",
            Arc::new(Int64Array::from(vec![1, 5, 10])) as ArrayRef,
        )])
        .unwrap();
        assert!(InRange::new().evaluate(&inside, &columns(&["qty"]), "1,10").unwrap());

        let outside = Dataset::from_columns(vec![(
            "qty",
            Arc::new(Int64Array::from(vec![5, 11])) as ArrayRef,
        )])
        .unwrap();
        assert!(!InRange::new().evaluate(&outside, &columns(&["qty"]), "1,10").unwrap());
    }

    #[test]
    fn test_date_range_on_text_and_date_columns() {
        let spec = "2024-01-01,2024-12-31";
        let text = Dataset::from_columns(vec![(
            "day",
            Arc::new(StringArray::from(vec!["2024-02-10", "2024-12-31"])) as ArrayRef,
        )])
        .unwrap();
        assert!(InRange::new().evaluate(&text, &columns(&["day"]), spec).unwrap());

        // 19_797 days after the epoch is 2024-03-15
        let dates = Dataset::from_columns(vec![(
            "day",
            Arc::new(Date32Array::from(vec![19_797])) as ArrayRef,
        )])
        .unwrap();
        assert!(InRange::new().evaluate(&dates, &columns(&["day"]), spec).unwrap());
    }

    #[test]
    fn test_null_value_fails_range() {
        let data = Dataset::from_columns(vec![(
            "qty",
            Arc::new(Int64Array::from(vec![Some(5), None])) as ArrayRef,
        )])
        .unwrap();
        assert!(!InRange::new().evaluate(&data, &columns(&["qty"]), "1,10").unwrap());
    }

    #[test]
    fn test_malformed_spec_fails() {
        let data = Dataset::from_columns(vec![(
            "qty",
            Arc::new(Int64Array::from(vec![5])) as ArrayRef,
        )])
        .unwrap();
        assert!(!InRange::new().evaluate(&data, &columns(&["qty"]), "10").unwrap());
        assert!(!InRange::new().evaluate(&data, &columns(&["qty"]), "a,b").unwrap());
    }

    fn pairs(primary: Vec<i64>, secondary: Vec<i64>) -> Dataset {
        Dataset::from_columns(vec![
            ("value", Arc::new(Int64Array::from(primary)) as ArrayRef),
            ("other", Arc::new(Int64Array::from(secondary)) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_range_range() {
        let rule = RangeWithSecondary::new();
        let cols = columns(&["value", "other"]);
        assert!(rule.evaluate(&pairs(vec![5], vec![2]), &cols, "1,10,2,8").unwrap());
        assert!(!rule.evaluate(&pairs(vec![5], vec![9]), &cols, "1,10,2,8").unwrap());
        assert!(rule.evaluate(&pairs(vec![20], vec![999]), &cols, "1,10,2,8").unwrap());
    }

    #[test]
    fn test_range_value() {
        let rule = RangeWithSecondary::new();
        let cols = columns(&["value", "other"]);
        assert!(rule
            .evaluate(&pairs(vec![5, 15], vec![3, 0]), &cols, "1,10,3")
            .unwrap());
        assert!(!rule
            .evaluate(&pairs(vec![5, 6], vec![3, 4]), &cols, "1,10,3")
            .unwrap());
    }

    #[test]
    fn test_missing_secondary_column_fails() {
        let rule = RangeWithSecondary::new();
        let data = pairs(vec![5], vec![2]);
        assert!(!rule.evaluate(&data, &columns(&["value"]), "1,10,2,8").unwrap());
        assert!(!rule
            .evaluate(&data, &columns(&["value", "ghost"]), "1,10,2,8")
            .unwrap());
    }
}
