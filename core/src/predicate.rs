//! Threshold predicate: one (field, operator, threshold) condition.
//!
//! RULE: a value that does not coerce to a number never matches.
//! It satisfies neither the condition nor its negation.

use crate::{
    alert::{AlertRecord, ParameterField},
    error::{TuningError, TuningResult},
};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Ge,
    Gt,
    Le,
    Lt,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Lt => "<",
        }
    }

    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::Ge => value >= threshold,
            Operator::Gt => value > threshold,
            Operator::Le => value <= threshold,
            Operator::Lt => value < threshold,
        }
    }
}

impl FromStr for Operator {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">=" => Ok(Operator::Ge),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            "<" => Ok(Operator::Lt),
            other => Err(TuningError::UnknownOperator {
                operator: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed threshold condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCondition {
    pub field: String,
    pub operator: Operator,
    pub threshold: f64,
}

impl ThresholdCondition {
    pub fn new(field: &str, operator: Operator, threshold: f64) -> Self {
        Self {
            field: field.to_string(),
            operator,
            threshold,
        }
    }

    /// True when the alert's coerced value satisfies the condition.
    pub fn matches(&self, alert: &AlertRecord) -> bool {
        alert
            .numeric(&self.field)
            .is_some_and(|v| self.operator.holds(v, self.threshold))
    }

    /// The subset of `rows` satisfying this condition.
    pub fn filter<'a>(&self, rows: &[&'a AlertRecord]) -> Vec<&'a AlertRecord> {
        rows.iter().copied().filter(|a| self.matches(a)).collect()
    }
}

/// Evaluate `field operator threshold` over `rows`.
///
/// `operator` is the raw tracker text; anything outside `>=`, `>`, `<=`, `<`
/// is an `UnknownOperator` error.
pub fn evaluate<'a>(
    rows: &[&'a AlertRecord],
    field: ParameterField<'_>,
    operator: &str,
    threshold: f64,
) -> TuningResult<Vec<&'a AlertRecord>> {
    let operator: Operator = operator.parse()?;
    Ok(ThresholdCondition::new(field.name(), operator, threshold).filter(rows))
}
