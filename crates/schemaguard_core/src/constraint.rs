//! Column constraints and the constraint grammar.
//!
//! Constraints are a closed set of predicates. They are written in schema
//! descriptors either by name or as a small comparison expression:
//!
//! | Descriptor                          | Constraint          |
//! |-------------------------------------|---------------------|
//! | `positive`                          | `GreaterEqual(1)`   |
//! | `non_negative`                      | `GreaterEqual(0)`   |
//! | `finite`                            | `Finite`            |
//! | `not_null`, `recent_timestamp`      | `NotNull`           |
//! | `is not null`                       | `NotNull`           |
//! | `>= n`, `> n`, `<= n`, `< n`        | comparator with `n` |
//!
//! **Note on `positive`:** it means "at least 1", not "greater than zero".
//! Identifiers and cycle counters in the datasets this was written for start
//! at 1, so a value of `0.5` fails `positive`. Use `> 0` for strict
//! mathematical positivity.
//!
//! Anything outside the grammar is a [`ConstraintParseError`].

use crate::{ConstraintParseError, LogicalType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(>=|<=|>|<)\s*(\S+)$").expect("comparison pattern is valid")
});

/// A typed predicate applied to every value of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be `>=` the threshold
    GreaterEqual(f64),
    /// Value must be `>` the threshold
    GreaterThan(f64),
    /// Value must be `<=` the threshold
    LessEqual(f64),
    /// Value must be `<` the threshold
    LessThan(f64),
    /// Value must not be NaN or infinite
    Finite,
    /// Value must be present
    NotNull,
}

impl Constraint {
    /// Parses a constraint descriptor.
    ///
    /// Named forms are matched case-insensitively. A structured descriptor
    /// whose name is unknown falls back to its `check` expression.
    pub fn parse(descriptor: &ConstraintDescriptor) -> Result<Self, ConstraintParseError> {
        match descriptor {
            ConstraintDescriptor::Bare(text) => {
                let text = text.trim();
                if let Some(constraint) = parse_named(text) {
                    Ok(constraint)
                } else if looks_like_expression(text) {
                    parse_expression(text)
                } else if text.is_empty() {
                    Err(ConstraintParseError::Empty)
                } else {
                    Err(ConstraintParseError::UnknownName(text.to_string()))
                }
            }
            ConstraintDescriptor::Structured { name, check } => {
                let name = non_blank(name.as_deref());
                let check = non_blank(check.as_deref());

                if let Some(constraint) = name.and_then(parse_named) {
                    return Ok(constraint);
                }

                match (name, check) {
                    (_, Some(expression)) => parse_expression(expression),
                    (Some(name), None) => Err(ConstraintParseError::UnknownName(name.to_string())),
                    (None, None) => Err(ConstraintParseError::Empty),
                }
            }
        }
    }

    /// Evaluates the predicate against a present numeric value.
    ///
    /// NaN fails every comparator.
    pub fn accepts(&self, value: f64) -> bool {
        match *self {
            Constraint::GreaterEqual(threshold) => value >= threshold,
            Constraint::GreaterThan(threshold) => value > threshold,
            Constraint::LessEqual(threshold) => value <= threshold,
            Constraint::LessThan(threshold) => value < threshold,
            Constraint::Finite => value.is_finite(),
            Constraint::NotNull => true,
        }
    }

    /// Evaluates the predicate against a present integer value.
    ///
    /// Compares exactly, without going through `f64`, so values beyond 2^53
    /// are not rounded onto the threshold.
    pub fn accepts_integer(&self, value: i64) -> bool {
        let value = i128::from(value);
        match *self {
            Constraint::GreaterEqual(threshold) => value >= threshold.ceil() as i128,
            Constraint::GreaterThan(threshold) => value > threshold.floor() as i128,
            Constraint::LessEqual(threshold) => value <= threshold.floor() as i128,
            Constraint::LessThan(threshold) => value < threshold.ceil() as i128,
            Constraint::Finite | Constraint::NotNull => true,
        }
    }

    /// Returns true if the constraint can be applied to columns of `logical_type`.
    pub fn supports(&self, logical_type: LogicalType) -> bool {
        match self {
            Constraint::NotNull => true,
            _ => logical_type.is_numeric(),
        }
    }

    /// Returns the threshold for comparator constraints.
    pub fn threshold(&self) -> Option<f64> {
        match *self {
            Constraint::GreaterEqual(t)
            | Constraint::GreaterThan(t)
            | Constraint::LessEqual(t)
            | Constraint::LessThan(t) => Some(t),
            Constraint::Finite | Constraint::NotNull => None,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::GreaterEqual(t) => write!(f, ">= {}", t),
            Constraint::GreaterThan(t) => write!(f, "> {}", t),
            Constraint::LessEqual(t) => write!(f, "<= {}", t),
            Constraint::LessThan(t) => write!(f, "< {}", t),
            Constraint::Finite => f.write_str("finite"),
            Constraint::NotNull => f.write_str("not null"),
        }
    }
}

impl FromStr for Constraint {
    type Err = ConstraintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::parse(&ConstraintDescriptor::Bare(s.to_string()))
    }
}

/// A constraint as written in a schema descriptor.
///
/// Either a bare string (`positive`, `">= 0"`) or a mapping with a `name`
/// and/or a `check` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintDescriptor {
    /// Bare name or expression
    Bare(String),

    /// Mapping form
    Structured {
        /// Named constraint, e.g. `non_negative`
        #[serde(default)]
        name: Option<String>,
        /// Expression, e.g. `>= 1` or `is not null`
        #[serde(default)]
        check: Option<String>,
    },
}

impl ConstraintDescriptor {
    /// Creates a named descriptor.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Structured {
            name: Some(name.into()),
            check: None,
        }
    }

    /// Creates an expression descriptor.
    pub fn check(expression: impl Into<String>) -> Self {
        Self::Structured {
            name: None,
            check: Some(expression.into()),
        }
    }
}

impl From<&str> for ConstraintDescriptor {
    fn from(s: &str) -> Self {
        ConstraintDescriptor::Bare(s.to_string())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_named(name: &str) -> Option<Constraint> {
    match name.to_ascii_lowercase().as_str() {
        "positive" => Some(Constraint::GreaterEqual(1.0)),
        "non_negative" => Some(Constraint::GreaterEqual(0.0)),
        "finite" => Some(Constraint::Finite),
        "not_null" | "recent_timestamp" => Some(Constraint::NotNull),
        _ => None,
    }
}

fn looks_like_expression(text: &str) -> bool {
    text.starts_with(['<', '>']) || text.eq_ignore_ascii_case("is not null")
}

fn parse_expression(expression: &str) -> Result<Constraint, ConstraintParseError> {
    let expression = expression.trim();
    if expression.eq_ignore_ascii_case("is not null") {
        return Ok(Constraint::NotNull);
    }

    let captures = COMPARISON
        .captures(expression)
        .ok_or_else(|| ConstraintParseError::UnsupportedExpression(expression.to_string()))?;

    let raw_threshold = &captures[2];
    let threshold = raw_threshold
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| ConstraintParseError::InvalidThreshold {
            expression: expression.to_string(),
            threshold: raw_threshold.to_string(),
        })?;

    Ok(match &captures[1] {
        ">=" => Constraint::GreaterEqual(threshold),
        ">" => Constraint::GreaterThan(threshold),
        "<=" => Constraint::LessEqual(threshold),
        _ => Constraint::LessThan(threshold),
    })
}
