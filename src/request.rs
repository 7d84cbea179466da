//! Validation of loosely-typed counting and ranking arguments.
//!
//! Report plans and command lines hand the engine untyped values. They are
//! checked here, before any file is opened, so a rejected argument can never
//! disturb cached counts.

use std::str::FromStr;

use serde_yaml::Value as YamlValue;

use crate::error::{EngineError, ValueKind};

pub fn value_kind(value: &YamlValue) -> ValueKind {
    match value {
        YamlValue::Null => ValueKind::Null,
        YamlValue::Bool(_) => ValueKind::Bool,
        YamlValue::Number(n) if n.is_f64() => ValueKind::Float,
        YamlValue::Number(_) => ValueKind::Integer,
        YamlValue::String(_) => ValueKind::Text,
        YamlValue::Sequence(_) => ValueKind::Sequence,
        YamlValue::Mapping(_) => ValueKind::Mapping,
        YamlValue::Tagged(_) => ValueKind::Tagged,
    }
}

/// One or more column names to count, as given by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRequest {
    columns: Vec<String>,
}

impl ColumnRequest {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepts a text value or a sequence of text values.
    pub fn from_value(value: &YamlValue) -> Result<Self, EngineError> {
        match value {
            YamlValue::String(column) => Ok(Self::new([column.as_str()])),
            YamlValue::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    YamlValue::String(column) => Ok(column.clone()),
                    other => Err(EngineError::InvalidColumnType {
                        found: value_kind(other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|columns| Self { columns }),
            other => Err(EngineError::InvalidColumnType {
                found: value_kind(other),
            }),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl From<&str> for ColumnRequest {
    fn from(column: &str) -> Self {
        Self::new([column])
    }
}

impl From<&[&str]> for ColumnRequest {
    fn from(columns: &[&str]) -> Self {
        Self::new(columns.iter().copied())
    }
}

impl From<Vec<String>> for ColumnRequest {
    fn from(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

/// Number of ranked entries a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopCount(usize);

impl TopCount {
    pub fn new(n: usize) -> Self {
        Self(n)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Accepts integer values only; a float is rejected even when whole.
    pub fn from_value(value: &YamlValue) -> Result<Self, EngineError> {
        let YamlValue::Number(number) = value else {
            return Err(EngineError::InvalidCount {
                found: value_kind(value),
            });
        };
        if number.is_f64() {
            return Err(EngineError::InvalidCount {
                found: ValueKind::Float,
            });
        }
        if let Some(n) = number.as_u64() {
            return Ok(Self(usize::try_from(n).unwrap_or(usize::MAX)));
        }
        match number.as_i64() {
            Some(n) => Err(EngineError::NegativeCount { n }),
            None => Err(EngineError::InvalidCount {
                found: value_kind(value),
            }),
        }
    }
}

impl Default for TopCount {
    fn default() -> Self {
        Self(10)
    }
}

impl FromStr for TopCount {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<u64>() {
            return Ok(Self(usize::try_from(n).unwrap_or(usize::MAX)));
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Err(EngineError::NegativeCount { n });
        }
        let found = if trimmed.parse::<f64>().is_ok() {
            ValueKind::Float
        } else {
            ValueKind::Text
        };
        Err(EngineError::InvalidCount { found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(raw: &str) -> YamlValue {
        serde_yaml::from_str(raw).expect("yaml")
    }

    #[test]
    fn column_request_accepts_text_and_text_sequences() {
        let single = ColumnRequest::from_value(&yaml("worksite_state")).expect("text");
        assert_eq!(single.columns(), &["worksite_state"]);
        let many = ColumnRequest::from_value(&yaml("[SOC_NAME, WORKSITE_STATE]")).expect("seq");
        assert_eq!(many.columns(), &["SOC_NAME", "WORKSITE_STATE"]);
    }

    #[test]
    fn column_request_rejects_non_text_anywhere() {
        let err = ColumnRequest::from_value(&yaml("1")).expect_err("integer");
        assert!(matches!(
            err,
            EngineError::InvalidColumnType {
                found: ValueKind::Integer
            }
        ));
        let err = ColumnRequest::from_value(&yaml("[WORKSITE_STATE, 1]")).expect_err("mixed");
        assert!(matches!(err, EngineError::InvalidColumnType { .. }));
    }

    #[test]
    fn top_count_checks_type_before_sign() {
        assert_eq!(TopCount::from_value(&yaml("3")).unwrap(), TopCount::new(3));
        assert_eq!(TopCount::from_value(&yaml("0")).unwrap(), TopCount::new(0));
        assert!(matches!(
            TopCount::from_value(&yaml("-1")),
            Err(EngineError::NegativeCount { n: -1 })
        ));
        assert!(matches!(
            TopCount::from_value(&yaml("1.5")),
            Err(EngineError::InvalidCount {
                found: ValueKind::Float
            })
        ));
        assert!(matches!(
            TopCount::from_value(&yaml("2.0")),
            Err(EngineError::InvalidCount { .. })
        ));
        assert!(matches!(
            TopCount::from_value(&yaml("ten")),
            Err(EngineError::InvalidCount {
                found: ValueKind::Text
            })
        ));
    }

    #[test]
    fn top_count_parses_command_line_text() {
        assert_eq!("10".parse::<TopCount>().unwrap().get(), 10);
        assert!(matches!(
            "-1".parse::<TopCount>(),
            Err(EngineError::NegativeCount { n: -1 })
        ));
        assert!(matches!(
            "1.5".parse::<TopCount>(),
            Err(EngineError::InvalidCount {
                found: ValueKind::Float
            })
        ));
    }
}
