//! Core type definitions for schema representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::Value;

/// Storage type of a column, inferred from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no fractional part anywhere in the column).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text/string values, and any column with mixed content.
    Text,
    /// Normalized timestamps.
    Timestamp,
}

impl ColumnType {
    /// Infer the type of a column from its values. Nulls are ignored; a
    /// column with no present values is treated as text.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut inferred: Option<ColumnType> = None;

        for value in values {
            let this = match value {
                Value::Null => continue,
                Value::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                    ColumnType::Integer
                }
                Value::Number(_) => ColumnType::Float,
                Value::Text(_) => return ColumnType::Text,
                Value::Timestamp(_) => ColumnType::Timestamp,
            };

            inferred = Some(match (inferred, this) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => return ColumnType::Text,
            });
        }

        inferred.unwrap_or(ColumnType::Text)
    }

    /// Postgres column type used when creating the target table.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "BIGINT",
            ColumnType::Float => "DOUBLE PRECISION",
            ColumnType::Text => "TEXT",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

/// Semantic role a column may fulfill in a vital-sign dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalRole {
    /// Heart rate in beats per minute.
    HeartRate,
    /// Peripheral oxygen saturation (SpO2).
    OxygenSaturation,
    /// Time of the measurement.
    Timestamp,
}

impl VitalRole {
    /// All roles, in resolution order.
    pub const ALL: [VitalRole; 3] = [
        VitalRole::HeartRate,
        VitalRole::OxygenSaturation,
        VitalRole::Timestamp,
    ];
}

impl fmt::Display for VitalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalRole::HeartRate => write!(f, "heart rate"),
            VitalRole::OxygenSaturation => write!(f, "oxygen saturation"),
            VitalRole::Timestamp => write!(f, "timestamp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_integer_column() {
        let values = [Value::Number(72.0), Value::Null, Value::Number(80.0)];
        assert_eq!(ColumnType::infer(&values), ColumnType::Integer);
    }

    #[test]
    fn test_infer_float_column() {
        let values = [Value::Number(72.0), Value::Number(97.5)];
        assert_eq!(ColumnType::infer(&values), ColumnType::Float);
    }

    #[test]
    fn test_infer_mixed_column_is_text() {
        let values = [Value::Number(72.0), Value::from("n/r")];
        assert_eq!(ColumnType::infer(&values), ColumnType::Text);
    }

    #[test]
    fn test_infer_all_null_column_is_text() {
        let values = [Value::Null, Value::Null];
        assert_eq!(ColumnType::infer(&values), ColumnType::Text);
    }
}
