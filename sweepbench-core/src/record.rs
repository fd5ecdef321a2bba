//! Precision-Recall Log Records
//!
//! Each line of a results log looks like
//! `Threshold: 0.500000, Precision: 0.800000, Recall: 0.650000`.
//! Field order is fixed and every field is `<label>: <number>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const FIELD_COUNT: usize = 3;
const VALUE_SEPARATOR: &str = ": ";

/// Position of a field within a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Field 0
    Threshold,
    /// Field 1
    Precision,
    /// Field 2
    Recall,
}

impl Field {
    const ORDER: [Field; FIELD_COUNT] = [Field::Threshold, Field::Precision, Field::Recall];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Threshold => write!(f, "threshold"),
            Field::Precision => write!(f, "precision"),
            Field::Recall => write!(f, "recall"),
        }
    }
}

/// A log line that does not match the record shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("Expected 3 comma-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("The {field} field {text:?} is not of the form `label: value`")]
    MissingSeparator { field: Field, text: String },

    #[error("The {field} value {value:?} is not a number")]
    InvalidNumber { field: Field, value: String },

    #[error("The {field} value {value:?} is not finite")]
    NotFinite { field: Field, value: String },
}

/// One (threshold, precision, recall) triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPoint {
    /// Decision threshold
    pub threshold: f64,
    /// Precision at this threshold
    pub precision: f64,
    /// Recall at this threshold
    pub recall: f64,
}

impl ThresholdPoint {
    /// No detections at all: precision and recall are both exactly zero.
    pub fn is_degenerate(&self) -> bool {
        self.precision == 0.0 && self.recall == 0.0
    }
}

/// Parse one log line into a `ThresholdPoint`
pub fn parse_record(line: &str) -> Result<ThresholdPoint, RecordParseError> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(RecordParseError::FieldCount {
            found: fields.len(),
        });
    }

    let mut values = [0.0f64; FIELD_COUNT];
    for ((slot, text), field) in values.iter_mut().zip(&fields).zip(Field::ORDER) {
        *slot = parse_field(field, text)?;
    }

    Ok(ThresholdPoint {
        threshold: values[0],
        precision: values[1],
        recall: values[2],
    })
}

fn parse_field(field: Field, text: &str) -> Result<f64, RecordParseError> {
    let (_, value) = text
        .split_once(VALUE_SEPARATOR)
        .ok_or_else(|| RecordParseError::MissingSeparator {
            field,
            text: text.trim().to_string(),
        })?;

    let value = value.trim();
    let number = value
        .parse::<f64>()
        .map_err(|_| RecordParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })?;

    // `f64::from_str` accepts "inf" and "NaN", neither of which can be plotted
    if !number.is_finite() {
        return Err(RecordParseError::NotFinite {
            field,
            value: value.to_string(),
        });
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regular_line() {
        let point = parse_record("Threshold: 0.5, Precision: 0.80, Recall: 0.65").unwrap();
        assert_eq!(
            point,
            ThresholdPoint {
                threshold: 0.5,
                precision: 0.80,
                recall: 0.65
            }
        );
        assert!(!point.is_degenerate());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert_eq!(
            parse_record("Threshold: 0.1, Precision: inf, Recall: 0.5"),
            Err(RecordParseError::NotFinite {
                field: Field::Precision,
                value: "inf".to_string()
            })
        );
        assert_eq!(
            parse_record("Threshold: 0.1, Precision: 0.4, Recall: NaN"),
            Err(RecordParseError::NotFinite {
                field: Field::Recall,
                value: "NaN".to_string()
            })
        );
        assert!(matches!(
            parse_record("Threshold: -infinity, Precision: 0.4, Recall: 0.5"),
            Err(RecordParseError::NotFinite {
                field: Field::Threshold,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_degenerate_line() {
        let point = parse_record("Threshold: 0.9, Precision: 0.00, Recall: 0.00").unwrap();
        assert_eq!(point.threshold, 0.9);
        assert!(point.is_degenerate());
    }

    #[test]
    fn test_single_zero_is_not_degenerate() {
        let point = parse_record("Threshold: 0.75, Precision: 0.000000, Recall: 0.010000").unwrap();
        assert!(!point.is_degenerate());
        let point = parse_record("Threshold: 0.1, Precision: 0.4, Recall: 0").unwrap();
        assert!(!point.is_degenerate());
    }

    #[test]
    fn test_go_printf_format() {
        let point =
            parse_record("Threshold: 0.150000, Precision: 0.512345, Recall: 0.987654\n").unwrap();
        assert_eq!(point.threshold, 0.15);
        assert_eq!(point.recall, 0.987654);
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(
            parse_record("Threshold: 0.5, Precision: 0.8"),
            Err(RecordParseError::FieldCount { found: 2 })
        );
        assert_eq!(
            parse_record("Threshold: 0.5, Precision: 0.8, Recall: 0.6, F1: 0.7"),
            Err(RecordParseError::FieldCount { found: 4 })
        );
    }

    #[test]
    fn test_empty_line_is_malformed() {
        assert_eq!(
            parse_record(""),
            Err(RecordParseError::FieldCount { found: 1 })
        );
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_record("Threshold 0.5, Precision: 0.8, Recall: 0.6").unwrap_err();
        assert!(matches!(
            err,
            RecordParseError::MissingSeparator {
                field: Field::Threshold,
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = parse_record("Threshold: 0.5, Precision: high, Recall: 0.6").unwrap_err();
        assert_eq!(
            err,
            RecordParseError::InvalidNumber {
                field: Field::Precision,
                value: "high".into()
            }
        );
        assert_eq!(err.to_string(), "The precision value \"high\" is not a number");
    }
}
