//! Table data model handed to the pipeline by a source.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named, labeled column of the source schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    /// Human-readable label; empty when the source has none
    #[serde(default, deserialize_with = "label_or_empty")]
    pub label: String,
}

impl Column {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }

    /// Column without a label
    pub fn unlabeled(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }
}

fn label_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One typed value within a row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    /// Calendar date, no time component and no offset
    Date(NaiveDate),
    /// Wall-clock date and time of day, no offset
    DateTime(NaiveDateTime),
    Number(BigDecimal),
}

impl Cell {
    /// Build a numeric cell from a binary float.
    ///
    /// Statistical formats store numbers as doubles and encode missing values
    /// as NaN, so non-finite input becomes [`Cell::Null`]. Finite values are
    /// taken from their shortest round-trip decimal text, which keeps `0.1` as
    /// `0.1` instead of its exact binary expansion.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Cell::Null;
        }
        // `{}` on f64 never uses exponent notation and always parses back
        BigDecimal::from_str(&value.to_string())
            .map(Cell::Number)
            .unwrap_or(Cell::Null)
    }

    /// Map `None` to [`Cell::Null`]
    pub fn from_opt<T: Into<Cell>>(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Short name of the variant, for logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Text(_) => "text",
            Cell::Date(_) => "date",
            Cell::DateTime(_) => "datetime",
            Cell::Number(_) => "number",
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

impl From<BigDecimal> for Cell {
    fn from(value: BigDecimal) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(BigDecimal::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from_f64(value)
    }
}

/// One source row; must hold exactly one cell per column
pub type Row = Vec<Cell>;

/// Facts about the source read once before conversion starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionMetadata {
    pub source_name: String,

    /// Row count announced by the source; drives progress percentages only
    pub total_row_count: i64,
}

impl ConversionMetadata {
    pub fn new(source_name: impl Into<String>, total_row_count: i64) -> Self {
        Self {
            source_name: source_name.into(),
            total_row_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_missing_values_are_null() {
        assert!(Cell::from_f64(f64::NAN).is_null());
        assert!(Cell::from_f64(f64::INFINITY).is_null());
        assert!(Cell::from_f64(f64::NEG_INFINITY).is_null());
    }

    #[test]
    fn test_from_f64_uses_shortest_decimal() {
        assert_eq!(
            Cell::from_f64(0.1),
            Cell::Number(BigDecimal::from_str("0.1").unwrap())
        );
        assert_eq!(
            Cell::from_f64(1e-7),
            Cell::Number(BigDecimal::from_str("0.0000001").unwrap())
        );
    }

    #[test]
    fn test_from_opt() {
        assert_eq!(Cell::from_opt::<&str>(None), Cell::Null);
        assert_eq!(Cell::from_opt(Some("x")), Cell::Text("x".to_string()));
    }

    #[test]
    fn test_column_label_null_deserializes_to_empty() {
        let column: Column = serde_json::from_str(r#"{"name":"val","label":null}"#).unwrap();
        assert_eq!(column, Column::unlabeled("val"));

        let column: Column = serde_json::from_str(r#"{"name":"id"}"#).unwrap();
        assert_eq!(column.label, "");
    }
}
