//! JSON Lines table dumps
//!
//! The first line describes the table, every following line is one row:
//!
//! ```text
//! {"name": "visits", "row_count": 2, "columns": [{"name": "id", "label": "ID"}, {"name": "seen"}]}
//! [1, {"date": "2016-03-09"}]
//! [2, {"datetime": "2016-03-09T14:30:00"}]
//! ```
//!
//! Cell encoding: `null`, strings, numbers (digits kept exactly), and
//! single-key objects `{"date": ..}` / `{"datetime": ..}`. Any other JSON value
//! is rejected as an unsupported cell kind.

use crate::error::{ConvertError, Operation, Result};
use crate::model::{Cell, Column, ConversionMetadata, Row};
use crate::source::{RowSource, SchemaSource};
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_jsonlines::JsonLinesReader;
use std::io::{BufRead, ErrorKind};
use std::str::FromStr;
use tracing::debug;

/// Largest decimal exponent accepted for a number cell, in either direction.
/// Numbers are written out in plain notation, so the exponent bounds the
/// length of the rendered field.
pub const MAX_DECIMAL_EXPONENT: i64 = 4096;

#[derive(Debug, Deserialize)]
struct TableHeader {
    name: String,
    #[serde(default)]
    row_count: i64,
    columns: Vec<Column>,
}

/// Streaming reader over a JSON Lines table dump
pub struct JsonLinesTable<R> {
    reader: JsonLinesReader<R>,
    metadata: ConversionMetadata,
    columns: Vec<Column>,
    rows_read: u64,
}

impl<R: BufRead> JsonLinesTable<R> {
    /// Read the schema line; rows are read lazily afterwards.
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = JsonLinesReader::new(reader);

        let header: TableHeader = match reader.read() {
            Ok(Some(header)) => header,
            Ok(None) => {
                return Err(ConvertError::invalid_source(
                    "empty input, expected a schema line",
                ))
            },
            Err(e) if is_malformed(&e) => {
                return Err(ConvertError::invalid_source(format!(
                    "malformed schema line: {}",
                    e
                )))
            },
            Err(e) => return Err(ConvertError::io(Operation::ReadSchema, e)),
        };

        debug!(
            name = %header.name,
            columns = header.columns.len(),
            row_count = header.row_count,
            "Read table schema"
        );

        Ok(Self {
            reader,
            metadata: ConversionMetadata::new(header.name, header.row_count),
            columns: header.columns,
            rows_read: 0,
        })
    }
}

impl<R> SchemaSource for JsonLinesTable<R> {
    fn metadata(&self) -> &ConversionMetadata {
        &self.metadata
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl<R: BufRead> RowSource for JsonLinesTable<R> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        let value: Value = match self.reader.read() {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(None),
            Err(e) if is_malformed(&e) => {
                return Err(ConvertError::invalid_source(format!(
                    "row {} is not valid JSON: {}",
                    self.rows_read + 1,
                    e
                )))
            },
            Err(e) => return Err(ConvertError::io(Operation::ReadRow, e)),
        };
        self.rows_read += 1;
        let row_number = self.rows_read;

        let Value::Array(values) = value else {
            return Err(ConvertError::invalid_source(format!(
                "row {} is not a JSON array",
                row_number
            )));
        };

        values
            .into_iter()
            .enumerate()
            .map(|(column, value)| to_cell(value).map_err(|kind| {
                ConvertError::UnsupportedCellKind {
                    row: row_number,
                    column,
                    kind,
                }
            }))
            .collect::<Result<Row>>()
            .map(Some)
    }
}

/// Whether a read error comes from the line's content rather than the stream:
/// a JSON parse failure (carried as the error payload) or invalid UTF-8.
fn is_malformed(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::InvalidData
        || err
            .get_ref()
            .is_some_and(|inner| inner.is::<serde_json::Error>())
}

/// Classify one JSON value; the error string describes the rejected value.
fn to_cell(value: Value) -> std::result::Result<Cell, String> {
    match value {
        Value::Null => Ok(Cell::Null),
        Value::String(text) => Ok(Cell::Text(text)),
        Value::Number(number) => {
            let digits = number.to_string();
            let decimal = BigDecimal::from_str(&digits).map_err(|_| format!("number {}", digits))?;
            let (_, scale) = decimal.as_bigint_and_exponent();
            if scale.unsigned_abs() > MAX_DECIMAL_EXPONENT.unsigned_abs() {
                return Err(format!("number {} (exponent out of range)", digits));
            }
            Ok(Cell::Number(decimal))
        },
        Value::Object(object) => temporal_cell(object),
        Value::Bool(b) => Err(format!("boolean {}", b)),
        Value::Array(_) => Err("nested array".to_string()),
    }
}

fn temporal_cell(object: Map<String, Value>) -> std::result::Result<Cell, String> {
    if object.len() != 1 {
        return Err(format!("object with {} keys", object.len()));
    }
    let Some((key, value)) = object.into_iter().next() else {
        return Err("empty object".to_string());
    };

    match (key.as_str(), value) {
        ("date", Value::String(text)) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Cell::Date)
            .map_err(|_| format!("date {:?}", text)),
        ("datetime", Value::String(text)) => parse_date_time(&text)
            .map(Cell::DateTime)
            .ok_or_else(|| format!("datetime {:?}", text)),
        (key, _) => Err(format!("object with key {:?}", key)),
    }
}

/// Accept both the ISO `T` separator and a plain space
fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::from_str(text)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
