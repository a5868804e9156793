//! Table sources
//!
//! A source is whatever decodes the input file. The pipeline only needs the
//! schema up front and then rows one at a time, in order, exactly once.
//!
//! - [`MemoryTable`]: rows already materialised in memory
//! - [`JsonLinesTable`]: a JSON Lines table dump (schema line, then one array
//!   per row)

pub mod jsonl;

pub use jsonl::JsonLinesTable;

use crate::error::Result;
use crate::model::{Column, ConversionMetadata, Row};

/// Schema side of a source, available before the first row is read
pub trait SchemaSource {
    fn metadata(&self) -> &ConversionMetadata;

    fn columns(&self) -> &[Column];
}

/// Forward-only row stream.
///
/// Returns `Ok(None)` once exhausted. A source is not restartable; a second
/// pass needs a fresh instance.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<Row>>;
}

/// Vector-backed table
#[derive(Debug, Clone)]
pub struct MemoryTable {
    metadata: ConversionMetadata,
    columns: Vec<Column>,
    rows: std::vec::IntoIter<Row>,
}

impl MemoryTable {
    /// Table whose announced row count is the number of rows given
    pub fn new(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Self {
        let total = rows.len() as i64;
        Self::with_row_count(name, total, columns, rows)
    }

    /// Table announcing `total_row_count`, which may differ from the actual
    /// number of rows (as a lying file header would)
    pub fn with_row_count(
        name: impl Into<String>,
        total_row_count: i64,
        columns: Vec<Column>,
        rows: Vec<Row>,
    ) -> Self {
        Self {
            metadata: ConversionMetadata::new(name, total_row_count),
            columns,
            rows: rows.into_iter(),
        }
    }
}

impl SchemaSource for MemoryTable {
    fn metadata(&self) -> &ConversionMetadata {
        &self.metadata
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl RowSource for MemoryTable {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.next())
    }
}
