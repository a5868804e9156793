//! Column metadata file: a names row followed by a labels row.

use crate::csv_writer::{DelimitedWriter, LineTerminator};
use crate::error::{ConvertError, Operation, Result};
use crate::model::Column;
use std::io::Write;
use tracing::debug;

/// Write the two metadata rows and close the sink.
///
/// The sink is consumed: after this call it has been flushed and dropped, and
/// nothing else can write to it.
pub fn write_metadata<M: Write>(
    columns: &[Column],
    sink: M,
    terminator: LineTerminator,
) -> Result<()> {
    let mut writer = DelimitedWriter::new(sink, terminator);

    writer
        .write_record(columns.iter().map(|c| c.name.as_str()))
        .map_err(|e| ConvertError::io(Operation::WriteMetadata, e))?;
    writer
        .write_record(columns.iter().map(|c| c.label.as_str()))
        .map_err(|e| ConvertError::io(Operation::WriteMetadata, e))?;

    let sink = writer
        .finish()
        .map_err(|e| ConvertError::io(Operation::WriteMetadata, e))?;
    drop(sink);

    debug!(columns = columns.len(), "Metadata sink closed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_names_then_labels() {
        let columns = vec![Column::new("id", "ID"), Column::new("val", "")];
        let mut out = Vec::new();
        write_metadata(&columns, &mut out, LineTerminator::Crlf).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id,val\r\nID,\r\n");
    }

    #[test]
    fn test_single_unlabeled_column() {
        let mut out = Vec::new();
        write_metadata(&[Column::unlabeled("a")], &mut out, LineTerminator::Crlf).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\r\n\r\n");
    }

    #[test]
    fn test_labels_are_quoted_like_data() {
        let columns = vec![
            Column::new("age", "Age, in years"),
            Column::new("q1", "Answer to \"Q1\""),
        ];
        let mut out = Vec::new();
        write_metadata(&columns, &mut out, LineTerminator::Lf).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "age,q1\n\"Age, in years\",\"Answer to \"\"Q1\"\"\"\n"
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Err(std::io::Error::other("disk full"))
            }
        }

        let err = write_metadata(&[Column::unlabeled("a")], Broken, LineTerminator::Crlf)
            .unwrap_err();
        assert_eq!(err.operation(), Some(Operation::WriteMetadata));
    }
}
