//! Delimited-text record writer
//!
//! Comma separated, one record per call. A field is wrapped in double quotes
//! only when it contains a comma, a double quote, CR or LF; embedded quotes
//! are doubled. Everything else, the empty field included, is written bare.

use csv_core::{QuoteStyle, Terminator, WriteResult, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Record terminator, applied identically to every record of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Crlf,
    Lf,
}

impl LineTerminator {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineTerminator::Crlf => b"\r\n",
            LineTerminator::Lf => b"\n",
        }
    }
}

impl std::str::FromStr for LineTerminator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crlf" | "\\r\\n" | "windows" => Ok(LineTerminator::Crlf),
            "lf" | "\\n" | "unix" => Ok(LineTerminator::Lf),
            _ => Err(format!("Invalid line terminator: {} (expected crlf or lf)", s)),
        }
    }
}

impl std::fmt::Display for LineTerminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineTerminator::Crlf => f.write_str("crlf"),
            LineTerminator::Lf => f.write_str("lf"),
        }
    }
}

const BUFFER_CAPACITY: usize = 64 * 1024;

/// Buffered, append-only CSV record writer over any byte sink.
///
/// Fields are encoded by `csv_core` into an owned buffer that is drained to
/// the sink whenever it fills up. The encoder always runs with a CRLF
/// terminator so that both CR and LF force quoting; the configured
/// terminator is substituted when a record ends.
pub struct DelimitedWriter<W: Write> {
    core: csv_core::Writer,
    sink: W,
    buf: Box<[u8]>,
    len: usize,
    terminator: LineTerminator,
}

impl<W: Write> DelimitedWriter<W> {
    pub fn new(sink: W, terminator: LineTerminator) -> Self {
        let core = WriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .double_quote(true)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .build();

        Self {
            core,
            sink,
            buf: vec![0; BUFFER_CAPACITY].into_boxed_slice(),
            len: 0,
            terminator,
        }
    }

    /// Append one record.
    pub fn write_record<I, T>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut fields = fields.into_iter().peekable();
        let Some(first) = fields.next() else {
            return self.write_blank_record();
        };

        if first.as_ref().is_empty() && fields.peek().is_none() {
            // csv_core quotes a lone empty field as `""`; keep it bare
            return self.write_blank_record();
        }

        self.write_field(first.as_ref().as_bytes())?;
        for field in fields {
            self.encode(|core, out| core.delimiter(out))?;
            self.write_field(field.as_ref().as_bytes())?;
        }
        self.end_record()
    }

    /// Flush buffered records through to the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.sink.flush()
    }

    /// Flush everything and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.encode(|core, out| core.finish(out))?;
        self.flush()?;
        Ok(self.sink)
    }

    fn write_field(&mut self, mut input: &[u8]) -> io::Result<()> {
        self.encode(|core, out| {
            let (result, consumed, written) = core.field(input, out);
            input = &input[consumed..];
            (result, written)
        })
    }

    fn end_record(&mut self) -> io::Result<()> {
        // Closing quote (if any) followed by CRLF
        let mut tail = [0u8; 4];
        let (_, written) = self.core.terminator(&mut tail);
        let closing = written.saturating_sub(2);
        self.write_raw(&tail[..closing])?;
        self.write_blank_record()
    }

    fn write_blank_record(&mut self) -> io::Result<()> {
        self.write_raw(self.terminator.as_bytes())
    }

    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.buf.len() - self.len < bytes.len() {
            self.drain()?;
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Run one `csv_core` step, draining the buffer until it fits.
    fn encode<F>(&mut self, mut step: F) -> io::Result<()>
    where
        F: FnMut(&mut csv_core::Writer, &mut [u8]) -> (WriteResult, usize),
    {
        loop {
            let (result, written) = step(&mut self.core, &mut self.buf[self.len..]);
            self.len += written;
            match result {
                WriteResult::InputEmpty => return Ok(()),
                WriteResult::OutputFull => self.drain()?,
            }
        }
    }

    fn drain(&mut self) -> io::Result<()> {
        if self.len > 0 {
            self.sink.write_all(&self.buf[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }
}

/// Whether `field` must be quoted in the output
pub fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n'])
}
