//! I/O channels between the interpreter and its host.
//!
//! The interpreter never touches stdin/stdout directly; `.` hands values to an
//! [`OutputSink`] and `,` pulls lines from an [`InputSource`]. Failures of the
//! input command are reported as [`Diagnostic`]s and never abort execution.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Receives values produced by the output command.
pub trait OutputSink {
    /// Deliver a batch of produced values. The interpreter sends one value per `.`.
    fn write_values(&mut self, values: &[i64]) -> io::Result<()>;
}

/// Supplies lines of text to the input command.
pub trait InputSource {
    /// Read one line, blocking until it is available. `Ok(None)` signals end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> InputSource for R {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match BufRead::read_line(self, &mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

impl OutputSink for Vec<i64> {
    fn write_values(&mut self, values: &[i64]) -> io::Result<()> {
        self.extend_from_slice(values);
        Ok(())
    }
}

/// Writes every value as a decimal number on its own line.
pub struct NumericSink<W: Write> {
    writer: W,
}

impl<W: Write> NumericSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl NumericSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink for NumericSink<W> {
    fn write_values(&mut self, values: &[i64]) -> io::Result<()> {
        for v in values {
            writeln!(self.writer, "{v}")?;
        }
        self.writer.flush()
    }
}

/// Writes every value as the character with that code point.
///
/// Values that are not valid scalar values are written as U+FFFD.
pub struct AsciiSink<W: Write> {
    writer: W,
}

impl<W: Write> AsciiSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl AsciiSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink for AsciiSink<W> {
    fn write_values(&mut self, values: &[i64]) -> io::Result<()> {
        for &v in values {
            let ch = u32::try_from(v)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            write!(self.writer, "{ch}")?;
        }
        self.writer.flush()
    }
}

/// Adapts a closure into an [`OutputSink`].
pub struct FnSink<F>(pub F);

impl<F> OutputSink for FnSink<F>
where
    F: FnMut(&[i64]) -> io::Result<()>,
{
    fn write_values(&mut self, values: &[i64]) -> io::Result<()> {
        (self.0)(values)
    }
}

/// A clonable in-memory sink; every clone sees the same values.
///
/// Handy when the interpreter owns the sink but the caller still wants to read
/// what was produced.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    values: Rc<RefCell<Vec<i64>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> Vec<i64> {
        self.values.borrow().clone()
    }

    pub fn take(&self) -> Vec<i64> {
        std::mem::take(&mut *self.values.borrow_mut())
    }
}

impl OutputSink for SharedBuffer {
    fn write_values(&mut self, values: &[i64]) -> io::Result<()> {
        self.values.borrow_mut().extend_from_slice(values);
        Ok(())
    }
}

/// A non-fatal problem encountered by the input command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Program position of the `,` that failed, when known.
    pub position: Option<usize>,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The input source had no more lines.
    InputExhausted,
    /// Reading from the input source failed.
    InputRead(String),
    /// The line read could not be parsed as a base-10 integer.
    InvalidNumber { line: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::InputExhausted => write!(f, "no input available")?,
            DiagnosticKind::InputRead(msg) => write!(f, "failed to read input: {msg}")?,
            DiagnosticKind::InvalidNumber { line } => {
                write!(f, "input {line:?} is not a base-10 integer")?
            }
        }
        if let Some(p) = self.position {
            write!(f, " (at position {p})")?;
        }
        Ok(())
    }
}
