use std::io;

use crate::io::{Diagnostic, DiagnosticKind, InputSource, NumericSink, OutputSink};
use crate::tape::Tape;

/// The state every command operates on: the tape plus the I/O channels.
///
/// Built-in and custom commands receive `&mut Machine`, never the whole
/// interpreter, so a command cannot alter the registry it was dispatched from.
pub struct Machine {
    tape: Tape,
    output: Box<dyn OutputSink>,
    input: Box<dyn InputSource>,
    diagnostics: Option<Box<dyn FnMut(&Diagnostic)>>,
    // Program position of the command currently running, for diagnostics.
    position: Option<usize>,
}

impl Machine {
    /// A machine writing numbers to stdout and reading lines from stdin.
    pub fn new(tape: Tape) -> Self {
        Self {
            tape,
            output: Box::new(NumericSink::stdout()),
            input: Box::new(io::BufReader::new(io::stdin())),
            diagnostics: None,
            position: None,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }

    /// Value of the current cell.
    pub fn get(&self) -> i64 {
        self.tape.get()
    }

    /// Overwrite the current cell.
    pub fn set(&mut self, value: i64) {
        self.tape.set(value);
    }

    /// Send one produced value to the output sink.
    ///
    /// Sink failures are logged and otherwise ignored.
    pub fn emit(&mut self, value: i64) {
        if let Err(e) = self.output.write_values(&[value]) {
            tracing::warn!(value, error = %e, "output sink rejected value");
        }
    }

    /// Read one line from the input source; `Ok(None)` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.input.read_line()
    }

    /// Report a non-fatal problem on the diagnostic channel.
    pub fn report(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic { position: self.position, kind };
        tracing::warn!(%diagnostic, "input command failed");
        if let Some(hook) = self.diagnostics.as_mut() {
            (hook)(&diagnostic);
        }
    }

    pub(crate) fn set_output(&mut self, sink: Box<dyn OutputSink>) {
        self.output = sink;
    }

    pub(crate) fn set_input(&mut self, source: Box<dyn InputSource>) {
        self.input = source;
    }

    pub(crate) fn set_diagnostics(&mut self, hook: Box<dyn FnMut(&Diagnostic)>) {
        self.diagnostics = Some(hook);
    }

    pub(crate) fn set_position(&mut self, position: Option<usize>) {
        self.position = position;
    }
}
