//! An extensible Brainfuck interpreter over a circular integer tape.
//!
//! Features and behaviors:
//! - Memory tape of 30,000 cells by default, initialized to 0.
//! - The pointer wraps: moving left from cell 0 lands on the last cell and
//!   moving right from the last cell lands on cell 0.
//! - Cells hold unbounded (`i64`) integers; byte cells are opt-in via
//!   [`CellMode::Byte`].
//! - Output `.` hands the raw integer under the pointer to an [`OutputSink`].
//! - Input `,` reads one line and parses it as a base-10 integer; a failure is
//!   reported as a [`Diagnostic`] and execution continues.
//! - Loops `[]` nest; unmatched markers and unknown characters abort execution.
//! - Custom single-character commands can be layered over the built-ins.
//!
//! Quick start:
//!
//! ```
//! use tapebf::{Interpreter, Machine, SharedBuffer};
//!
//! let mut bf = Interpreter::new();
//! let out = SharedBuffer::new();
//! bf.set_output_sink(out.clone());
//! bf.add_command('*', |m: &mut Machine| {
//!     let v = m.get();
//!     m.set(v * 2);
//! })
//! .expect("'*' is not a built-in");
//!
//! bf.execute(".+.*.+.*.").expect("program should run");
//! assert_eq!(out.values(), vec![0, 1, 2, 3, 6]);
//! ```

pub mod builtins;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod error;
pub mod extensions;
pub mod interpreter;
pub mod io;
pub mod logging;
pub mod loops;
pub mod machine;
pub mod registry;
pub mod repl;
pub mod tape;
mod theme;

pub use error::{ExecutionError, Partition, RegistryError, TapeError};
pub use interpreter::{Interpreter, InterpreterConfig};
pub use io::{
    AsciiSink, Diagnostic, DiagnosticKind, FnSink, InputSource, NumericSink, OutputSink, SharedBuffer,
};
pub use machine::Machine;
pub use registry::CommandRegistry;
pub use tape::{CellMode, Tape, DEFAULT_TAPE_SIZE};

/// Keep only characters the interpreter can act on: loop markers, built-ins,
/// and the names in `extra`.
pub fn instructions_only(s: &str, extra: &[char]) -> String {
    s.chars()
        .filter(|c| matches!(c, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']') || extra.contains(c))
        .collect()
}
