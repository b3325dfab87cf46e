use std::io::{self, Write};

use crate::error::ExecutionError;

/// Pretty-print an [`ExecutionError`] with caret positioning.
/// If `program` is `Some("tapebf")`, prefix messages with "tapebf: ..." for CLI run mode
pub fn print_execution_error(program: Option<&str>, code: &str, err: &ExecutionError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    let msg = match err {
        ExecutionError::UnknownCommand { ch, .. } => {
            prefix_program(&format!("Syntax error: unknown command '{ch}'"))
        }
        ExecutionError::UnmatchedOpenMarker { .. } => {
            prefix_program("Syntax error: no matching ']' for loop")
        }
        ExecutionError::UnmatchedCloseMarker { .. } => {
            prefix_program("Syntax error: ']' without matching '['")
        }
    };
    print_error_with_context(&msg, code, err.position());
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    let mut stderr = io::stderr().lock();
    let _ = write_error_with_context(&mut stderr, prefix, code, pos);
    let _ = stderr.flush();
}

/// Write the error line, a context window of up to 32 chars each side, and a caret line.
pub fn write_error_with_context<W: Write>(out: &mut W, prefix: &str, code: &str, pos: usize) -> io::Result<()> {
    writeln!(out, "{prefix} at position {pos}")?;

    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    // Newlines inside the window would break the caret alignment.
    let slice: String = code[start_byte..end_byte]
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();

    writeln!(out, "  {slice}")?;

    let caret_offset_chars = pos.saturating_sub(start_char);
    writeln!(out, "  {}^", " ".repeat(caret_offset_chars))
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(b, _)| b).unwrap_or(s.len())
}
