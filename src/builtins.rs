//! The six primitive commands every interpreter understands.

use crate::io::DiagnosticKind;
use crate::machine::Machine;

/// Signature shared by the built-in commands.
pub type Builtin = fn(&mut Machine);

/// Built-in command table, in instruction-set order.
pub static BUILTINS: [(char, Builtin); 6] = [
    ('>', move_forward),
    ('<', move_backward),
    ('+', increment),
    ('-', decrement),
    ('.', output),
    (',', input),
];

/// Find the built-in command named `name`.
pub fn lookup(name: char) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|(n, _)| *n == name).map(|(_, f)| f)
}

pub fn is_builtin(name: char) -> bool {
    lookup(name).is_some()
}

/// `>`
pub fn move_forward(m: &mut Machine) {
    m.tape_mut().move_forward();
}

/// `<`
pub fn move_backward(m: &mut Machine) {
    m.tape_mut().move_backward();
}

/// `+`
pub fn increment(m: &mut Machine) {
    let value = m.get().wrapping_add(1);
    m.set(value);
}

/// `-`
pub fn decrement(m: &mut Machine) {
    let value = m.get().wrapping_sub(1);
    m.set(value);
}

/// `.` emits the raw integer under the pointer.
pub fn output(m: &mut Machine) {
    let value = m.get();
    m.emit(value);
}

/// `,` reads one line and stores it as a base-10 integer.
///
/// A missing line, a read error, or a non-numeric line is reported on the
/// diagnostic channel and leaves the cell untouched.
pub fn input(m: &mut Machine) {
    let line = match m.read_line() {
        Ok(Some(line)) => line,
        Ok(None) => {
            m.report(DiagnosticKind::InputExhausted);
            return;
        }
        Err(e) => {
            m.report(DiagnosticKind::InputRead(e.to_string()));
            return;
        }
    };

    let line = line.trim_end_matches(['\n', '\r']);
    match line.trim().parse::<i64>() {
        Ok(value) => m.set(value),
        Err(_) => m.report(DiagnosticKind::InvalidNumber { line: line.to_string() }),
    }
}
