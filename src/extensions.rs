//! Ready-made custom commands.
//!
//! None of these are registered by default; call [`register_stock`] or add
//! them one by one with [`Interpreter::add_command`].

use crate::error::RegistryError;
use crate::interpreter::Interpreter;
use crate::machine::Machine;

/// `*`: double the current cell.
pub fn double(m: &mut Machine) {
    let value = m.get().wrapping_mul(2);
    m.set(value);
}

/// `/`: halve the current cell, rounding toward zero.
pub fn halve(m: &mut Machine) {
    let value = m.get() / 2;
    m.set(value);
}

/// `_`: set the current cell to zero.
pub fn clear(m: &mut Machine) {
    m.set(0);
}

/// The stock commands with their instruction names.
pub const STOCK: [(char, fn(&mut Machine)); 3] = [('*', double), ('/', halve), ('_', clear)];

/// Register every stock command on `interpreter`.
///
/// Stops at the first name that is already taken.
pub fn register_stock(interpreter: &mut Interpreter) -> Result<(), RegistryError> {
    for (name, command) in STOCK {
        interpreter.add_command(name, command)?;
    }
    Ok(())
}
