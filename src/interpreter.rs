//! The execution engine.
//!
//! An [`Interpreter`] owns a [`Machine`] (tape plus I/O channels) and a
//! [`CommandRegistry`]. [`Interpreter::execute`] walks the program once, left
//! to right, dispatching registered commands and resolving loops with an
//! explicit stack of loop-header positions.

use std::io::Write;

use crate::error::{ExecutionError, RegistryError, TapeError};
use crate::io::{Diagnostic, InputSource, OutputSink};
use crate::loops::{find_matching_close, LOOP_CLOSE, LOOP_OPEN};
use crate::machine::Machine;
use crate::registry::CommandRegistry;
use crate::tape::{CellMode, Tape, DEFAULT_TAPE_SIZE};

/// Construction options for an [`Interpreter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub tape_size: usize,
    pub cell_mode: CellMode,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            cell_mode: CellMode::Unbounded,
        }
    }
}

impl InterpreterConfig {
    pub fn tape_size(mut self, tape_size: usize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn cell_mode(mut self, cell_mode: CellMode) -> Self {
        self.cell_mode = cell_mode;
        self
    }
}

/// An extensible interpreter over a circular integer tape.
///
/// Tape contents survive between calls to [`execute`](Self::execute); use
/// [`reset`](Self::reset) for a fresh tape. Custom commands are private to the
/// instance.
pub struct Interpreter {
    machine: Machine,
    registry: CommandRegistry,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter with a 30,000-cell unbounded tape, stdout output and stdin input.
    pub fn new() -> Self {
        Self::from_tape(Tape::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Result<Self, TapeError> {
        let tape = Tape::new(config.tape_size, config.cell_mode)?;
        Ok(Self::from_tape(tape))
    }

    fn from_tape(tape: Tape) -> Self {
        Self {
            machine: Machine::new(tape),
            registry: CommandRegistry::new(),
        }
    }

    /// Route values produced by `.` to `sink` instead of stdout.
    pub fn set_output_sink<S>(&mut self, sink: S)
    where
        S: OutputSink + 'static,
    {
        self.machine.set_output(Box::new(sink));
    }

    /// Read lines for `,` from `source` instead of stdin.
    pub fn set_input_source<S>(&mut self, source: S)
    where
        S: InputSource + 'static,
    {
        self.machine.set_input(Box::new(source));
    }

    /// Receive input-command failures in addition to the `warn` log line.
    pub fn set_diagnostic_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&Diagnostic) + 'static,
    {
        self.machine.set_diagnostics(Box::new(hook));
    }

    /// Register `command` under `name`.
    ///
    /// Fails if `name` is a built-in, already registered, or a loop marker.
    pub fn add_command<F>(&mut self, name: char, command: F) -> Result<(), RegistryError>
    where
        F: Fn(&mut Machine) + 'static,
    {
        self.registry.add_custom(name, Box::new(command))
    }

    pub fn remove_command(&mut self, name: char) -> Result<(), RegistryError> {
        self.registry.remove_custom(name)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn tape(&self) -> &Tape {
        self.machine.tape()
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Zero the tape and move the pointer back to the first cell.
    pub fn reset(&mut self) {
        self.machine.tape_mut().reset();
    }

    /// Run `program` to completion.
    pub fn execute(&mut self, program: &str) -> Result<(), ExecutionError> {
        self.run(program, None)
    }

    /// Run `program` like [`execute`](Self::execute), writing one table row per step to `trace`.
    ///
    /// Failures writing the trace are ignored; I/O commands still use the
    /// configured sink and source.
    pub fn execute_traced<W: Write>(&mut self, program: &str, trace: &mut W) -> Result<(), ExecutionError> {
        self.run(program, Some(trace as &mut dyn Write))
    }

    fn run(&mut self, program: &str, mut trace: Option<&mut dyn Write>) -> Result<(), ExecutionError> {
        let code: Vec<char> = program.chars().collect();
        // Positions of the `[` for every loop currently being executed.
        let mut stack: Vec<usize> = Vec::new();
        let mut idx = 0usize;
        let mut step = 0usize;

        tracing::debug!(len = code.len(), tape = self.machine.tape().len(), "execution started");

        if let Some(out) = trace.as_mut() {
            let _ = writeln!(out, "STEP | IP  | PTR | CELL | INSTR | ACTION");
            let _ = writeln!(out, "-----+-----+-----+------+-------+------------------------------------------------");
        }

        let result = loop {
            let Some(&instr) = code.get(idx) else {
                break Ok(());
            };
            let (ptr_before, cell_before) = (self.machine.tape().pointer(), self.machine.get());
            let mut action = String::new();
            let next;

            if let Some(command) = self.registry.resolve(instr) {
                self.machine.set_position(Some(idx));
                command(&mut self.machine);
                self.machine.set_position(None);
                if trace.is_some() {
                    action = self.describe(instr, ptr_before, cell_before);
                }
                next = idx + 1;
            } else if instr == LOOP_OPEN {
                let close = match find_matching_close(&code, idx) {
                    Ok(close) => close,
                    Err(e) => break Err(e),
                };
                if cell_before != 0 {
                    stack.push(idx);
                    tracing::trace!(open = idx, close, "enter loop");
                    if trace.is_some() {
                        action = format!("Cell != 0; enter loop (matching ']' at IP {close})");
                    }
                    next = idx + 1;
                } else {
                    tracing::trace!(open = idx, close, "skip loop");
                    if trace.is_some() {
                        action = format!("Cell is 0; jump past matching ']' at IP {close}");
                    }
                    next = close + 1;
                }
            } else if instr == LOOP_CLOSE {
                let Some(open) = stack.pop() else {
                    break Err(ExecutionError::UnmatchedCloseMarker { position: idx });
                };
                if trace.is_some() {
                    action = format!("Return to loop header at IP {open}");
                }
                next = open;
            } else {
                break Err(ExecutionError::UnknownCommand { ch: instr, position: idx });
            }

            if let Some(out) = trace.as_mut() {
                let _ = writeln!(
                    out,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    step, idx, ptr_before, cell_before, instr, action
                );
            }

            step += 1;
            idx = next;
        };

        match &result {
            Ok(()) => tracing::debug!(steps = step, "execution finished"),
            Err(e) => tracing::debug!(steps = step, error = %e, "execution aborted"),
        }
        result
    }

    fn describe(&self, instr: char, ptr_before: usize, cell_before: i64) -> String {
        let (ptr, cell) = (self.machine.tape().pointer(), self.machine.get());
        match instr {
            '>' | '<' => format!("Moved pointer head to index {ptr}"),
            '+' => format!("Increment cell[{ptr_before}] from {cell_before} to {cell}"),
            '-' => format!("Decrement cell[{ptr_before}] from {cell_before} to {cell}"),
            '.' => format!("Output value {cell}"),
            ',' if cell == cell_before => format!("Read input -> cell[{ptr}] unchanged ({cell})"),
            ',' => format!("Read input -> cell[{ptr}] = {cell}"),
            _ => format!("Custom command '{instr}': ptr {ptr_before} -> {ptr}, cell {cell_before} -> {cell}"),
        }
    }
}
