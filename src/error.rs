use std::fmt;

/// Errors raised while executing a program.
///
/// Every variant is fatal for the current execution and carries the
/// zero-based character position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// Encountered a character that is neither a registered command nor a loop marker.
    #[error("unknown command '{ch}' at position {position}")]
    UnknownCommand { ch: char, position: usize },

    /// A `[` has no matching `]` before the end of the program.
    #[error("no matching ']' for the loop opened at position {position}")]
    UnmatchedOpenMarker { position: usize },

    /// A `]` was reached with no active loop to return to.
    #[error("']' at position {position} has no matching '['")]
    UnmatchedCloseMarker { position: usize },
}

impl ExecutionError {
    /// Position in the program buffer the error refers to.
    pub fn position(&self) -> usize {
        match self {
            ExecutionError::UnknownCommand { position, .. }
            | ExecutionError::UnmatchedOpenMarker { position }
            | ExecutionError::UnmatchedCloseMarker { position } => *position,
        }
    }
}

/// Misuse of the command registry by the embedding code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("command '{name}' already exists in {partition} commands")]
    DuplicateCommand { name: char, partition: Partition },

    #[error("command '{name}' does not exist in custom commands")]
    UnknownCommand { name: char },

    /// `[` and `]` drive control flow and can never be commands.
    #[error("'{name}' is a reserved loop marker and cannot be registered")]
    ReservedName { name: char },
}

/// Which half of the registry a name collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Builtin,
    Custom,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Builtin => write!(f, "default"),
            Partition::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TapeError {
    #[error("tape must have at least one cell")]
    EmptyTape,

    #[error("cannot allocate a tape of {size} cells")]
    TooLarge { size: usize },
}
