use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::TapeError;

/// Number of cells on a tape unless configured otherwise.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// How values are stored into cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellMode {
    /// Values are stored as given.
    #[default]
    Unbounded,
    /// Values are reduced into `0..=255`, classic byte-cell behavior.
    Byte,
}

impl CellMode {
    fn normalize(self, value: i64) -> i64 {
        match self {
            CellMode::Unbounded => value,
            CellMode::Byte => value.rem_euclid(256),
        }
    }
}

impl FromStr for CellMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unbounded" => Ok(CellMode::Unbounded),
            "byte" => Ok(CellMode::Byte),
            other => Err(format!("invalid cell mode '{other}', must be 'unbounded' or 'byte'")),
        }
    }
}

impl fmt::Display for CellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellMode::Unbounded => write!(f, "unbounded"),
            CellMode::Byte => write!(f, "byte"),
        }
    }
}

/// A fixed-size circular tape of integer cells with a single pointer.
///
/// The pointer never leaves the tape: moving past either end wraps around.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<i64>,
    pointer: usize,
    mode: CellMode,
}

impl Default for Tape {
    /// A [`DEFAULT_TAPE_SIZE`]-cell tape in unbounded mode.
    fn default() -> Self {
        Self {
            cells: vec![0; DEFAULT_TAPE_SIZE],
            pointer: 0,
            mode: CellMode::Unbounded,
        }
    }
}

impl Tape {
    pub fn new(size: usize, mode: CellMode) -> Result<Self, TapeError> {
        if size == 0 {
            return Err(TapeError::EmptyTape);
        }
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| TapeError::TooLarge { size })?;
        cells.resize(size, 0);
        Ok(Self { cells, pointer: 0, mode })
    }

    pub fn move_forward(&mut self) {
        if self.pointer == self.cells.len() - 1 {
            self.pointer = 0;
        } else {
            self.pointer += 1;
        }
    }

    pub fn move_backward(&mut self) {
        if self.pointer == 0 {
            self.pointer = self.cells.len() - 1;
        } else {
            self.pointer -= 1;
        }
    }

    /// Value of the cell under the pointer.
    pub fn get(&self) -> i64 {
        self.cells[self.pointer]
    }

    /// Store `value` into the cell under the pointer.
    pub fn set(&mut self, value: i64) {
        self.cells[self.pointer] = self.mode.normalize(value);
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn mode(&self) -> CellMode {
        self.mode
    }

    pub fn cells(&self) -> &[i64] {
        &self.cells
    }

    /// Page-aligned view of `size` cells containing the pointer.
    ///
    /// Returns `(base, slice)` where `base` is the index of the first cell in the slice.
    pub fn window(&self, size: usize) -> (usize, &[i64]) {
        let size = size.max(1);
        let base = self.pointer - self.pointer % size;
        let end = (base + size).min(self.cells.len());
        (base, &self.cells[base..end])
    }

    /// Zero every cell and return the pointer to the first one.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0);
        self.pointer = 0;
    }
}
