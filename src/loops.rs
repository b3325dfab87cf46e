use crate::error::ExecutionError;

pub const LOOP_OPEN: char = '[';
pub const LOOP_CLOSE: char = ']';

/// Find the `]` matching the `[` at `start` by counting nesting depth.
///
/// The scan only moves forward and stops at the end of `program`; running off
/// the end is an [`ExecutionError::UnmatchedOpenMarker`] for `start`.
pub fn find_matching_close(program: &[char], start: usize) -> Result<usize, ExecutionError> {
    let mut depth = 1usize;
    let mut idx = start;

    while depth > 0 {
        idx += 1;
        match program.get(idx) {
            None => return Err(ExecutionError::UnmatchedOpenMarker { position: start }),
            Some(&LOOP_OPEN) => depth += 1,
            Some(&LOOP_CLOSE) => depth -= 1,
            Some(_) => {}
        }
    }

    Ok(idx)
}
