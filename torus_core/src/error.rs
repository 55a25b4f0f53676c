// error.rs - Contract violations reported by the piece container

use thiserror::Error;

use crate::container::{Phase, PhaseState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid { columns: usize, rows: usize },

    #[error("line {line} has {found} cells, expected {expected}")]
    RaggedGrid { line: usize, expected: usize, found: usize },

    #[error("unknown color code {0:?}")]
    UnknownColor(char),

    #[error("grid is {columns}x{rows} but the container holds {expected_columns}x{expected_rows}")]
    DimensionMismatch {
        expected_columns: usize,
        expected_rows: usize,
        columns: usize,
        rows: usize,
    },

    #[error("cannot {phase} while {state}")]
    InvalidPhase { phase: Phase, state: PhaseState },

    #[error("pivot {pivot} is outside 0..{limit}")]
    PivotOutOfRange { pivot: usize, limit: usize },

    #[error("{phase} was cancelled")]
    Cancelled { phase: Phase },
}

pub type Result<T, E = PuzzleError> = std::result::Result<T, E>;
