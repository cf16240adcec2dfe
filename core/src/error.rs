use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines, requested {requested} but only {capacity} cells can hold one")]
    TooManyMines {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Stage has not been cleared yet")]
    StageNotCleared,
}

pub type Result<T> = core::result::Result<T, GameError>;
