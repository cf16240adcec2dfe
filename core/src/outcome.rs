use serde::{Deserialize, Serialize};

use crate::*;

/// Payload reported when a stage ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub won: bool,
    pub timed_out: bool,
    /// Mine that was revealed, absent for wins and timeouts.
    pub hit: Option<Coord2>,
    pub final_score: u64,
}

impl Terminal {
    pub const fn cleared(final_score: u64) -> Self {
        Self {
            won: true,
            timed_out: false,
            hit: None,
            final_score,
        }
    }

    pub const fn hit_mine(coords: Coord2, final_score: u64) -> Self {
        Self {
            won: false,
            timed_out: false,
            hit: Some(coords),
            final_score,
        }
    }

    pub const fn timed_out(final_score: u64) -> Self {
        Self {
            won: false,
            timed_out: true,
            hit: None,
            final_score,
        }
    }
}

/// Number of safe cells that have been opened.
pub fn opened_safe_cells(board: &Board, mask: &Mask) -> CellCount {
    board
        .cells()
        .iter()
        .zip(mask.cells().iter())
        .filter(|&(content, &state)| !content.is_mine() && state == CellState::Opened)
        .count() as CellCount
}

/// Whether every safe cell of the board has been opened.
pub fn is_cleared(board: &Board, mask: &Mask) -> bool {
    opened_safe_cells(board, mask) == board.safe_cell_count()
}

/// Forces every mine open so it can be shown once the stage is lost.
pub fn disclose_mines(board: &Board, mask: &mut Mask) {
    for pos in board.mines() {
        mask.force_open(pos);
    }
}
