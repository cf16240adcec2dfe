use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// A cell that changed to opened, with the number it should display.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub coords: Coord2,
    pub value: u8,
}

/// Change-set produced by a single reveal action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub cells: Vec<RevealedCell>,
    pub score_delta: u64,
}

impl Reveal {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Opens `coords` and cascades through zero cells.
///
/// Does nothing when `coords` is outside the grid or not concealed. Flagged cells are never opened and stop the
/// cascade. Mine cells are skipped as well: checking for a hit mine is up to the caller, and a cascade can't reach
/// one since it only spreads from cells with no adjacent mines.
pub fn reveal(board: &Board, mask: &mut Mask, coords: Coord2, cell_score: u64) -> Reveal {
    debug_assert_eq!(board.size(), mask.size());

    let mut cells = Vec::new();
    let mut to_visit = vec![coords];

    while let Some(pos) = to_visit.pop() {
        let Some(Content::Clear(value)) = board.content(pos) else {
            continue;
        };
        if !mask.open(pos) {
            continue;
        }
        cells.push(RevealedCell { coords: pos, value });

        if value == 0 {
            to_visit.extend(
                board
                    .neighbors(pos)
                    .filter(|&next| mask.get(next) == Some(CellState::Concealed)),
            );
        }
    }

    let score_delta = (cells.len() as u64).saturating_mul(cell_score);
    Reveal { cells, score_delta }
}

/// Toggles a concealed cell to flagged and back, returns the new state or `None` when nothing changed.
pub fn toggle_flag(mask: &mut Mask, coords: Coord2) -> Option<CellState> {
    use CellState::*;

    let next = match mask.get(coords)? {
        Concealed => Flagged,
        Flagged => Concealed,
        Opened => return None,
    };
    mask.set(coords, next);
    Some(next)
}
