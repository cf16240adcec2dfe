use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Per-cell disclosure state, laid out exactly like the stage's [`Board`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    cells: Array2<CellState>,
}

impl Mask {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn get(&self, coords: Coord2) -> Option<CellState> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn count(&self, state: CellState) -> CellCount {
        self.cells.iter().filter(|&&cell| cell == state).count() as CellCount
    }

    pub(crate) fn cells(&self) -> &Array2<CellState> {
        &self.cells
    }

    /// Opens a concealed cell, returns whether anything changed.
    pub(crate) fn open(&mut self, coords: Coord2) -> bool {
        match self.cells.get_mut(coords.to_nd_index()) {
            Some(cell) if *cell == CellState::Concealed => {
                *cell = CellState::Opened;
                true
            }
            _ => false,
        }
    }

    /// Opens a cell whatever its state, used only to disclose mines at the end of a stage.
    pub(crate) fn force_open(&mut self, coords: Coord2) {
        if let Some(cell) = self.cells.get_mut(coords.to_nd_index()) {
            *cell = CellState::Opened;
        }
    }

    pub(crate) fn set(&mut self, coords: Coord2, state: CellState) {
        self.cells[coords.to_nd_index()] = state;
    }
}

impl Index<Coord2> for Mask {
    type Output = CellState;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
