use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a renderer needs to draw the current stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Coord2,
    pub stage: u32,
    pub mines_remaining: i32,
    pub score: u64,
    pub time_remaining: u32,
    pub active: bool,
    pub cells: Array2<CellView>,
    pub terminal: Option<Terminal>,
}

impl Snapshot {
    pub fn from_session(session: &GameSession) -> Self {
        let size = session.size();
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            session.cell_view((row as Coord, col as Coord))
        });

        Self {
            size,
            stage: session.stage(),
            mines_remaining: session.mines_left(),
            score: session.score(),
            time_remaining: session.time_remaining(),
            active: session.is_active(),
            cells,
            terminal: session.terminal(),
        }
    }

    pub fn cell(&self, coords: Coord2) -> CellView {
        self.cells
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or_default()
    }
}
