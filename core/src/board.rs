use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mine layout and adjacency numbers of one stage. Never changes after generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Content>,
    mine_count: CellCount,
}

impl Board {
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let size = grid_size(mine_mask);
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut mine_count: CellCount = 0;
        let cells = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[[row, col]] {
                mine_count += 1;
                return Content::Mine;
            }
            let adjacent = mine_mask
                .neighbors((row as Coord, col as Coord))
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            Content::Clear(adjacent as u8)
        });

        Ok(Self { cells, mine_count })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !contains(size, coords) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn content(&self, coords: Coord2) -> Option<Content> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn is_mine(&self, coords: Coord2) -> bool {
        matches!(self.content(coords), Some(Content::Mine))
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, content)| content.is_mine())
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn cells(&self) -> &Array2<Content> {
        &self.cells
    }

    pub(crate) fn neighbors(&self, coords: Coord2) -> Neighbors {
        self.cells.neighbors(coords)
    }
}

impl Index<Coord2> for Board {
    type Output = Content;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
