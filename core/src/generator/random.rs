use alloc::vec::Vec;

use super::*;

/// Uniformly random placement that keeps the 3×3 block around the first reveal mine-free.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
    safe: Coord2,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64, safe: Coord2) -> Self {
        Self { seed, safe }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, size: Coord2, mines: CellCount) -> Result<Board> {
        use rand::prelude::*;

        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let capacity = placeable_cells(size, self.safe);
        if mines > capacity {
            log::warn!(
                "Refusing to generate board, requested {} mines but only {} fit",
                mines,
                capacity
            );
            return Err(GameError::TooManyMines {
                requested: mines,
                capacity,
            });
        }

        let mut candidates: Vec<Coord2> = (0..size.0)
            .flat_map(|row| (0..size.1).map(move |col| (row, col)))
            .filter(|&coords| !is_within_block(coords, self.safe))
            .collect();

        // partial shuffle, the first `mines` slots end up as a uniform sample
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mines = usize::from(mines);
        for i in 0..mines {
            let j = rng.random_range(i..candidates.len());
            candidates.swap(i, j);
        }

        let board = Board::from_mine_coords(size, &candidates[..mines])?;
        log::debug!(
            "Generated {}x{} board with {} mines, safe zone at {:?}",
            size.0,
            size.1,
            board.mine_count(),
            self.safe
        );
        Ok(board)
    }
}
