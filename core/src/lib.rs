#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use mask::*;
pub use outcome::*;
pub use session::*;
pub use snapshot::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod game;
mod generator;
mod mask;
mod outcome;
mod session;
mod snapshot;
mod tile;
mod timer;
mod types;

/// Tunable constants of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Grid dimensions as `(rows, cols)`
    pub size: Coord2,
    /// Time on the clock when a stage starts
    pub initial_time: u32,
    /// Time added by every reveal that opens at least one cell
    pub time_bonus: u32,
    /// Score for each opened cell
    pub cell_score: u64,
    /// Mines on stage 1
    pub base_mines: CellCount,
    /// Extra mines for each following stage
    pub mines_per_stage: CellCount,
    /// Mine count never grows past this
    pub max_mines: CellCount,
}

impl Rules {
    pub const CLASSIC: Self = Self {
        size: (20, 30),
        initial_time: 10,
        time_bonus: 10,
        cell_score: 100,
        base_mines: 120,
        mines_per_stage: 10,
        max_mines: 300,
    };

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// `min(base + step * (stage - 1), max)`, stages start at 1 and are unbounded.
    pub fn mines_for_stage(&self, stage: u32) -> CellCount {
        let extra = u64::from(stage.saturating_sub(1)) * u64::from(self.mines_per_stage);
        let mines = u64::from(self.base_mines)
            .saturating_add(extra)
            .min(u64::from(self.max_mines));
        mines as CellCount
    }

    /// Checks that every stage leaves room for a full safe zone wherever the first reveal lands.
    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.size;
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }

        let widest_block = mult(rows.min(3), cols.min(3));
        let capacity = self.total_cells() - widest_block;
        let requested = self.mines_for_stage(u32::MAX);
        if requested > capacity {
            log::warn!(
                "Rejecting rules, up to {} mines on a {}x{} grid that fits {}",
                requested,
                rows,
                cols,
                capacity
            );
            return Err(GameError::TooManyMines {
                requested,
                capacity,
            });
        }

        Ok(())
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mine_count_grows_linearly_up_to_the_cap() {
        let rules = Rules::CLASSIC;

        assert_eq!(rules.mines_for_stage(1), 120);
        assert_eq!(rules.mines_for_stage(2), 130);
        assert_eq!(rules.mines_for_stage(18), 290);
        assert_eq!(rules.mines_for_stage(19), 300);
        assert_eq!(rules.mines_for_stage(20), 300);
        assert_eq!(rules.mines_for_stage(u32::MAX), 300);
    }

    #[test]
    fn mine_count_always_leaves_safe_cells() {
        let rules = Rules::CLASSIC;
        for stage in 1..=100 {
            let mines = rules.mines_for_stage(stage);
            assert_eq!(mines, (120 + 10 * (stage as u16 - 1)).min(300));
            assert!(mines < rules.total_cells());
        }
    }

    #[test]
    fn classic_rules_are_valid() {
        assert_eq!(Rules::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_rules_without_room_for_a_safe_zone() {
        let crowded = Rules {
            max_mines: 592,
            ..Rules::CLASSIC
        };
        assert_eq!(
            crowded.validate(),
            Err(GameError::TooManyMines {
                requested: 592,
                capacity: 591,
            })
        );

        let empty = Rules {
            size: (0, 30),
            ..Rules::CLASSIC
        };
        assert_eq!(empty.validate(), Err(GameError::EmptyBoard));
    }

    #[test]
    fn small_grids_account_for_clipped_safe_zone() {
        let strip = Rules {
            size: (1, 10),
            base_mines: 7,
            mines_per_stage: 0,
            max_mines: 7,
            ..Rules::CLASSIC
        };
        assert_eq!(strip.validate(), Ok(()));
    }
}
