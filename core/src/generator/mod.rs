use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, size: Coord2, mines: CellCount) -> Result<Board>;
}

/// How many mines fit on a grid once the 3×3 block around `safe` is kept clear.
pub fn placeable_cells(size: Coord2, safe: Coord2) -> CellCount {
    let (rows, cols) = size;
    mult(rows, cols).saturating_sub(block_cell_count(safe, size))
}
