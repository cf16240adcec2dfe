use ndarray::Array2;

/// Single grid axis, used for row/column indices and grid dimensions.
pub type Coord = u8;

/// Count type used for mine counts and cell totals.
pub type CellCount = u16;

/// Grid position or size as `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub const fn contains(size: Coord2, (row, col): Coord2) -> bool {
    row < size.0 && col < size.1
}

/// Grid dimensions of an array as `(rows, cols)`, saturated to [`Coord`].
pub fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (rows, cols) = grid.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        cols.try_into().unwrap_or(Coord::MAX),
    )
}

/// Number of cells in the 3×3 block centered at `center`, clipped to the grid.
pub fn block_cell_count(center: Coord2, size: Coord2) -> CellCount {
    let in_grid = Neighbors::new(center, size).count() as CellCount;
    if contains(size, center) {
        in_grid + 1
    } else {
        in_grid
    }
}

/// Whether `a` lies in the 3×3 block centered at `b`.
pub const fn is_within_block(a: Coord2, b: Coord2) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}

pub trait NeighborsExt {
    fn neighbors(&self, center: Coord2) -> Neighbors;
}

impl<T> NeighborsExt for Array2<T> {
    fn neighbors(&self, center: Coord2) -> Neighbors {
        Neighbors::new(center, grid_size(self))
    }
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The up-to-eight grid cells surrounding a center cell, edge-clipped.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    size: Coord2,
    next: usize,
}

impl Neighbors {
    pub fn new(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            next: 0,
        }
    }

    fn offset(&self, (d_row, d_col): (i8, i8)) -> Option<Coord2> {
        let row = self.center.0.checked_add_signed(d_row)?;
        let col = self.center.1.checked_add_signed(d_col)?;
        contains(self.size, (row, col)).then_some((row, col))
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = OFFSETS.get(self.next) {
            self.next += 1;
            if let Some(coords) = self.offset(delta) {
                return Some(coords);
            }
        }
        None
    }
}
