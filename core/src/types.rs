/// Single grid axis, used for row/column counts and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional position or size, always `(row, col)`.
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

/// Cell count of a `rows × cols` grid. Never overflows since both axes are `u8`.
pub const fn mult(rows: Coord, cols: Coord) -> CellCount {
    (rows as CellCount) * (cols as CellCount)
}

/// Whether `a` and `b` are the same cell or touch, diagonals included.
pub const fn is_within_one((r0, c0): Coord2, (r1, c1): Coord2) -> bool {
    r0.abs_diff(r1) <= 1 && c0.abs_diff(c1) <= 1
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

/// In-bounds 8-neighborhood of a cell.
///
/// Owns its bounds instead of borrowing the grid, so callers can mutate the grid while walking it.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    size: Coord2,
    next: usize,
}

impl Neighbors {
    pub const fn new(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            next: 0,
        }
    }

    fn offset(&self, (dr, dc): (i8, i8)) -> Option<Coord2> {
        let row = self.center.0.checked_add_signed(dr)?;
        let col = self.center.1.checked_add_signed(dc)?;
        (row < self.size.0 && col < self.size.1).then_some((row, col))
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = OFFSETS.get(self.next) {
            self.next += 1;
            if let Some(pos) = self.offset(delta) {
                return Some(pos);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(OFFSETS.len() - self.next))
    }
}
