use alloc::vec::Vec;
use core::ops::Index;

use ndarray::Array2;

use crate::*;

/// Where the mines are. Carries no player state.
#[derive(Clone, Debug, PartialEq)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    size: Coord2,
    mine_count: CellCount,
}

impl MineLayout {
    /// Layout with no mines at all, used as a placeholder before the first reveal.
    pub fn empty(size: Coord2) -> Self {
        Self {
            mine_mask: Array2::default(size.to_nd_index()),
            size,
            mine_count: 0,
        }
    }

    /// Builds a layout from explicit mine positions. Repeated positions count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut layout = Self::empty(size);
        for &pos in mine_coords {
            let pos = layout.validate_coords(pos)?;
            let slot = &mut layout.mine_mask[pos.to_nd_index()];
            if !*slot {
                *slot = true;
                layout.mine_count += 1;
            }
        }
        Ok(layout)
    }

    pub fn validate_coords(&self, pos: Coord2) -> Result<Coord2> {
        if pos.0 < self.size.0 && pos.1 < self.size.1 {
            Ok(pos)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, pos: Coord2) -> bool {
        self[pos]
    }

    pub fn adjacent_mine_count(&self, pos: Coord2) -> u8 {
        // at most 8 neighbors, the cast is lossless
        self.neighbors(pos).filter(|&n| self[n]).count() as u8
    }

    pub fn neighbors(&self, pos: Coord2) -> Neighbors {
        Neighbors::new(pos, self.size)
    }

    /// Mine positions in row-major order.
    pub fn mine_coords(&self) -> Vec<Coord2> {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &mine)| mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, pos: Coord2) -> &Self::Output {
        &self.mine_mask[pos.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_unique_mines() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2), (0, 0)]).unwrap();
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert_eq!(layout.mine_coords(), [(0, 0), (2, 2)]);
    }

    #[test]
    fn rejects_out_of_range_mine() {
        assert_eq!(
            MineLayout::from_mine_coords((3, 3), &[(3, 0)]),
            Err(GameError::InvalidPosition)
        );
    }

    #[test]
    fn adjacency_counts_diagonals() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (0, 2), (2, 1)]).unwrap();
        assert_eq!(layout.adjacent_mine_count((1, 1)), 3);
        assert_eq!(layout.adjacent_mine_count((0, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 2)), 1);
    }
}
