use ndarray::Array2;

use crate::*;

/// Grid of cells plus running counters.
///
/// Before mines are placed the board is a placeholder with an empty layout: players may already mark
/// cells on it, but nothing can be revealed until [`Board::arm`] installs the real layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    layout: MineLayout,
    cells: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    armed: bool,
    created_at: u64,
}

impl Board {
    pub fn new(layout: MineLayout) -> Self {
        let mut board = Self::placeholder(layout.size());
        board.arm(layout);
        board
    }

    pub fn placeholder(size: Coord2) -> Self {
        Self {
            layout: MineLayout::empty(size),
            cells: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            armed: false,
            created_at: unix_millis(),
        }
    }

    /// Installs the mine layout and computes every adjacency count. Player marks are kept.
    pub(crate) fn arm(&mut self, layout: MineLayout) {
        debug_assert_eq!(layout.size(), self.size());
        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            let pos = (row as Coord, col as Coord);
            cell.mine = layout.contains_mine(pos);
            cell.adjacent = layout.adjacent_mine_count(pos);
        }
        self.layout = layout;
        self.armed = true;
        log::debug!(
            "Board armed: {:?} with {} mines",
            self.size(),
            self.layout.mine_count()
        );
    }

    pub(crate) fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn mine_count(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.layout.safe_cell_count()
    }

    /// Revealed cells that are not mines.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Unix timestamp in milliseconds of when the board was created.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Every safe cell has been revealed.
    pub fn is_cleared(&self) -> bool {
        self.armed && self.revealed_count == self.safe_cell_count()
    }

    pub fn validate_coords(&self, pos: Coord2) -> Result<Coord2> {
        self.layout.validate_coords(pos)
    }

    pub fn cell(&self, pos: Coord2) -> Result<Cell> {
        let pos = self.validate_coords(pos)?;
        Ok(self.cell_at(pos))
    }

    pub(crate) fn cell_at(&self, pos: Coord2) -> Cell {
        self.cells[pos.to_nd_index()]
    }

    pub fn neighbors(&self, pos: Coord2) -> Neighbors {
        self.layout.neighbors(pos)
    }

    pub fn count_neighbors_in(&self, pos: Coord2, state: CellState) -> u8 {
        self.neighbors(pos)
            .filter(|&n| self.cell_at(n).state == state)
            .count() as u8
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    /// The only way player state changes, keeps the counters in step.
    pub(crate) fn set_state(&mut self, pos: Coord2, state: CellState) {
        let cell = &mut self.cells[pos.to_nd_index()];
        let previous = core::mem::replace(&mut cell.state, state);
        if previous == state {
            return;
        }
        let mine = cell.mine;

        match previous {
            CellState::Revealed if !mine => self.revealed_count -= 1,
            CellState::Flagged => self.flagged_count -= 1,
            _ => {}
        }
        match state {
            CellState::Revealed if !mine => self.revealed_count += 1,
            CellState::Flagged => self.flagged_count += 1,
            _ => {}
        }
    }
}

#[cfg(feature = "std")]
fn unix_millis() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// No wall clock without `std`.
#[cfg(not(feature = "std"))]
fn unix_millis() -> u64 {
    0
}
