//! Flood-fill reveal and chording over a [`Board`].
//!
//! Both operations only touch player state. Deciding what a revealed mine means is up to the caller.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::*;

/// Cells opened by a single reveal or chord.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Revealed {
    /// Newly revealed positions, in the order they were opened.
    pub cells: Vec<Coord2>,
    /// First mine that was opened, if any.
    pub mine: Option<Coord2>,
}

impl Revealed {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn merge(&mut self, other: Revealed) {
        self.cells.extend(other.cells);
        self.mine = self.mine.or(other.mine);
    }
}

/// Reveals `pos`, spreading across zero-adjacency regions.
///
/// Revealing a cell that is already revealed or flagged changes nothing and returns an empty set.
/// A mine is revealed alone, without spreading.
pub fn reveal(board: &mut Board, pos: Coord2) -> Result<Revealed> {
    let pos = board.validate_coords(pos)?;
    let mut out = Revealed::default();

    let cell = board.cell_at(pos);
    if !cell.state().is_revealable() {
        return Ok(out);
    }

    board.set_state(pos, CellState::Revealed);
    out.cells.push(pos);
    if cell.is_mine() {
        out.mine = Some(pos);
        return Ok(out);
    }
    if cell.adjacent_mines() != 0 {
        return Ok(out);
    }

    // cells are marked when pushed, so each one enters the worklist at most once
    let mut worklist = Vec::from([pos]);
    while let Some(zero) = worklist.pop() {
        for next in board.neighbors(zero) {
            let neighbor = board.cell_at(next);
            if !neighbor.state().is_revealable() || neighbor.is_mine() {
                continue;
            }

            board.set_state(next, CellState::Revealed);
            out.cells.push(next);
            log::trace!(
                "Flood revealed {:?}, adjacent mines: {}",
                next,
                neighbor.adjacent_mines()
            );

            if neighbor.adjacent_mines() == 0 {
                worklist.push(next);
            }
        }
    }

    log::debug!("Reveal at {:?} opened {} cells", pos, out.cells.len());
    Ok(out)
}

/// Whether `pos` is a revealed number with exactly as many flags around it.
pub fn is_chordable(board: &Board, pos: Coord2) -> bool {
    let cell = board.cell_at(pos);
    cell.state() == CellState::Revealed
        && !cell.is_mine()
        && cell.adjacent_mines() == board.count_neighbors_in(pos, CellState::Flagged)
}

/// Reveals every unflagged neighbor of a satisfied number, otherwise does nothing.
pub fn chord(board: &mut Board, pos: Coord2) -> Result<Revealed> {
    let pos = board.validate_coords(pos)?;
    let mut out = Revealed::default();
    if !is_chordable(board, pos) {
        return Ok(out);
    }

    let targets: SmallVec<[Coord2; 8]> = board
        .neighbors(pos)
        .filter(|&n| board.cell_at(n).state().is_revealable())
        .collect();
    for target in targets {
        out.merge(reveal(board, target)?);
    }
    Ok(out)
}
