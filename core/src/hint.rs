//! Payloads exchanged with an external hint service.
//!
//! The engine only builds [`HintRequest`]s and never talks to the service itself. Whatever text comes
//! back is display data for the presentation layer.

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::time::Duration;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the player can see of the board. Mine positions only appear once the game is lost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub flags: CellCount,
    pub status: GameStatus,
    pub cells: Array2<CellView>,
}

impl BoardSnapshot {
    pub fn of(session: &GameSession) -> Self {
        let board = session.board();
        let expose_mines = session.exposes_mines();
        let mut cells = Array2::from_elem(board.size().to_nd_index(), CellView::Hidden);
        for (pos, cell) in board.cells() {
            cells[pos.to_nd_index()] = cell.view(expose_mines);
        }

        Self {
            size: board.size(),
            mine_count: session.config().mines,
            flags: session.flags(),
            status: session.status(),
            cells,
        }
    }

    pub fn view(&self, pos: Coord2) -> Option<CellView> {
        self.cells.get(pos.to_nd_index()).copied()
    }

    /// Checks what a parsed snapshot can get wrong: the grid shape and impossible counts.
    pub fn validate(&self) -> Result<()> {
        let expected = (usize::from(self.size.0), usize::from(self.size.1));
        if self.cells.dim() != expected {
            return Err(SaveError::ShapeMismatch.into());
        }
        if self
            .cells
            .iter()
            .any(|view| matches!(view, CellView::Revealed(n) if *n > 8))
        {
            return Err(SaveError::AdjacencyOutOfRange.into());
        }
        Ok(())
    }
}

/// One text row per board row, see [`CellView::symbol`].
impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for view in row {
                write!(f, "{}", view.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HintRequest {
    pub snapshot: BoardSnapshot,
    pub elapsed: Duration,
}

impl HintRequest {
    /// Plain-text rendering for a language model prompt.
    pub fn prompt(&self) -> String {
        let snapshot = &self.snapshot;
        format!(
            "Minesweeper board, {} rows by {} columns, {} mines, {} flagged, {:?}, {}s elapsed.\n\
             Legend: # hidden, F flag, ? question mark, . empty, digit = adjacent mines, * mine.\n\
             {}",
            snapshot.size.0,
            snapshot.size.1,
            snapshot.mine_count,
            snapshot.flags,
            snapshot.status,
            self.elapsed.as_secs(),
            snapshot,
        )
    }
}

/// Opaque hint text. Never parsed by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResponse {
    pub text: String,
}

impl GameSession {
    /// Read-only request for the hint service.
    pub fn snapshot(&self) -> HintRequest {
        HintRequest {
            snapshot: BoardSnapshot::of(self),
            elapsed: self.elapsed(),
        }
    }
}
