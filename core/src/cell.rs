use serde::{Deserialize, Serialize};

/// Player-facing state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
    QuestionMarked,
}

impl CellState {
    /// Cells the reveal engine is allowed to open. A question mark does not protect a cell, a flag does.
    pub const fn is_revealable(self) -> bool {
        matches!(self, Self::Hidden | Self::QuestionMarked)
    }
}

/// One grid position: whether it holds a mine, how many neighbors do, and what the player sees.
///
/// The adjacency count is computed once when mines are placed and never changes afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mine: bool,
    pub(crate) adjacent: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    /// What may be shown for this cell. Mines stay hidden unless `expose_mines` is set.
    pub const fn view(&self, expose_mines: bool) -> CellView {
        match (self.state, self.mine) {
            (_, true) if expose_mines => CellView::Mine,
            (CellState::Revealed, true) => CellView::Mine,
            (CellState::Revealed, false) => CellView::Revealed(self.adjacent),
            (CellState::Hidden, _) => CellView::Hidden,
            (CellState::Flagged, _) => CellView::Flagged,
            (CellState::QuestionMarked, _) => CellView::QuestionMarked,
        }
    }
}

/// Redacted cell as handed to collaborators outside the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    QuestionMarked,
    Revealed(u8),
    Mine,
}

impl CellView {
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => '#',
            Self::Flagged => 'F',
            Self::QuestionMarked => '?',
            Self::Revealed(0) => '.',
            Self::Revealed(n) => match char::from_digit(n as u32, 10) {
                Some(digit) => digit,
                None => '?',
            },
            Self::Mine => '*',
        }
    }
}
