use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Game already ended, no new moves are accepted")]
    TerminalState,
    #[error("Saved game rejected: {0}")]
    InvalidSave(#[from] SaveError),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board needs at least one row and one column")]
    EmptyBoard,
    #[error("at least one mine is required")]
    NoMines,
    #[error("too many mines, {requested} requested but at most {max} fit")]
    TooManyMines { requested: CellCount, max: CellCount },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("cell grid does not match the board size")]
    ShapeMismatch,
    #[error("adjacency count above 8")]
    AdjacencyOutOfRange,
    #[error("mine outside of the board")]
    MineOutOfRange,
    #[error("mine listed twice")]
    DuplicateMine,
    #[error("mine count does not match the configuration")]
    MineCountMismatch,
    #[error("status does not match the board")]
    InconsistentStatus,
}

pub type Result<T> = core::result::Result<T, GameError>;
