#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use hint::*;
pub use layout::*;
pub use reveal::Revealed;
pub use save::*;
pub use session::*;
#[cfg(feature = "std")]
pub use shared::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod event;
mod generator;
mod hint;
mod layout;
pub mod reveal;
mod save;
mod session;
#[cfg(feature = "std")]
mod shared;
mod types;

/// Cells kept free around the first click: the click itself plus its 8 neighbors.
pub const SAFE_ZONE: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    /// Enough room must remain for mines after reserving the first click's neighborhood.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        if self.mines == 0 {
            return Err(ConfigError::NoMines.into());
        }
        let max = Self::max_mines(self.size);
        if self.mines > max {
            return Err(ConfigError::TooManyMines {
                requested: self.mines,
                max,
            }
            .into());
        }
        Ok(())
    }

    pub const fn max_mines((rows, cols): Coord2) -> CellCount {
        mult(rows, cols).saturating_sub(SAFE_ZONE + 1)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Custom(GameConfig),
}

impl Difficulty {
    pub fn custom(size: Coord2, mines: CellCount) -> Result<Self> {
        GameConfig::new(size, mines).map(Self::Custom)
    }

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Self::Expert => GameConfig::new_unchecked((16, 30), 99),
            Self::Custom(config) => config,
        }
    }

    /// Stable name, also used as the score table key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
            Self::Custom(_) => "Custom",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Result of a command plus the events the presentation layer should apply.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandOutcome<O> {
    pub outcome: O,
    pub events: Vec<GameEvent>,
}

impl<O> CommandOutcome<O> {
    pub(crate) fn unchanged(outcome: O) -> Self {
        Self {
            outcome,
            events: Vec::new(),
        }
    }
}
