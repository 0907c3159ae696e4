use serde::{Deserialize, Serialize};
use sweeper_core::*;

use crate::ScoreRecord;

/// Input from the presentation layer, one JSON object per command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// A missing seed is taken from the clock.
    NewGame {
        #[serde(default)]
        difficulty: Difficulty,
        #[serde(default)]
        seed: Option<u64>,
    },
    Reveal { row: Coord, col: Coord },
    Flag { row: Coord, col: Coord },
    Mark { row: Coord, col: Coord },
    Chord { row: Coord, col: Coord },
    Tick { millis: u64 },
    RequestHint,
    Save,
}

/// Why a command was refused. The game is unchanged whenever one of these is sent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Malformed,
    InvalidConfiguration,
    InvalidPosition,
    TerminalState,
    InvalidSave,
    HintFailed,
}

impl From<&GameError> for RejectReason {
    fn from(err: &GameError) -> Self {
        match err {
            GameError::InvalidConfiguration(_) => Self::InvalidConfiguration,
            GameError::InvalidPosition => Self::InvalidPosition,
            GameError::TerminalState => Self::TerminalState,
            GameError::InvalidSave(_) => Self::InvalidSave,
        }
    }
}

/// Output towards the presentation layer, one JSON object per event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Cell { row: Coord, col: Coord, view: CellView },
    Status { status: GameStatus },
    Counters { moves: u32, flags: CellCount, mines_left: i32 },
    Tick { elapsed_ms: u64 },
    Hint { text: String },
    HintUnavailable,
    Saved { game: Box<SavedGame> },
    Score { record: ScoreRecord },
    Rejected { reason: RejectReason, message: String },
}

impl Event {
    pub fn rejected(reason: RejectReason, err: impl ToString) -> Self {
        Self::Rejected {
            reason,
            message: err.to_string(),
        }
    }
}

impl From<GameEvent> for Event {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::CellChanged {
                pos: (row, col),
                view,
            } => Self::Cell { row, col, view },
            GameEvent::StatusChanged { status } => Self::Status { status },
            GameEvent::CountersChanged {
                moves,
                flags,
                mines_left,
            } => Self::Counters {
                moves,
                flags,
                mines_left,
            },
            GameEvent::Tick { elapsed } => Self::Tick {
                elapsed_ms: elapsed.as_millis() as u64,
            },
        }
    }
}

impl From<&GameError> for Event {
    fn from(err: &GameError) -> Self {
        Self::rejected(err.into(), err)
    }
}
