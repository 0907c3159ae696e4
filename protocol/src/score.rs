//! Scoreboard entries for won games.
//!
//! Storage belongs to the host. This module only shapes the record and orders a board of them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sweeper_core::{GameSession, ScoreSummary};

/// Entries kept per difficulty by [`Scoreboard`].
pub const BOARD_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Difficulty name, the key scores are grouped by.
    pub difficulty: String,
    pub time: Duration,
    pub moves: u32,
    pub achieved_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(summary: ScoreSummary, achieved_at: DateTime<Utc>) -> Self {
        Self {
            difficulty: summary.difficulty.name().to_owned(),
            time: summary.elapsed,
            moves: summary.moves,
            achieved_at,
        }
    }

    /// Record for a won session, stamped now. `None` unless the game was won.
    pub fn of(session: &GameSession) -> Option<Self> {
        session
            .score()
            .map(|summary| Self::new(summary, Utc::now()))
    }

    /// Faster first, then fewer moves, then earlier.
    fn ranks_before(&self, other: &Self) -> bool {
        (self.time, self.moves, self.achieved_at) < (other.time, other.moves, other.achieved_at)
    }
}

/// Best scores for one difficulty, best first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    top: Vec<ScoreRecord>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record and returns its 1-based rank, or `None` if it didn't make the board.
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        let index = self
            .top
            .iter()
            .position(|existing| record.ranks_before(existing))
            .unwrap_or(self.top.len());
        if index >= BOARD_SIZE {
            return None;
        }

        self.top.insert(index, record);
        self.top.truncate(BOARD_SIZE);
        Some(index + 1)
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.top
    }
}

/// Scores of one difficulty from an unordered list, best first.
pub fn leaderboard<'a>(records: &'a [ScoreRecord], difficulty: &str) -> Vec<&'a ScoreRecord> {
    let mut board: Vec<_> = records
        .iter()
        .filter(|record| record.difficulty == difficulty)
        .collect();
    board.sort_by_key(|record| (record.time, record.moves, record.achieved_at));
    board
}
