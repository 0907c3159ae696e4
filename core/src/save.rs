use alloc::vec::Vec;
use core::time::Duration;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub const SAVE_VERSION: u32 = 1;

/// Everything needed to resume a session. Adjacency counts are derived again on restore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub status: GameStatus,
    /// Absent until mines have been placed.
    pub mines: Option<Vec<Coord2>>,
    pub cells: Array2<CellState>,
    pub elapsed: Duration,
    pub moves: u32,
    pub first_click_consumed: bool,
    pub triggered_mine: Option<Coord2>,
    pub created_at: u64,
    /// Set for sessions built from a given layout, the only ones armed before the first reveal.
    #[serde(default)]
    pub fixed_layout: bool,
}

impl GameSession {
    pub fn save(&self) -> SavedGame {
        let board = self.board();
        let mut cells: Array2<CellState> = Array2::default(board.size().to_nd_index());
        for (pos, cell) in board.cells() {
            cells[pos.to_nd_index()] = cell.state();
        }

        SavedGame {
            version: SAVE_VERSION,
            difficulty: self.difficulty,
            seed: self.seed,
            status: self.status,
            mines: board.is_armed().then(|| board.layout().mine_coords()),
            cells,
            elapsed: self.elapsed,
            moves: self.moves,
            first_click_consumed: self.first_click_consumed,
            triggered_mine: self.triggered_mine,
            created_at: board.created_at(),
            fixed_layout: self.fixed_layout,
        }
    }

    /// Rebuilds a session, refusing saves whose board and status disagree.
    pub fn restore(saved: SavedGame) -> Result<Self> {
        Self::try_restore(saved).inspect_err(|err| log::warn!("Rejected saved game: {err}"))
    }

    fn try_restore(saved: SavedGame) -> Result<Self> {
        if saved.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(saved.version).into());
        }

        let config = saved.difficulty.config();
        let (rows, cols) = config.size;
        if saved.cells.dim() != (usize::from(rows), usize::from(cols)) {
            return Err(SaveError::ShapeMismatch.into());
        }

        let board = match &saved.mines {
            Some(mines) => {
                let layout = MineLayout::from_mine_coords(config.size, mines)
                    .map_err(|_| SaveError::MineOutOfRange)?;
                if usize::from(layout.mine_count()) != mines.len() {
                    return Err(SaveError::DuplicateMine.into());
                }
                if layout.mine_count() != config.mines {
                    return Err(SaveError::MineCountMismatch.into());
                }
                Board::new(layout)
            }
            None => {
                config.validate()?;
                Board::placeholder(config.size)
            }
        };
        let mut board = board.with_created_at(saved.created_at);
        for ((row, col), &state) in saved.cells.indexed_iter() {
            board.set_state((row as Coord, col as Coord), state);
        }

        let session = GameSession {
            difficulty: saved.difficulty,
            seed: saved.seed,
            board,
            status: saved.status,
            elapsed: saved.elapsed,
            moves: saved.moves,
            first_click_consumed: saved.first_click_consumed,
            triggered_mine: saved.triggered_mine,
            fixed_layout: saved.fixed_layout,
        };
        if !session.is_consistent() {
            return Err(SaveError::InconsistentStatus.into());
        }

        log::debug!(
            "Restored {} game, {:?}, {} cells revealed",
            session.difficulty.name(),
            session.status,
            session.board.revealed_count()
        );
        Ok(session)
    }

    fn is_consistent(&self) -> bool {
        let board = &self.board;
        let mine_revealed = board
            .cells()
            .any(|(_, cell)| cell.is_mine() && cell.state() == CellState::Revealed);
        let started = self.first_click_consumed && board.is_armed();
        if self.fixed_layout && !board.is_armed() {
            return false;
        }

        match self.status {
            // generated games only get their mines on the first reveal
            GameStatus::NotStarted => {
                board.is_armed() == self.fixed_layout
                    && !self.first_click_consumed
                    && board.revealed_count() == 0
                    && !mine_revealed
                    && self.triggered_mine.is_none()
            }
            GameStatus::InProgress => {
                started && !mine_revealed && !board.is_cleared() && self.triggered_mine.is_none()
            }
            GameStatus::Won => started && !mine_revealed && board.is_cleared(),
            GameStatus::Lost => {
                started
                    && self.triggered_mine.is_some_and(|pos| {
                        board.cell(pos).is_ok_and(|cell| {
                            cell.is_mine() && cell.state() == CellState::Revealed
                        })
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::with_layout(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn fresh_game_saves_without_mines() {
        let session = GameSession::new(NewGame::new(Difficulty::Beginner, 8)).unwrap();

        let saved = session.save();

        assert_eq!(saved.mines, None);
        assert_eq!(GameSession::restore(saved).unwrap(), session);
    }

    #[test]
    fn game_in_progress_resumes_identically() {
        let mut session = GameSession::new(NewGame::new(Difficulty::Expert, 21)).unwrap();
        session.reveal((8, 15)).unwrap();
        session.mark((0, 0)).unwrap();
        session.mark((0, 0)).unwrap();
        session.flag((15, 29)).unwrap();
        session.tick(Duration::from_secs(30));

        let restored = GameSession::restore(session.save()).unwrap();

        assert_eq!(restored, session);
        assert_eq!(restored.flags(), session.flags());
        assert_eq!(restored.elapsed(), Duration::from_secs(30));
    }

    #[test]
    fn saved_game_survives_json() {
        let mut session = session((5, 5), &[(4, 3), (3, 4)]);
        session.reveal((0, 0)).unwrap();

        let json = serde_json::to_string(&session.save()).unwrap();
        let saved: SavedGame = serde_json::from_str(&json).unwrap();

        assert_eq!(GameSession::restore(saved).unwrap(), session);
    }

    #[test]
    fn lost_game_keeps_its_trigger() {
        let mut session = session((3, 3), &[(1, 1)]);
        session.reveal((1, 1)).unwrap();

        let restored = GameSession::restore(session.save()).unwrap();

        assert_eq!(restored.status(), GameStatus::Lost);
        assert_eq!(restored.triggered_mine(), Some((1, 1)));
    }

    #[test]
    fn rejects_wrong_version() {
        let mut saved = session((3, 3), &[(1, 1)]).save();
        saved.version = 7;

        assert_eq!(
            GameSession::restore(saved),
            Err(GameError::InvalidSave(SaveError::UnsupportedVersion(7)))
        );
    }

    #[test]
    fn rejects_shape_mismatch() {
        let mut saved = session((3, 3), &[(1, 1)]).save();
        saved.cells = Array2::default([3, 2]);

        assert_eq!(
            GameSession::restore(saved),
            Err(GameError::InvalidSave(SaveError::ShapeMismatch))
        );
    }

    #[test]
    fn rejects_bad_mine_lists() {
        let base = session((3, 3), &[(1, 1), (0, 0)]).save();

        let mut outside = base.clone();
        outside.mines = Some(Vec::from([(1, 1), (3, 0)]));
        assert_eq!(
            GameSession::restore(outside),
            Err(GameError::InvalidSave(SaveError::MineOutOfRange))
        );

        let mut duplicated = base.clone();
        duplicated.mines = Some(Vec::from([(1, 1), (1, 1)]));
        assert_eq!(
            GameSession::restore(duplicated),
            Err(GameError::InvalidSave(SaveError::DuplicateMine))
        );

        let mut short = base;
        short.mines = Some(Vec::from([(1, 1)]));
        assert_eq!(
            GameSession::restore(short),
            Err(GameError::InvalidSave(SaveError::MineCountMismatch))
        );
    }

    #[test]
    fn rejects_revealed_mine_in_running_game() {
        let mut session = session((3, 3), &[(1, 1)]);
        session.flag((0, 0)).unwrap();
        session.reveal((2, 2)).unwrap();
        let mut saved = session.save();
        saved.cells[[1, 1]] = CellState::Revealed;

        assert_eq!(
            GameSession::restore(saved),
            Err(GameError::InvalidSave(SaveError::InconsistentStatus))
        );
    }

    #[test]
    fn rejects_mines_in_a_game_that_has_not_started() {
        let mut saved = GameSession::new(NewGame::new(Difficulty::Beginner, 8))
            .unwrap()
            .save();
        saved.mines = Some(Vec::from([
            (0, 0),
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (0, 5),
            (0, 6),
            (0, 7),
            (0, 8),
            (1, 0),
        ]));

        assert_eq!(
            GameSession::restore(saved),
            Err(GameError::InvalidSave(SaveError::InconsistentStatus))
        );
    }

    #[test]
    fn fixed_layout_survives_before_the_first_reveal() {
        let session = session((3, 3), &[(1, 1)]);

        let restored = GameSession::restore(session.save()).unwrap();

        assert!(restored.board().is_armed());
        assert_eq!(restored, session);
    }

    #[test]
    fn rejects_fixed_layout_without_mines() {
        let mut saved = session((3, 3), &[(1, 1)]).save();
        saved.mines = None;
        saved.difficulty = Difficulty::Beginner;
        saved.cells = Array2::default([9, 9]);

        assert_eq!(
            GameSession::restore(saved),
            Err(GameError::InvalidSave(SaveError::InconsistentStatus))
        );
    }

    #[test]
    fn rejects_won_status_on_unfinished_board() {
        let mut saved = session((3, 3), &[(1, 1)]).save();
        saved.status = GameStatus::Won;
        saved.first_click_consumed = true;

        assert_eq!(
            GameSession::restore(saved),
            Err(GameError::InvalidSave(SaveError::InconsistentStatus))
        );
    }
}
