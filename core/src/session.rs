use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress, on the first reveal that opens something
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Everything needed to start a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    pub difficulty: Difficulty,
    /// Seeds mine placement: the same seed and first click always give the same board.
    pub seed: u64,
}

impl NewGame {
    pub const fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self { difficulty, seed }
    }

    #[cfg(feature = "std")]
    pub fn seeded_from_clock(difficulty: Difficulty) -> Self {
        Self::new(difficulty, clock_seed())
    }
}

/// What a won game is worth on a scoreboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub difficulty: Difficulty,
    pub elapsed: Duration,
    pub moves: u32,
}

/// One game from first click to win or loss.
///
/// Mines are not placed until the first reveal, which then becomes the safe cell. Every mutation goes
/// through the commands below so the board, status and counters never disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: u64,
    pub(crate) board: Board,
    pub(crate) status: GameStatus,
    pub(crate) elapsed: Duration,
    pub(crate) moves: u32,
    pub(crate) first_click_consumed: bool,
    pub(crate) triggered_mine: Option<Coord2>,
    /// Mines were given up front instead of being placed around the first click.
    pub(crate) fixed_layout: bool,
}

impl GameSession {
    pub fn new(new_game: NewGame) -> Result<Self> {
        let config = new_game.difficulty.config();
        config.validate()?;
        log::debug!(
            "New {} game {:?} with {} mines",
            new_game.difficulty.name(),
            config.size,
            config.mines
        );
        Ok(Self::from_board(
            new_game.difficulty,
            new_game.seed,
            Board::placeholder(config.size),
        ))
    }

    /// Session over a fixed layout: the first reveal does not generate anything and may hit a mine.
    pub fn with_layout(layout: MineLayout) -> Self {
        let config = GameConfig::new_unchecked(layout.size(), layout.mine_count());
        Self {
            fixed_layout: true,
            ..Self::from_board(Difficulty::Custom(config), 0, Board::new(layout))
        }
    }

    fn from_board(difficulty: Difficulty, seed: u64, board: Board) -> Self {
        Self {
            difficulty,
            seed,
            board,
            status: GameStatus::NotStarted,
            elapsed: Duration::ZERO,
            moves: 0,
            first_click_consumed: false,
            triggered_mine: None,
            fixed_layout: false,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> GameConfig {
        self.difficulty.config()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Read-only view of the board. Mine flags on hidden cells must not reach the player.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn flags(&self) -> CellCount {
        self.board.flagged_count()
    }

    /// Can go negative when the player over-flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.config().mines) - i32::from(self.flags())
    }

    pub fn first_click_consumed(&self) -> bool {
        self.first_click_consumed
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// What the player may see at `pos`. Mines are exposed only after a loss.
    pub fn view(&self, pos: Coord2) -> Result<CellView> {
        Ok(self.board.cell(pos)?.view(self.exposes_mines()))
    }

    pub(crate) fn exposes_mines(&self) -> bool {
        self.status == GameStatus::Lost
    }

    pub fn score(&self) -> Option<ScoreSummary> {
        (self.status == GameStatus::Won).then_some(ScoreSummary {
            difficulty: self.difficulty,
            elapsed: self.elapsed,
            moves: self.moves,
        })
    }

    /// Discards the current game, finished or not.
    pub fn new_game(&mut self, new_game: NewGame) -> Result<CommandOutcome<()>> {
        *self = Self::new(new_game)?;
        Ok(CommandOutcome {
            outcome: (),
            events: Vec::from([
                GameEvent::StatusChanged {
                    status: self.status,
                },
                self.counters_changed(),
            ]),
        })
    }

    pub fn reveal(&mut self, pos: Coord2) -> Result<CommandOutcome<RevealOutcome>> {
        let pos = self.board.validate_coords(pos)?;
        self.check_not_finished()?;

        if !self.board.cell_at(pos).state().is_revealable() {
            return Ok(CommandOutcome::unchanged(RevealOutcome::NoChange));
        }
        if !self.board.is_armed() {
            let layout = RandomLayoutGenerator::new(self.seed, pos).generate(self.config())?;
            self.board.arm(layout);
        }
        self.first_click_consumed = true;

        let revealed = reveal::reveal(&mut self.board, pos)?;
        Ok(self.settle(revealed))
    }

    pub fn chord(&mut self, pos: Coord2) -> Result<CommandOutcome<RevealOutcome>> {
        let pos = self.board.validate_coords(pos)?;
        self.check_not_finished()?;

        let revealed = reveal::chord(&mut self.board, pos)?;
        Ok(self.settle(revealed))
    }

    /// Toggles a flag. A question mark is cleared back to hidden.
    pub fn flag(&mut self, pos: Coord2) -> Result<CommandOutcome<MarkOutcome>> {
        self.set_mark(pos, |state| match state {
            CellState::Hidden => Some(CellState::Flagged),
            CellState::Flagged | CellState::QuestionMarked => Some(CellState::Hidden),
            CellState::Revealed => None,
        })
    }

    /// Cycles hidden, flagged, question-marked.
    pub fn mark(&mut self, pos: Coord2) -> Result<CommandOutcome<MarkOutcome>> {
        self.set_mark(pos, |state| match state {
            CellState::Hidden => Some(CellState::Flagged),
            CellState::Flagged => Some(CellState::QuestionMarked),
            CellState::QuestionMarked => Some(CellState::Hidden),
            CellState::Revealed => None,
        })
    }

    /// Advances the clock while the game is running.
    pub fn tick(&mut self, delta: Duration) -> Option<GameEvent> {
        if self.status != GameStatus::InProgress {
            return None;
        }
        self.elapsed += delta;
        Some(GameEvent::Tick {
            elapsed: self.elapsed,
        })
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    fn set_mark(
        &mut self,
        pos: Coord2,
        next: impl FnOnce(CellState) -> Option<CellState>,
    ) -> Result<CommandOutcome<MarkOutcome>> {
        let pos = self.board.validate_coords(pos)?;
        self.check_not_finished()?;

        let Some(state) = next(self.board.cell_at(pos).state()) else {
            return Ok(CommandOutcome::unchanged(MarkOutcome::NoChange));
        };
        self.board.set_state(pos, state);
        self.moves += 1;

        Ok(CommandOutcome {
            outcome: MarkOutcome::Changed,
            events: Vec::from([self.cell_changed(pos), self.counters_changed()]),
        })
    }

    /// Applies win/loss rules after cells were opened.
    fn settle(&mut self, revealed: Revealed) -> CommandOutcome<RevealOutcome> {
        if revealed.is_empty() {
            return CommandOutcome::unchanged(RevealOutcome::NoChange);
        }
        self.moves += 1;

        let mut events: Vec<_> = revealed
            .cells
            .iter()
            .map(|&pos| self.cell_changed(pos))
            .collect();
        self.mark_started(&mut events);

        let outcome = if let Some(mine) = revealed.mine {
            self.triggered_mine = Some(mine);
            self.end_game(false, &mut events);
            RevealOutcome::HitMine
        } else if self.board.is_cleared() {
            self.end_game(true, &mut events);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };

        events.push(self.counters_changed());
        CommandOutcome { outcome, events }
    }

    fn mark_started(&mut self, events: &mut Vec<GameEvent>) {
        if self.status == GameStatus::NotStarted {
            log::debug!("Game started");
            self.status = GameStatus::InProgress;
            events.push(GameEvent::StatusChanged {
                status: self.status,
            });
        }
    }

    /// Shows every mine on a loss, flags every mine on a win.
    fn end_game(&mut self, won: bool, events: &mut Vec<GameEvent>) {
        self.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };
        log::debug!("Game ended {:?} after {:?}", self.status, self.elapsed);

        let state = if won {
            CellState::Flagged
        } else {
            CellState::Revealed
        };
        for pos in self.board.layout().mine_coords() {
            if self.board.cell_at(pos).state().is_revealable() {
                self.board.set_state(pos, state);
                events.push(self.cell_changed(pos));
            }
        }
        events.push(GameEvent::StatusChanged {
            status: self.status,
        });
    }

    fn cell_changed(&self, pos: Coord2) -> GameEvent {
        GameEvent::CellChanged {
            pos,
            view: self.board.cell_at(pos).view(false),
        }
    }

    fn counters_changed(&self) -> GameEvent {
        GameEvent::CountersChanged {
            moves: self.moves,
            flags: self.flags(),
            mines_left: self.mines_left(),
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_terminal() {
            Err(GameError::TerminalState)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::with_layout(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    fn state(session: &GameSession, pos: Coord2) -> CellState {
        session.board().cell(pos).unwrap().state()
    }

    #[test]
    fn first_reveal_places_mines_around_the_click() {
        let mut session = GameSession::new(NewGame::new(Difficulty::Expert, 3)).unwrap();
        assert!(!session.board().is_armed());

        let outcome = session.reveal((4, 4)).unwrap();

        assert!(outcome.outcome.has_update());
        assert_ne!(outcome.outcome, RevealOutcome::HitMine);
        assert_eq!(session.status(), GameStatus::InProgress);
        assert!(session.first_click_consumed());
        assert_eq!(session.board().mine_count(), 99);
        assert_eq!(session.board().cell((4, 4)).unwrap().adjacent_mines(), 0);
        assert!(outcome.events.contains(&GameEvent::StatusChanged {
            status: GameStatus::InProgress
        }));
    }

    #[test]
    fn later_reveals_keep_the_board() {
        let mut session = GameSession::new(NewGame::new(Difficulty::Expert, 11)).unwrap();
        session.reveal((0, 0)).unwrap();
        let mines = session.board().layout().mine_coords();

        let hidden_safe = session
            .board()
            .cells()
            .find(|(_, cell)| !cell.is_mine() && cell.state() == CellState::Hidden)
            .map(|(pos, _)| pos)
            .unwrap();
        session.reveal(hidden_safe).unwrap();

        assert_eq!(session.board().layout().mine_coords(), mines);
    }

    #[test]
    fn zero_region_opens_and_game_continues() {
        // (4, 4) is safe but walled in by mines and a number, so the flood cannot reach it
        let mut session = session((5, 5), &[(4, 3), (3, 4)]);

        let outcome = session.reveal((0, 0)).unwrap();

        assert_eq!(outcome.outcome, RevealOutcome::Revealed);
        assert_eq!(session.status(), GameStatus::InProgress);
        assert_eq!(state(&session, (4, 4)), CellState::Hidden);
        assert_eq!(state(&session, (3, 3)), CellState::Revealed);
        assert_eq!(session.board().revealed_count(), 22);
    }

    #[test]
    fn clearing_the_board_wins_and_flags_mines() {
        let mut session = session((5, 5), &[(4, 4)]);

        let outcome = session.reveal((0, 0)).unwrap();

        assert_eq!(outcome.outcome, RevealOutcome::Won);
        assert_eq!(session.status(), GameStatus::Won);
        assert_eq!(state(&session, (4, 4)), CellState::Flagged);
        assert_eq!(session.mines_left(), 0);
        assert_eq!(session.score().map(|score| score.moves), Some(1));
    }

    #[test]
    fn hitting_a_mine_loses_and_shows_every_mine() {
        let mut session = session((4, 4), &[(0, 0), (3, 3), (3, 0)]);
        session.reveal((0, 3)).unwrap();
        session.flag((3, 0)).unwrap();

        let outcome = session.reveal((3, 3)).unwrap();

        assert_eq!(outcome.outcome, RevealOutcome::HitMine);
        assert_eq!(session.status(), GameStatus::Lost);
        assert_eq!(session.triggered_mine(), Some((3, 3)));
        assert_eq!(state(&session, (0, 0)), CellState::Revealed);
        assert_eq!(state(&session, (3, 0)), CellState::Flagged);
        assert_eq!(session.view((3, 0)), Ok(CellView::Mine));
        assert!(outcome.events.contains(&GameEvent::CellChanged {
            pos: (0, 0),
            view: CellView::Mine
        }));
        assert_eq!(session.score(), None);
    }

    #[test]
    fn commands_after_loss_are_rejected_and_change_nothing() {
        let mut session = session((3, 3), &[(1, 1)]);
        session.reveal((1, 1)).unwrap();
        let lost = session.clone();

        assert_eq!(session.reveal((0, 0)), Err(GameError::TerminalState));
        assert_eq!(session.flag((0, 0)), Err(GameError::TerminalState));
        assert_eq!(session.mark((0, 0)), Err(GameError::TerminalState));
        assert_eq!(session.chord((0, 0)), Err(GameError::TerminalState));
        assert_eq!(session.tick(Duration::from_secs(1)), None);
        assert_eq!(session, lost);
    }

    #[test]
    fn out_of_bounds_does_not_touch_the_session() {
        let mut session = session((3, 3), &[(1, 1)]);
        assert_eq!(session.reveal((3, 3)), Err(GameError::InvalidPosition));
        assert_eq!(session.flag((0, 5)), Err(GameError::InvalidPosition));
        assert_eq!(session.status(), GameStatus::NotStarted);
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn repeated_reveal_is_a_benign_no_op() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.reveal((1, 1)).unwrap();
        let once = session.clone();

        let again = session.reveal((1, 1)).unwrap();

        assert_eq!(again.outcome, RevealOutcome::NoChange);
        assert!(again.events.is_empty());
        assert_eq!(session, once);
    }

    #[test]
    fn flag_toggles_and_counts() {
        let mut session = session((3, 3), &[(0, 0)]);

        assert_eq!(session.flag((0, 0)).unwrap().outcome, MarkOutcome::Changed);
        assert_eq!(session.flags(), 1);
        assert_eq!(session.mines_left(), 0);
        assert_eq!(session.status(), GameStatus::NotStarted);

        session.flag((0, 0)).unwrap();
        assert_eq!(state(&session, (0, 0)), CellState::Hidden);
        assert_eq!(session.flags(), 0);
        assert_eq!(session.moves(), 2);
    }

    #[test]
    fn flag_on_revealed_cell_is_a_no_op() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.reveal((1, 1)).unwrap();

        let outcome = session.flag((1, 1)).unwrap();

        assert_eq!(outcome.outcome, MarkOutcome::NoChange);
        assert_eq!(session.flags(), 0);
    }

    #[test]
    fn mark_cycles_through_question() {
        let mut session = session((3, 3), &[(0, 0)]);

        session.mark((1, 0)).unwrap();
        assert_eq!(state(&session, (1, 0)), CellState::Flagged);
        session.mark((1, 0)).unwrap();
        assert_eq!(state(&session, (1, 0)), CellState::QuestionMarked);
        assert_eq!(session.flags(), 0);
        session.mark((1, 0)).unwrap();
        assert_eq!(state(&session, (1, 0)), CellState::Hidden);

        session.mark((1, 0)).unwrap();
        session.mark((1, 0)).unwrap();
        session.flag((1, 0)).unwrap();
        assert_eq!(state(&session, (1, 0)), CellState::Hidden);
    }

    #[test]
    fn flagged_first_click_does_not_start_the_game() {
        let mut session = GameSession::new(NewGame::new(Difficulty::Beginner, 1)).unwrap();
        session.flag((0, 0)).unwrap();

        let outcome = session.reveal((0, 0)).unwrap();

        assert_eq!(outcome.outcome, RevealOutcome::NoChange);
        assert!(!session.board().is_armed());
        assert!(!session.first_click_consumed());
        assert_eq!(session.status(), GameStatus::NotStarted);
    }

    #[test]
    fn chord_reveals_all_other_neighbors() {
        let mut session = session((3, 4), &[(0, 1), (2, 1), (0, 3)]);
        session.reveal((1, 1)).unwrap();
        session.flag((0, 1)).unwrap();
        session.flag((2, 1)).unwrap();

        let outcome = session.chord((1, 1)).unwrap();

        assert_eq!(outcome.outcome, RevealOutcome::Revealed);
        for pos in [(0, 0), (1, 0), (2, 0), (0, 2), (1, 2), (2, 2)] {
            assert_eq!(state(&session, pos), CellState::Revealed, "at {pos:?}");
        }
        assert_eq!(state(&session, (1, 3)), CellState::Hidden);
    }

    #[test]
    fn chord_on_wrong_flags_loses() {
        let mut session = session((3, 3), &[(0, 1)]);
        session.reveal((1, 1)).unwrap();
        session.flag((2, 2)).unwrap();

        let outcome = session.chord((1, 1)).unwrap();

        assert_eq!(outcome.outcome, RevealOutcome::HitMine);
        assert_eq!(session.status(), GameStatus::Lost);
    }

    #[test]
    fn clock_runs_only_while_in_progress() {
        let mut session = session((5, 5), &[(4, 3), (3, 4)]);
        assert_eq!(session.tick(Duration::from_secs(1)), None);

        session.reveal((0, 0)).unwrap();
        session.tick(Duration::from_millis(1500));
        let event = session.tick(Duration::from_millis(500));

        assert_eq!(
            event,
            Some(GameEvent::Tick {
                elapsed: Duration::from_secs(2)
            })
        );
        assert_eq!(session.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn new_game_resets_a_finished_session() {
        let mut session = session((3, 3), &[(1, 1)]);
        session.reveal((1, 1)).unwrap();

        let outcome = session
            .new_game(NewGame::new(Difficulty::Expert, 5))
            .unwrap();

        assert_eq!(session.status(), GameStatus::NotStarted);
        assert_eq!(session.board().size(), (16, 30));
        assert_eq!(session.moves(), 0);
        assert_eq!(
            outcome.events[0],
            GameEvent::StatusChanged {
                status: GameStatus::NotStarted
            }
        );
    }

    #[test]
    fn new_game_rejects_bad_custom_config() {
        let mut session = session((3, 3), &[(1, 1)]);
        let bad = Difficulty::Custom(GameConfig::new_unchecked((3, 3), 4));

        assert!(matches!(
            session.new_game(NewGame::new(bad, 0)),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert_eq!(session.board().size(), (3, 3));
    }
}
