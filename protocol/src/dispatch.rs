use std::time::Duration;

use sweeper_core::*;

use crate::{Command, Event, Hints, RejectReason, ScoreRecord};

/// Applies protocol commands to a shared session and turns the results into protocol events.
///
/// Refused commands produce a single [`Event::Rejected`] and leave the game untouched.
#[derive(Debug)]
pub struct Driver {
    session: SharedSession,
    hints: Hints,
}

impl Driver {
    pub fn new(session: SharedSession, hints: Hints) -> Self {
        Self { session, hints }
    }

    pub fn start(new_game: NewGame, hints: Hints) -> Result<Self> {
        SharedSession::start(new_game).map(|session| Self::new(session, hints))
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn into_session(self) -> GameSession {
        self.session.into_inner()
    }

    pub fn handle(&self, command: Command) -> Vec<Event> {
        log::trace!("Handling {command:?}");
        match command {
            Command::NewGame { difficulty, seed } => {
                let new_game = match seed {
                    Some(seed) => NewGame::new(difficulty, seed),
                    None => NewGame::seeded_from_clock(difficulty),
                };
                self.events(self.session.new_game(new_game))
            }
            Command::Reveal { row, col } => self.finishing(self.session.reveal((row, col))),
            Command::Chord { row, col } => self.finishing(self.session.chord((row, col))),
            Command::Flag { row, col } => self.events(self.session.flag((row, col))),
            Command::Mark { row, col } => self.events(self.session.mark((row, col))),
            Command::Tick { millis } => self
                .session
                .tick(Duration::from_millis(millis))
                .map(|elapsed| {
                    Event::Tick {
                        elapsed_ms: elapsed.as_millis() as u64,
                    }
                })
                .into_iter()
                .collect(),
            Command::RequestHint => match self.hints.request(&self.session) {
                Ok(Some(response)) => vec![Event::Hint {
                    text: response.text,
                }],
                Ok(None) => vec![Event::HintUnavailable],
                Err(err) => {
                    log::warn!("Hint request failed: {err}");
                    vec![Event::rejected(RejectReason::HintFailed, err)]
                }
            },
            Command::Save => vec![Event::Saved {
                game: Box::new(self.session.save()),
            }],
        }
    }

    fn events<O>(&self, result: Result<CommandOutcome<O>>) -> Vec<Event> {
        match result {
            Ok(outcome) => outcome.events.into_iter().map(Event::from).collect(),
            Err(err) => {
                log::debug!("Rejected command: {err}");
                vec![Event::from(&err)]
            }
        }
    }

    /// Like [`Self::events`], appending the score record when the command won the game.
    fn finishing(&self, result: Result<CommandOutcome<RevealOutcome>>) -> Vec<Event> {
        let won = matches!(&result, Ok(outcome) if outcome.outcome == RevealOutcome::Won);
        let mut events = self.events(result);
        if won && let Some(record) = self.session.read(ScoreRecord::of) {
            events.push(Event::Score { record });
        }
        events
    }
}
