use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use web_time::Instant;

use crate::*;

/// A session that can be driven from several threads, typically input handling on one and a timer on
/// another.
///
/// Commands are serialized by a single lock. The clock lives outside of it: ticks only add to an
/// atomic microsecond counter and never wait for a command to finish. The counter is folded back into the session
/// before every command, save and hint request.
#[derive(Debug)]
pub struct SharedSession {
    session: Mutex<GameSession>,
    elapsed_us: AtomicU64,
    running: AtomicBool,
    last_tick: Mutex<Option<Instant>>,
}

impl SharedSession {
    pub fn new(session: GameSession) -> Self {
        Self {
            elapsed_us: AtomicU64::new(session.elapsed().as_micros() as u64),
            running: AtomicBool::new(session.status() == GameStatus::InProgress),
            last_tick: Mutex::new(None),
            session: Mutex::new(session),
        }
    }

    pub fn start(new_game: NewGame) -> Result<Self> {
        GameSession::new(new_game).map(Self::new)
    }

    pub fn new_game(&self, new_game: NewGame) -> Result<CommandOutcome<()>> {
        self.apply(|session| {
            let outcome = session.new_game(new_game)?;
            // reset while the lock is held, so the next command folds in a zero clock
            self.elapsed_us.store(0, Ordering::Release);
            *lock(&self.last_tick) = None;
            Ok(outcome)
        })
    }

    pub fn reveal(&self, pos: Coord2) -> Result<CommandOutcome<RevealOutcome>> {
        self.apply(|session| session.reveal(pos))
    }

    pub fn chord(&self, pos: Coord2) -> Result<CommandOutcome<RevealOutcome>> {
        self.apply(|session| session.chord(pos))
    }

    pub fn flag(&self, pos: Coord2) -> Result<CommandOutcome<MarkOutcome>> {
        self.apply(|session| session.flag(pos))
    }

    pub fn mark(&self, pos: Coord2) -> Result<CommandOutcome<MarkOutcome>> {
        self.apply(|session| session.mark(pos))
    }

    /// Adds `delta` to the clock if the game is running. Never takes the command lock.
    pub fn tick(&self, delta: Duration) -> Option<Duration> {
        if !self.running.load(Ordering::Acquire) {
            return None;
        }
        let delta_us = delta.as_micros() as u64;
        let total = self.elapsed_us.fetch_add(delta_us, Ordering::AcqRel) + delta_us;
        Some(Duration::from_micros(total))
    }

    /// Like [`Self::tick`], measuring the time since the previous call.
    pub fn tick_now(&self) -> Option<Duration> {
        let mut last_tick = lock(&self.last_tick);
        if !self.running.load(Ordering::Acquire) {
            *last_tick = None;
            return None;
        }
        let now = Instant::now();
        let delta = last_tick.replace(now).map_or(Duration::ZERO, |last| now - last);
        drop(last_tick);
        self.tick(delta)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us.load(Ordering::Acquire))
    }

    pub fn status(&self) -> GameStatus {
        lock(&self.session).status()
    }

    /// Builds a hint request. The lock is released before this returns, so the caller can take its
    /// time talking to the hint service.
    pub fn snapshot(&self) -> HintRequest {
        let mut session = lock(&self.session);
        self.fold_clock(&mut session);
        session.snapshot()
    }

    pub fn save(&self) -> SavedGame {
        let mut session = lock(&self.session);
        self.fold_clock(&mut session);
        session.save()
    }

    /// Read access for queries not covered above.
    pub fn read<T>(&self, query: impl FnOnce(&GameSession) -> T) -> T {
        query(&lock(&self.session))
    }

    /// A finished game keeps the time it ended with, even if a late tick slipped in afterwards.
    pub fn into_inner(self) -> GameSession {
        let elapsed = self.elapsed();
        let mut session = self.session.into_inner().unwrap_or_else(PoisonError::into_inner);
        if !session.is_finished() {
            session.set_elapsed(elapsed);
        }
        session
    }

    fn apply<O>(
        &self,
        command: impl FnOnce(&mut GameSession) -> Result<CommandOutcome<O>>,
    ) -> Result<CommandOutcome<O>> {
        let mut session = lock(&self.session);
        self.fold_clock(&mut session);
        let outcome = command(&mut session)?;
        if session.is_finished() {
            session.set_elapsed(self.elapsed());
        }
        self.running.store(
            session.status() == GameStatus::InProgress,
            Ordering::Release,
        );
        Ok(outcome)
    }

    fn fold_clock(&self, session: &mut GameSession) {
        if !session.is_finished() {
            session.set_elapsed(self.elapsed());
        }
    }
}

/// Every critical section leaves the session consistent, so a poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
