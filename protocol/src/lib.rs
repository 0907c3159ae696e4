//! Wire contract between the engine and the collaborators around it: the presentation layer sending
//! commands and receiving events, the hint service, and the score store.
//!
//! Every message is JSON. Transport is up to the host.

use serde::Serialize;
use serde::de::DeserializeOwned;
use sweeper_core::{GameError, GameSession, HintRequest, SavedGame};
use thiserror::Error;

pub use dispatch::*;
pub use hint::*;
pub use message::*;
pub use score::*;

mod dispatch;
mod hint;
mod message;
mod score;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(value)?)
}

pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses and validates a save produced by [`GameSession::save`].
pub fn restore_json(text: &str) -> Result<GameSession, ProtocolError> {
    let saved: SavedGame = from_json(text)?;
    Ok(GameSession::restore(saved)?)
}

/// Parses a hint request, checking the grid matches its declared size.
pub fn hint_request_from_json(text: &str) -> Result<HintRequest, ProtocolError> {
    let request: HintRequest = from_json(text)?;
    request.snapshot.validate()?;
    Ok(request)
}
