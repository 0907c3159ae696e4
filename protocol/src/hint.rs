use std::fmt;

use sweeper_core::{HintRequest, HintResponse, SharedSession};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("Hint service unavailable: {0}")]
    Unavailable(String),
    #[error("Hint service timed out")]
    TimedOut,
    #[error("Hint service returned an empty answer")]
    Empty,
}

/// Something that turns a board snapshot into advice, usually a remote model.
pub trait HintProvider: Send + Sync {
    fn hint(&self, request: &HintRequest) -> Result<HintResponse, HintError>;
}

impl<F> HintProvider for F
where
    F: Fn(&HintRequest) -> Result<HintResponse, HintError> + Send + Sync,
{
    fn hint(&self, request: &HintRequest) -> Result<HintResponse, HintError> {
        self(request)
    }
}

/// Whether a hint service was configured. Without one, hint requests quietly yield nothing.
#[derive(Default)]
pub enum Hints {
    #[default]
    Absent,
    Present(Box<dyn HintProvider>),
}

impl Hints {
    pub fn present(provider: impl HintProvider + 'static) -> Self {
        Self::Present(Box::new(provider))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Asks the provider about the current board. The session stays unlocked during the call, so
    /// commands and ticks carry on while the service thinks.
    pub fn request(&self, session: &SharedSession) -> Result<Option<HintResponse>, HintError> {
        let Self::Present(provider) = self else {
            return Ok(None);
        };

        let request = session.snapshot();
        log::debug!(
            "Requesting hint, {:?} at {}s",
            request.snapshot.status,
            request.elapsed.as_secs()
        );
        let response = provider.hint(&request)?;
        if response.text.trim().is_empty() {
            return Err(HintError::Empty);
        }
        Ok(Some(response))
    }
}

impl fmt::Debug for Hints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Present(_) => f.write_str("Present(..)"),
        }
    }
}
