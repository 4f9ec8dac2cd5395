//! Fetch outcome types
//!
//! A fetch ends in exactly one [`FetchOutcome`]. The outcome is a plain value;
//! only the CLI layer turns failures into exit codes.

use std::fmt;

use crate::app::models::Configuration;
use crate::errors::FetchFailure;

/// States of the fetch state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// A request is about to be made or is in flight
    Attempting,
    /// A valid configuration was obtained
    Succeeded,
    /// Retries exhausted, fatal response or interrupted
    FailedTerminal,
}

impl FetchState {
    /// Whether the state machine has stopped
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FetchState::Attempting)
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchState::Attempting => "attempting",
            FetchState::Succeeded => "succeeded",
            FetchState::FailedTerminal => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Result of one fetch operation
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Validated configuration
    Succeeded(Configuration),
    /// Transport failures beyond the retry budget
    TransportExhausted { last_error: String },
    /// Incomplete configurations beyond the retry budget
    ValidationExhausted { last_error: String },
    /// Body was not JSON; never retried
    MalformedResponse { reason: String },
    /// Interrupted through the cancellation token
    Cancelled,
}

impl FetchOutcome {
    /// Terminal state this outcome corresponds to
    pub fn state(&self) -> FetchState {
        match self {
            FetchOutcome::Succeeded(_) => FetchState::Succeeded,
            _ => FetchState::FailedTerminal,
        }
    }

    /// Check if the outcome carries a configuration
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Succeeded(_))
    }
}

/// Outcome plus the number of requests it took
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    /// How the fetch ended
    pub outcome: FetchOutcome,
    /// Requests made, first attempt included
    pub attempts: u32,
}

impl FetchReport {
    /// Retries consumed beyond the first attempt
    pub fn retries_used(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    /// Convert into a `Result` for `?` propagation
    pub fn into_result(self) -> Result<Configuration, FetchFailure> {
        let attempts = self.attempts;
        match self.outcome {
            FetchOutcome::Succeeded(config) => Ok(config),
            FetchOutcome::TransportExhausted { last_error } => {
                Err(FetchFailure::TransportExhausted {
                    attempts,
                    last_error,
                })
            }
            FetchOutcome::ValidationExhausted { last_error } => {
                Err(FetchFailure::ValidationExhausted {
                    attempts,
                    last_error,
                })
            }
            FetchOutcome::MalformedResponse { reason } => {
                Err(FetchFailure::MalformedResponse { reason })
            }
            FetchOutcome::Cancelled => Err(FetchFailure::Cancelled { attempts }),
        }
    }
}
