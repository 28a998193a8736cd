//! Failure type surfaced by [`crate::RequestClient`].

use thiserror::Error;

/// Message used when neither the envelope nor the transport supplied one.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
/// A request that did not yield a usable payload.
///
/// Transport errors, non-success statuses, and envelope violations all surface as this one type;
/// the message is the only caller-facing discriminator. The HTTP status, when one was received,
/// is kept for diagnostics.
pub struct RequestFailure {
    message: String,
    status: Option<u16>,
}

impl RequestFailure {
    /// Creates a failure with an explicit message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a failure carrying [`GENERIC_FAILURE_MESSAGE`].
    pub fn generic() -> Self {
        Self::new(GENERIC_FAILURE_MESSAGE)
    }

    /// Uses the envelope's `error` text, falling back to the generic message when it is absent
    /// or empty.
    pub fn from_envelope_error(error: Option<String>) -> Self {
        match error.filter(|message| !message.is_empty()) {
            Some(message) => Self::new(message),
            None => Self::generic(),
        }
    }

    /// Failure raised when the transport itself errored (no response to validate).
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::new(format!("{GENERIC_FAILURE_MESSAGE}: {err}"))
    }

    /// Attaches the HTTP status that accompanied the failure.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the human-readable failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}
