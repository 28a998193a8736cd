//! Wire-level response envelope shared by every API call.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RequestFailure;

// `data: null` is a present payload; only a missing field maps to `None`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `{ success, data?, error? }` response body.
pub struct ApiEnvelope<T> {
    /// Application-level success flag.
    pub success: bool,
    /// Payload; only meaningful when `success` is `true`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        bound(deserialize = "T: Deserialize<'de>"),
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<T>,
    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Builds a successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Builds a failed envelope carrying `error`.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Returns `true` when the envelope satisfies `success == true` with `data` present.
    pub fn is_usable(&self) -> bool {
        self.success && self.data.is_some()
    }

    /// Unwraps the payload or converts the envelope into a [`RequestFailure`].
    ///
    /// # Errors
    ///
    /// Fails when `success` is `false` or `data` is absent, carrying the envelope's `error`
    /// text or the generic message.
    pub fn into_payload(self) -> Result<T, RequestFailure> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(RequestFailure::from_envelope_error(self.error)),
        }
    }
}
