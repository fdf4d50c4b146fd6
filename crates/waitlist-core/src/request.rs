//! Lifecycle of an outstanding gateway call.

use serde::{Deserialize, Serialize};

/// State of a single request to the submission gateway.
///
/// There is no cancellation: once `InFlight`, the only way out is a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum RequestState<T> {
    Idle,
    InFlight,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Settle an in-flight request.
    pub fn settle(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(message) => Self::Failed(message),
        }
    }
}
