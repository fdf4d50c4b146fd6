//! Store error types.

/// Errors from a persistence backend.
///
/// `Display` for [`StoreError::Api`] is the service's own message, so it
/// can be surfaced to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// The identifier is already taken.
    #[error("unique_id {unique_id} already exists")]
    Conflict { unique_id: String },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned something that contradicts the table contract,
    /// such as an empty representation after an insert.
    #[error("data integrity violation: {0}")]
    Integrity(String),
    /// A database driver error from a direct connection.
    #[error("database error: {0}")]
    Database(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Pull the human-readable `message` out of a PostgREST error body, falling
/// back to the raw body.
pub(crate) fn service_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_message_prefers_json_message() {
        let body = r#"{"code":"42P01","message":"relation \"public.waitlist\" does not exist"}"#;
        assert_eq!(
            service_message(body),
            "relation \"public.waitlist\" does not exist"
        );
        assert_eq!(service_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn api_error_displays_service_message() {
        let err = StoreError::Api {
            endpoint: "POST /rest/v1/waitlist".into(),
            status: 400,
            message: "invalid input syntax".into(),
        };
        assert_eq!(err.to_string(), "invalid input syntax");
    }
}
