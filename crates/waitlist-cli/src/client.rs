//! # Waitlist API Client
//!
//! Thin `reqwest` wrapper over the two `/api/waitlist` operations. Error
//! bodies of the form `{ "error": "..." }` surface as [`ClientError::Api`]
//! carrying the server's message, which is what the form and panel show.

use std::time::Duration;

use serde::Deserialize;
use url::Url;
use waitlist_core::{Draft, UniqueId, WaitlistEntry};

/// Default base URL of the waitlist API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The API answered with an error status.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The response body was not what the API documents.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("invalid API URL {0}: {1}")]
    InvalidUrl(String, String),
}

#[derive(Deserialize)]
struct DataEnvelope {
    data: WaitlistEntry,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let invalid = |e: String| ClientError::InvalidUrl(base_url.to_string(), e);
        let base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        let endpoint = base
            .join("/api/waitlist")
            .map_err(|e| invalid(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, endpoint })
    }

    /// `POST /api/waitlist`
    pub async fn create(&self, draft: &Draft) -> Result<WaitlistEntry, ClientError> {
        let endpoint = "POST /api/waitlist";
        tracing::debug!(url = %self.endpoint, "submitting draft");
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(draft)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;
        read_entry(endpoint, resp).await
    }

    /// `GET /api/waitlist?uniqueId=<id>`
    pub async fn lookup(&self, id: &UniqueId) -> Result<WaitlistEntry, ClientError> {
        let endpoint = "GET /api/waitlist";
        tracing::debug!(url = %self.endpoint, unique_id = %id, "looking up entry");
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[("uniqueId", id.as_str())])
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;
        read_entry(endpoint, resp).await
    }
}

async fn read_entry(endpoint: &str, resp: reqwest::Response) -> Result<WaitlistEntry, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }
    resp.json::<DataEnvelope>()
        .await
        .map(|env| env.data)
        .map_err(|e| ClientError::Decode {
            endpoint: endpoint.into(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_onto_base() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.endpoint.as_str(), "http://localhost:3000/api/waitlist");

        let client = ApiClient::new("https://waitlist.example.ca/app/").unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://waitlist.example.ca/api/waitlist"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new("not a url").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(..)));
    }

    #[test]
    fn api_error_displays_server_message() {
        let err = ClientError::Api {
            status: 404,
            message: "User not found".into(),
        };
        assert_eq!(err.to_string(), "User not found");
    }
}
