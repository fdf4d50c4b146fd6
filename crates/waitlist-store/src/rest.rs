//! # Hosted REST Table Client
//!
//! Talks to a PostgREST-style table API (as exposed by Supabase).
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | insert | POST | `/rest/v1/{table}` with `Prefer: return=representation` |
//! | find | GET | `/rest/v1/{table}?unique_id=eq.{id}&select=*` |
//! | health | GET | `/rest/v1/{table}?select=unique_id&limit=1` |
//!
//! Every request carries the service key both as `apikey` and as a bearer
//! token. Reads retry transport failures; inserts are never resent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use waitlist_core::{NewWaitlistEntry, UniqueId, WaitlistEntry};

use crate::config::{ConfigError, StoreConfig};
use crate::error::{service_message, StoreError};
use crate::retry::RetryPolicy;
use crate::WaitlistStore;

#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    table_url: String,
    table: String,
    retry: RetryPolicy,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(config.service_key.as_str())
            .map_err(|_| StoreError::Config(ConfigError::MissingServiceKey))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key.as_str()))
            .map_err(|_| StoreError::Config(ConfigError::MissingServiceKey))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            table_url: config.table_url(),
            table: config.table,
            retry: RetryPolicy::default(),
        })
    }

    async fn read_rows<T: DeserializeOwned>(
        endpoint: &str,
        resp: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                endpoint: endpoint.to_string(),
                status,
                message: service_message(&body),
            });
        }
        resp.json().await.map_err(|e| StoreError::Deserialization {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl WaitlistStore for RestStore {
    async fn insert(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, StoreError> {
        let endpoint = format!("POST /rest/v1/{}", self.table);
        let body = [&entry];

        // Sent once: a timed-out insert may still have committed.
        let resp = self
            .http
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::CONFLICT {
            return Err(StoreError::Conflict {
                unique_id: entry.unique_id.to_string(),
            });
        }

        let mut rows: Vec<WaitlistEntry> = Self::read_rows(&endpoint, resp).await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(StoreError::Integrity(format!(
                "insert of {} returned {n} rows",
                entry.unique_id
            ))),
        }
    }

    async fn find_by_unique_id(&self, id: &UniqueId) -> Result<Vec<WaitlistEntry>, StoreError> {
        let endpoint = format!("GET /rest/v1/{}", self.table);
        let filter = format!("eq.{id}");

        let resp = self
            .retry
            .send(&endpoint, || {
                self.http
                    .get(&self.table_url)
                    .query(&[("unique_id", filter.as_str()), ("select", "*")])
                    .send()
            })
            .await
            .map_err(|e| StoreError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        Self::read_rows(&endpoint, resp).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let endpoint = format!("GET /rest/v1/{} (health)", self.table);
        let resp = self
            .retry
            .send(&endpoint, || {
                self.http
                    .get(&self.table_url)
                    .query(&[("select", "unique_id"), ("limit", "1")])
                    .send()
            })
            .await
            .map_err(|e| StoreError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        Self::read_rows::<serde_json::Value>(&endpoint, resp)
            .await
            .map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "rest"
    }
}
