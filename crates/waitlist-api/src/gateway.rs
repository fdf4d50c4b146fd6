//! # Submission Gateway
//!
//! The two operations the HTTP layer exposes, independent of axum:
//!
//! - [`SubmissionGateway::create`]: coerce a draft, mint an identifier,
//!   persist exactly one row.
//! - [`SubmissionGateway::lookup`]: fetch the single row for an identifier.
//!
//! The gateway keeps nothing between calls beyond its store handle.

use std::sync::Arc;

use waitlist_core::{Draft, NewWaitlistEntry, UniqueId, ValidationError, WaitlistEntry};
use waitlist_store::{StoreError, WaitlistStore};

/// Attempts at inserting with a fresh identifier before a conflict is fatal.
pub const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Message returned when a lookup matches no row.
pub const NOT_FOUND_MESSAGE: &str = "User not found";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    /// No record for the identifier.
    #[error("{NOT_FOUND_MESSAGE}")]
    NotFound,
    /// The store failed; carries its message verbatim.
    #[error("{0}")]
    Persistence(String),
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Clone)]
pub struct SubmissionGateway {
    store: Arc<dyn WaitlistStore>,
}

impl std::fmt::Debug for SubmissionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionGateway")
            .field("backend", &self.store.backend())
            .finish()
    }
}

impl SubmissionGateway {
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn WaitlistStore> {
        &self.store
    }

    /// Persist `draft` as a new entry with a server-generated identifier.
    ///
    /// Any identifier the caller put in the body is ignored. On an
    /// identifier collision a new one is drawn, up to
    /// [`MAX_CREATE_ATTEMPTS`] inserts in total.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Validation`] when the coerced record breaks an
    /// invariant (nothing is written), [`GatewayError::Persistence`] when
    /// the store fails or every attempt collided.
    pub async fn create(&self, draft: &Draft) -> Result<WaitlistEntry, GatewayError> {
        let fields = draft.coerce()?;

        let mut attempt = 1;
        loop {
            let entry = NewWaitlistEntry::generate(fields.clone());
            let unique_id = entry.unique_id.clone();
            match self.store.insert(entry).await {
                Ok(stored) => {
                    tracing::info!(
                        unique_id = %stored.unique_id,
                        backend = self.store.backend(),
                        attempt,
                        "waitlist entry created"
                    );
                    return Ok(stored);
                }
                Err(err) if err.is_conflict() && attempt < MAX_CREATE_ATTEMPTS => {
                    tracing::warn!(%unique_id, attempt, "identifier collision, regenerating");
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(%unique_id, attempt, error = %err, "waitlist insert failed");
                    return Err(err.into());
                }
            }
        }
    }

    /// Fetch the entry registered under `raw`, trimmed.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Validation`] when `raw` is absent or blank,
    /// [`GatewayError::NotFound`] when no row matches, and
    /// [`GatewayError::Persistence`] when the store fails or reports more
    /// than one row for the identifier.
    pub async fn lookup(&self, raw: Option<&str>) -> Result<WaitlistEntry, GatewayError> {
        let id = UniqueId::new(raw.unwrap_or_default())?;
        let mut rows = self.store.find_by_unique_id(&id).await?;
        match rows.len() {
            0 => {
                tracing::debug!(unique_id = %id, "lookup matched no entry");
                Err(GatewayError::NotFound)
            }
            1 => Ok(rows.remove(0)),
            n => {
                let err = StoreError::Integrity(format!("{n} entries share unique_id {id}"));
                tracing::error!(unique_id = %id, rows = n, "duplicate identifier in store");
                Err(err.into())
            }
        }
    }
}
