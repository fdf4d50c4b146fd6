//! # waitlist-store
//!
//! Persistence backends for waitlist entries behind the [`WaitlistStore`]
//! trait:
//!
//! - [`RestStore`]: the hosted table service over its PostgREST API.
//! - [`MemoryStore`]: process-local rows for development and tests.
//!
//! A direct Postgres backend lives with the HTTP service, which owns the
//! database pool and migrations.

pub mod config;
pub mod error;
pub mod memory;
pub mod rest;
pub(crate) mod retry;

pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use waitlist_core::{NewWaitlistEntry, UniqueId, WaitlistEntry};

/// A table of waitlist rows.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Insert one row and return it as stored.
    ///
    /// Fails with [`StoreError::Conflict`] when `entry.unique_id` is taken;
    /// nothing is written in that case.
    async fn insert(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, StoreError>;

    /// All rows whose identifier equals `id` exactly.
    async fn find_by_unique_id(&self, id: &UniqueId) -> Result<Vec<WaitlistEntry>, StoreError>;

    /// Cheap connectivity probe.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
