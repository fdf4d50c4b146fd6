//! # Waitlist Identifier
//!
//! [`UniqueId`] is the opaque token handed back to a registrant after a
//! successful signup. It is the only lookup key for the status panel and
//! the only "credential" for reading an entry back.
//!
//! Identifiers are always generated server-side by [`UniqueId::generate`].
//! Parsing ([`UniqueId::new`]) accepts any non-blank string so that
//! identifiers minted by earlier deployments remain resolvable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of a freshly generated identifier.
pub const UNIQUE_ID_LEN: usize = 10;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque, immutable identifier of a waitlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UniqueId(String);

impl UniqueId {
    /// Parse an identifier supplied by a caller. Surrounding whitespace is
    /// stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyIdentifier`] if nothing remains.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh identifier of [`UNIQUE_ID_LEN`] lowercase base-36
    /// characters from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let token = (0..UNIQUE_ID_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(token)
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UniqueId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for UniqueId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
