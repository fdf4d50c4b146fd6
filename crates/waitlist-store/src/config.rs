//! Configuration for the hosted REST table backend.
//!
//! Read once at startup from the environment. The service credential is held
//! in a [`Zeroizing`] buffer and redacted from `Debug` output.

use url::Url;
use zeroize::Zeroizing;

/// Default table holding waitlist rows.
pub const DEFAULT_TABLE: &str = "waitlist";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted persistence service.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyzcompany.supabase.co`.
    pub base_url: Url,
    /// Service-role key, sent as both `apikey` and bearer token.
    pub service_key: Zeroizing<String>,
    pub table: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    pub fn new(base_url: Url, service_key: impl Into<String>) -> Self {
        Self {
            base_url,
            service_key: Zeroizing::new(service_key.into()),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SUPABASE_URL`, falling back to `NEXT_PUBLIC_SUPABASE_URL`
    /// - `SUPABASE_SERVICE_ROLE_KEY` (required when a URL is set)
    /// - `WAITLIST_TABLE` (default: `waitlist`)
    /// - `WAITLIST_STORE_TIMEOUT_SECS` (default: 30)
    ///
    /// Returns `Ok(None)` when no URL is configured.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some((var, raw_url)) = first_set(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]) else {
            return Ok(None);
        };
        let base_url =
            Url::parse(&raw_url).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingServiceKey)?;

        let table = std::env::var("WAITLIST_TABLE")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());
        let timeout_secs = std::env::var("WAITLIST_STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Some(Self {
            base_url,
            service_key: Zeroizing::new(service_key),
            table,
            timeout_secs,
        }))
    }

    /// `{base}/rest/v1/{table}`.
    pub fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.table
        )
    }
}

fn first_set(vars: &[&'static str]) -> Option<(&'static str, String)> {
    vars.iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| (*var, v))
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SUPABASE_SERVICE_ROLE_KEY is required when SUPABASE_URL is set")]
    MissingServiceKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
