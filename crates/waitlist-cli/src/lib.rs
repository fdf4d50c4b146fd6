//! # waitlist-cli
//!
//! The `waitlist` command-line client.
//!
//! ```bash
//! waitlist steps
//! waitlist submit draft.json
//! waitlist lookup k3j9x0a1bq
//! waitlist --api-url https://waitlist.example.ca lookup k3j9x0a1bq
//! ```

pub mod client;
pub mod lookup;
pub mod steps;
pub mod submit;

pub use client::{ApiClient, ClientError, DEFAULT_API_URL};
