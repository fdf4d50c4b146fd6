//! # API Route Modules
//!
//! - `waitlist`: signup creation and status lookup under `/api/waitlist`.

pub mod waitlist;
