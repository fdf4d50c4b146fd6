//! # Error Types
//!
//! Structured errors for the waitlist domain, built with `thiserror`.
//!
//! - [`ValidationError`]: a record or identifier violates a data-model
//!   invariant. Raised when a draft is coerced into a [`crate::WaitlistFields`]
//!   and when an identifier is parsed.
//! - [`FormError`]: a form state machine event was rejected. The state is
//!   left unchanged whenever one of these is produced.

use thiserror::Error;

use crate::schema::FieldName;

/// Data-model invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required attribute was empty.
    #[error("{field} is required")]
    Required {
        /// Column name of the missing attribute.
        field: &'static str,
    },

    /// A value is not one of the accepted options for the attribute.
    #[error("{value:?} is not a valid {field}")]
    UnknownOption {
        /// Attribute the value was supplied for.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A numeric attribute fell outside its permitted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// `other` was selected as a target market but no elaboration was given.
    #[error("other_markets is required when target_markets includes \"other\"")]
    OtherMarketsRequired,

    /// `other_markets` was set although `other` is not a target market.
    #[error("other_markets must be empty unless target_markets includes \"other\"")]
    UnexpectedOtherMarkets,

    /// The lookup identifier was missing or blank.
    #[error("Missing uniqueId parameter")]
    EmptyIdentifier,
}

/// Rejected form state machine events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// `Next` was requested while required fields of the current step are empty.
    #[error("step {} is incomplete; missing: {}", step + 1, join_fields(missing))]
    StepIncomplete {
        /// Zero-based step index.
        step: usize,
        /// Fields whose requirement is not satisfied.
        missing: Vec<FieldName>,
    },

    /// `Back` was requested on the first step.
    #[error("already at the first step")]
    AtFirstStep,

    /// A submission for this draft is already waiting on the gateway.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The form was already submitted successfully; it accepts no more events.
    #[error("the form has already been submitted")]
    AlreadySubmitted,

    /// A gateway result arrived but nothing was submitted.
    #[error("no submission is in flight")]
    NoSubmissionInFlight,

    /// A text value was given for a multi-select field, or vice versa.
    #[error("{field} does not accept this kind of value")]
    KindMismatch { field: FieldName },

    /// A select value outside the field's options.
    #[error("{value:?} is not an option for {field}")]
    InvalidOption { field: FieldName, value: String },

    /// A number field value that is not an integer in range.
    #[error("{value:?} is not a valid number for {field}")]
    InvalidNumber { field: FieldName, value: String },

    /// An email or telephone value in the wrong format.
    #[error("{value:?} is not a valid value for {field}")]
    InvalidFormat { field: FieldName, value: String },
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}
