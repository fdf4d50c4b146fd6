//! # waitlist-core
//!
//! Domain types for the waitlist signup service. No I/O happens here.
//!
//! - [`entry`]: the persisted record and its invariants.
//! - [`identity`]: the opaque [`UniqueId`] lookup token.
//! - [`choices`]: closed option sets for select fields.
//! - [`draft`]: the form's raw answers and their coercion into a record.
//! - [`schema`]: the declarative eight-step form description.
//! - [`form`]: the signup form state machine.
//! - [`panel`]: the status lookup panel state machine.
//! - [`request`]: the lifecycle of a pending gateway call.

pub mod choices;
pub mod draft;
pub mod entry;
pub mod error;
pub mod form;
pub mod identity;
pub mod panel;
pub mod request;
pub mod schema;

pub use choices::{
    AlertMethod, AnnualRevenue, Budget, BusinessGoal, Choice, CompanySize, GovExperience,
    Language, TargetMarket, YesNo,
};
pub use draft::{Draft, FieldInput, FieldValue};
pub use entry::{NewWaitlistEntry, WaitlistEntry, WaitlistFields};
pub use error::{FormError, ValidationError};
pub use form::{FormCommand, FormEvent, FormState};
pub use identity::UniqueId;
pub use panel::{PanelCommand, PanelEvent, StatusPanel};
pub use request::RequestState;
pub use schema::{FieldKind, FieldName, FieldSpec, Requirement, Step, STEPS};
