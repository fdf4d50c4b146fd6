//! # Signup Form State Machine
//!
//! A [`FormState`] owns the step index, the [`Draft`] and the lifecycle of
//! the final submission. [`transition`] is pure: it consumes a state and an
//! event and returns the next state plus either a [`FormCommand`] for the
//! caller to execute or the [`FormError`] that rejected the event. A
//! rejected event always returns the state unchanged.
//!
//! ## Transitions
//!
//! | Event | Effect |
//! |-------|--------|
//! | `Edit` | checks the value against the field schema, stores it in the draft |
//! | `Back` | step - 1 (rejected on step 0 and while in flight) |
//! | `Next` | step + 1 when the step is valid; on the last step emits `Submit` and goes `InFlight` |
//! | `Resolved(Ok)` | `Succeeded`, terminal |
//! | `Resolved(Err)` | `Failed`, stays on the last step with the draft intact |
//!
//! `Edit`, `Back` and `Next` are rejected while a submission is in flight,
//! so the draft that was submitted is the draft that is kept and a failure
//! lands on the last step. A `Next` after a failure resubmits.

use serde::{Deserialize, Serialize};

use crate::draft::{Draft, FieldInput};
use crate::entry::WaitlistEntry;
use crate::error::FormError;
use crate::request::RequestState;
use crate::schema::{FieldName, Step, LAST_STEP, STEPS};

/// Input to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Edit { field: FieldName, value: FieldInput },
    Back,
    Next,
    /// Outcome of the gateway's create operation.
    Resolved(Result<WaitlistEntry, String>),
}

/// Work the caller must perform on the form's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// Hand the draft to the gateway's create operation and report back
    /// with [`FormEvent::Resolved`].
    Submit(Draft),
}

/// Result of an accepted or rejected event.
pub type Outcome = Result<Option<FormCommand>, FormError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub step: usize,
    pub draft: Draft,
    pub submission: RequestState<WaitlistEntry>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-filled draft, on the first step.
    pub fn with_draft(draft: Draft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn current_step(&self) -> &'static Step {
        &STEPS[self.step.min(LAST_STEP)]
    }

    pub fn is_last_step(&self) -> bool {
        self.step == LAST_STEP
    }

    /// `(1-based step, total steps)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.step + 1, STEPS.len())
    }

    /// Fields that block `Next` on the current step.
    pub fn missing_fields(&self) -> Vec<FieldName> {
        self.current_step().missing_fields(&self.draft)
    }

    /// Whether the current step's validity predicate holds.
    pub fn can_advance(&self) -> bool {
        self.current_step().is_valid(&self.draft)
    }

    /// The stored entry, once the submission succeeded.
    pub fn entry(&self) -> Option<&WaitlistEntry> {
        self.submission.succeeded()
    }

    /// Apply `event` in place.
    pub fn apply(&mut self, event: FormEvent) -> Outcome {
        let (next, outcome) = transition(std::mem::take(self), event);
        *self = next;
        outcome
    }
}

/// Compute the state that follows `state` under `event`.
pub fn transition(state: FormState, event: FormEvent) -> (FormState, Outcome) {
    if matches!(state.submission, RequestState::Succeeded(_)) {
        return (state, Err(FormError::AlreadySubmitted));
    }

    match event {
        FormEvent::Edit { field, value } => edit(state, field, value),
        FormEvent::Back => {
            if state.submission.is_in_flight() {
                return (state, Err(FormError::SubmissionInFlight));
            }
            if state.step == 0 {
                return (state, Err(FormError::AtFirstStep));
            }
            let step = state.step - 1;
            (FormState { step, ..state }, Ok(None))
        }
        FormEvent::Next => next(state),
        FormEvent::Resolved(result) => {
            if !state.submission.is_in_flight() {
                return (state, Err(FormError::NoSubmissionInFlight));
            }
            let submission = RequestState::settle(result);
            (FormState { submission, ..state }, Ok(None))
        }
    }
}

fn edit(mut state: FormState, field: FieldName, value: FieldInput) -> (FormState, Outcome) {
    if state.submission.is_in_flight() {
        return (state, Err(FormError::SubmissionInFlight));
    }
    let checked = match field.spec().check(value) {
        Ok(checked) => checked,
        Err(err) => return (state, Err(err)),
    };
    match state.draft.set(field, checked) {
        Ok(()) => (state, Ok(None)),
        Err(err) => (state, Err(err)),
    }
}

fn next(state: FormState) -> (FormState, Outcome) {
    if state.submission.is_in_flight() {
        return (state, Err(FormError::SubmissionInFlight));
    }
    let missing = state.missing_fields();
    if !missing.is_empty() {
        let step = state.step;
        return (state, Err(FormError::StepIncomplete { step, missing }));
    }
    if state.is_last_step() {
        let command = FormCommand::Submit(state.draft.clone());
        let submitted = FormState {
            submission: RequestState::InFlight,
            ..state
        };
        return (submitted, Ok(Some(command)));
    }
    let step = state.step + 1;
    (FormState { step, ..state }, Ok(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::fixtures::complete;
    use crate::entry::fixtures::fields;
    use crate::entry::NewWaitlistEntry;
    use chrono::Utc;
    use uuid::Uuid;

    fn stored() -> WaitlistEntry {
        NewWaitlistEntry::generate(fields()).into_entry(Uuid::new_v4(), Utc::now())
    }

    fn at_last_step() -> FormState {
        FormState {
            step: LAST_STEP,
            ..FormState::with_draft(complete())
        }
    }

    fn edit(field: FieldName, value: &str) -> FormEvent {
        FormEvent::Edit {
            field,
            value: FieldInput::text(value),
        }
    }

    #[test]
    fn empty_form_cannot_advance() {
        let (state, outcome) = transition(FormState::new(), FormEvent::Next);
        assert_eq!(state.step, 0);
        match outcome {
            Err(FormError::StepIncomplete { step: 0, missing }) => {
                assert_eq!(
                    missing,
                    vec![
                        FieldName::FullName,
                        FieldName::JobTitle,
                        FieldName::Email,
                        FieldName::PhoneNumber
                    ]
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn walks_all_steps_then_submits() {
        let mut form = FormState::with_draft(complete());
        for expected in 1..=LAST_STEP {
            assert_eq!(form.apply(FormEvent::Next), Ok(None));
            assert_eq!(form.step, expected);
        }
        assert_eq!(form.progress(), (8, 8));

        let outcome = form.apply(FormEvent::Next);
        assert_eq!(outcome, Ok(Some(FormCommand::Submit(complete()))));
        assert!(form.submission.is_in_flight());
        assert_eq!(form.step, LAST_STEP);
    }

    #[test]
    fn back_moves_down_but_not_below_zero() {
        let mut form = FormState::with_draft(complete());
        assert_eq!(form.apply(FormEvent::Back), Err(FormError::AtFirstStep));
        form.apply(FormEvent::Next).unwrap();
        form.apply(FormEvent::Back).unwrap();
        assert_eq!(form.step, 0);
    }

    #[test]
    fn duplicate_submit_is_rejected_while_in_flight() {
        let mut form = at_last_step();
        form.apply(FormEvent::Next).unwrap();
        assert_eq!(
            form.apply(FormEvent::Next),
            Err(FormError::SubmissionInFlight)
        );
        assert_eq!(
            form.apply(edit(FieldName::FullName, "Someone Else")),
            Err(FormError::SubmissionInFlight)
        );
        assert_eq!(form.draft, complete());
    }

    #[test]
    fn failure_keeps_draft_and_allows_retry() {
        let mut form = at_last_step();
        form.apply(FormEvent::Next).unwrap();
        form.apply(FormEvent::Resolved(Err("connection refused".into())))
            .unwrap();

        assert_eq!(form.submission.error(), Some("connection refused"));
        assert_eq!(form.step, LAST_STEP);
        assert_eq!(form.draft, complete());

        let retry = form.apply(FormEvent::Next);
        assert!(matches!(retry, Ok(Some(FormCommand::Submit(_)))));
    }

    #[test]
    fn back_is_rejected_while_in_flight() {
        let mut form = at_last_step();
        form.apply(FormEvent::Next).unwrap();
        assert_eq!(form.apply(FormEvent::Back), Err(FormError::SubmissionInFlight));

        form.apply(FormEvent::Resolved(Err("timeout".into()))).unwrap();
        assert_eq!(form.step, LAST_STEP);
        assert_eq!(form.submission.error(), Some("timeout"));
        form.apply(FormEvent::Back).unwrap();
        assert_eq!(form.step, LAST_STEP - 1);
    }

    #[test]
    fn success_is_terminal() {
        let mut form = at_last_step();
        form.apply(FormEvent::Next).unwrap();
        let entry = stored();
        form.apply(FormEvent::Resolved(Ok(entry.clone()))).unwrap();
        assert_eq!(form.entry(), Some(&entry));

        assert_eq!(form.apply(FormEvent::Next), Err(FormError::AlreadySubmitted));
        assert_eq!(form.apply(FormEvent::Back), Err(FormError::AlreadySubmitted));
    }

    #[test]
    fn result_without_submission_is_rejected() {
        let (_, outcome) = transition(FormState::new(), FormEvent::Resolved(Ok(stored())));
        assert_eq!(outcome, Err(FormError::NoSubmissionInFlight));
    }

    #[test]
    fn rejected_edit_leaves_state_unchanged() {
        let form = FormState::with_draft(complete());
        let (after, outcome) = transition(form.clone(), edit(FieldName::Budget, "free"));
        assert!(matches!(outcome, Err(FormError::InvalidOption { .. })));
        assert_eq!(after, form);
    }

    #[test]
    fn other_market_requires_elaboration_until_deselected() {
        let mut form = FormState {
            step: 2,
            ..FormState::with_draft(complete())
        };
        form.apply(FormEvent::Edit {
            field: FieldName::TargetMarkets,
            value: FieldInput::many(["other"]),
        })
        .unwrap();
        assert_eq!(form.missing_fields(), vec![FieldName::OtherMarkets]);
        assert!(!form.can_advance());

        form.apply(edit(FieldName::OtherMarkets, "NATO")).unwrap();
        assert!(form.can_advance());

        form.apply(FormEvent::Edit {
            field: FieldName::TargetMarkets,
            value: FieldInput::many(["federal"]),
        })
        .unwrap();
        form.apply(edit(FieldName::OtherMarkets, "")).unwrap();
        assert!(form.can_advance());
        assert_eq!(form.apply(FormEvent::Next), Ok(None));
        assert_eq!(form.step, 3);
    }

    #[test]
    fn legacy_provincial_market_is_accepted() {
        let mut form = FormState {
            step: 2,
            ..FormState::with_draft(complete())
        };
        form.apply(FormEvent::Edit {
            field: FieldName::TargetMarkets,
            value: FieldInput::many(["provincial"]),
        })
        .unwrap();
        assert_eq!(form.draft.target_markets, vec!["provincial-qc".to_string()]);
        assert_eq!(form.apply(FormEvent::Next), Ok(None));
    }
}
