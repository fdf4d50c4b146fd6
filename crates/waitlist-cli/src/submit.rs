//! # Submit Subcommand
//!
//! Loads a camelCase draft from a JSON file and walks it through the signup
//! form exactly as an interactive user would: every field of the current
//! step is entered (and checked) before `Next`. The final `Next` submits
//! through the API; on success the confirmation panel is printed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use waitlist_core::{
    Draft, FieldInput, FieldValue, FormCommand, FormEvent, FormState, PanelEvent, StatusPanel,
};

use crate::client::ApiClient;

/// Arguments for the `waitlist submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Path to a JSON draft keyed by camelCase field names.
    pub draft: PathBuf,
}

pub fn load_draft(path: &Path) -> Result<Draft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read draft {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse draft {}", path.display()))
}

fn input_for(value: FieldValue<'_>) -> FieldInput {
    match value {
        FieldValue::Text(s) => FieldInput::text(s),
        FieldValue::Many(values) => FieldInput::many(values.iter().cloned()),
    }
}

/// Fill and advance each step of a fresh form from `draft`, submitting on
/// the last one. Returns the form after the submission has resolved.
///
/// # Errors
///
/// Fails on the first rejected edit or blocked step, naming the field or
/// the missing fields.
pub async fn drive_form(draft: &Draft, client: &ApiClient) -> Result<FormState> {
    let mut form = FormState::new();
    loop {
        let step = form.current_step();
        for field in step.fields {
            form.apply(FormEvent::Edit {
                field: field.name,
                value: input_for(draft.value(field.name)),
            })
            .with_context(|| format!("{} ({})", field.label, field.name))?;
        }

        let (position, total) = form.progress();
        let command = form
            .apply(FormEvent::Next)
            .with_context(|| format!("cannot leave \"{}\"", step.title))?;
        println!("[{position}/{total}] {}: ok", step.title);

        if let Some(FormCommand::Submit(submitted)) = command {
            let result = client.create(&submitted).await.map_err(|e| e.to_string());
            form.apply(FormEvent::Resolved(result))?;
            return Ok(form);
        }
    }
}

pub async fn run_submit(args: &SubmitArgs, client: &ApiClient) -> Result<u8> {
    let draft = load_draft(&args.draft)?;
    let form = drive_form(&draft, client).await?;

    if let Some(entry) = form.entry() {
        tracing::info!(unique_id = %entry.unique_id, "registration created");
        let mut panel = StatusPanel::new();
        panel.apply(PanelEvent::Confirmed(entry.clone()));
        println!();
        print!("{}", panel.render());
        return Ok(0);
    }

    let message = form.submission.error().unwrap_or("submission did not complete");
    eprintln!("Error: {message}");
    Ok(1)
}
