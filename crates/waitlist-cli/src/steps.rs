//! # Steps Subcommand
//!
//! Prints the eight form steps with each field's key, label, kind,
//! requirement and options.

use std::fmt::Write as _;

use anyhow::Result;
use waitlist_core::{FieldKind, FieldSpec, Requirement, STEPS};

fn kind_label(kind: FieldKind) -> String {
    match kind {
        FieldKind::Text => "text".into(),
        FieldKind::Email => "email".into(),
        FieldKind::Tel => "phone".into(),
        FieldKind::Select => "select one".into(),
        FieldKind::MultiSelect => "select many".into(),
        FieldKind::Number { min, max } if max == i64::from(i32::MAX) => {
            format!("number >= {min}")
        }
        FieldKind::Number { min, max } => format!("number {min}-{max}"),
    }
}

fn requirement_label(required: Requirement) -> &'static str {
    match required {
        Requirement::Always => "required",
        Requirement::WhenOtherMarketSelected => "required when \"other\" is selected",
        Requirement::Optional => "optional",
    }
}

fn render_field(out: &mut String, field: &FieldSpec) {
    let _ = writeln!(
        out,
        "  {} ({}) [{}, {}]",
        field.label,
        field.name,
        kind_label(field.kind),
        requirement_label(field.required)
    );
    for (value, label) in field.options {
        let _ = writeln!(out, "      {value:<10} {label}");
    }
}

/// The whole form as plain text.
pub fn render_steps() -> String {
    let mut out = String::new();
    for (index, step) in STEPS.iter().enumerate() {
        let _ = writeln!(out, "Step {}/{}: {}", index + 1, STEPS.len(), step.title);
        let _ = writeln!(out, "  {}", step.subtitle);
        for field in step.fields {
            render_field(&mut out, field);
        }
        out.push('\n');
    }
    out
}

pub fn run_steps() -> Result<u8> {
    print!("{}", render_steps());
    Ok(0)
}
