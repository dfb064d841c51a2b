//! Normalizes an evaluation outcome into a single text payload.
//!
//! Whatever the evaluated program bound, the tool answers with exactly one
//! string: a curated summary, a raw bindings dump, or a diagnostic line.

use crate::evaluator::{Binding, BoundValue, EvalOutcome};

pub const SUMMARY_BINDING: &str = "summary";

/// First match wins: curated summary, generic dump, diagnostic.
pub fn format_outcome(outcome: &EvalOutcome, render_summary: bool) -> String {
    match outcome {
        EvalOutcome::Success { bindings } => {
            if render_summary {
                if let Some(rendered) = try_render_summary(bindings) {
                    return rendered;
                }
            }

            bindings
                .iter()
                .map(|binding| format!("{}: {}", binding.name, binding.value.canonical_text()))
                .collect::<Vec<_>>()
                .join("\n")
        }
        // The opening quote has no closing counterpart; established output
        // format, kept for compatibility.
        EvalOutcome::Failure { diagnostic } => format!("Error: \"{diagnostic}"),
    }
}

/// A `summary` binding that is not a sequence falls back to the generic dump.
fn try_render_summary(bindings: &[Binding]) -> Option<String> {
    let binding = bindings
        .iter()
        .find(|binding| binding.name == SUMMARY_BINDING)?;

    let BoundValue::Sequence(items) = &binding.value else {
        return None;
    };

    Some(
        items
            .iter()
            .map(summary_item_text)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Summary items are records exposing a `value` field; bare items render as
/// themselves.
fn summary_item_text(item: &BoundValue) -> String {
    if let BoundValue::Record(fields) = item {
        if let Some((_, value)) = fields.iter().find(|(name, _)| name == "value") {
            return display_text(value);
        }
    }

    display_text(item)
}

/// Curated rendering: strings and opaque values appear unquoted, everything
/// else in its canonical form.
fn display_text(value: &BoundValue) -> String {
    match value {
        BoundValue::Scalar(scalar) => match scalar.as_str() {
            Some(text) => text.to_string(),
            None => scalar.to_string(),
        },
        BoundValue::Opaque(display) => display.clone(),
        other => other.canonical_text(),
    }
}
