//! Boundary to the external Squiggle evaluator.
//!
//! The language itself lives outside this crate. `SquiggleCliEvaluator` runs a
//! configured program once per evaluation: the source text goes to its stdin
//! and it must print a single JSON document on stdout, either
//! `{"ok": true, "bindings": [{"name": …, "value": …}, …]}` or
//! `{"ok": false, "error": "<diagnostic>"}`. Binding order is the array order.
//! Values the evaluator cannot structure arrive as `{"$opaque": "<display>"}`.

use std::process::Stdio;

use async_trait::async_trait;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::errors::AppError;

pub const OPAQUE_KEY: &str = "$opaque";

/// One name/value pair of the binding environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: BoundValue,
}

/// Closed value model for everything an evaluation can bind.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// null, bool, number, or string.
    Scalar(Value),
    Sequence(Vec<BoundValue>),
    Record(Vec<(String, BoundValue)>),
    /// Display string for values without a structured form, e.g. distributions.
    Opaque(String),
}

impl Serialize for BoundValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Opaque(text) => serializer.serialize_str(text),
        }
    }
}

impl BoundValue {
    /// Canonical structured-data form, used by the generic bindings dump.
    pub fn canonical_text(&self) -> String {
        serde_json::to_string(self).expect("bound value serialization")
    }
}

/// Outcome of one evaluation. `Failure` is a domain diagnostic, not an error
/// at this layer; infrastructure problems surface as `AppError` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    Success { bindings: Vec<Binding> },
    Failure { diagnostic: String },
}

#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, code: &str) -> Result<EvalOutcome, AppError>;
}

#[derive(Debug, Clone)]
pub struct SquiggleCliEvaluator {
    program: String,
}

impl SquiggleCliEvaluator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Evaluator for SquiggleCliEvaluator {
    async fn evaluate(&self, code: &str) -> Result<EvalOutcome, AppError> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                AppError::internal(format!(
                    "failed to spawn evaluator '{}': {err}",
                    self.program
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(code.as_bytes())
                .await
                .map_err(|err| AppError::internal(format!("failed to write to evaluator: {err}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| AppError::internal(format!("failed to wait for evaluator: {err}")))?;

        match parse_outcome(&output.stdout) {
            Ok(outcome) => Ok(outcome),
            // A crashed evaluator reports nothing useful on stdout; prefer its
            // exit status and stderr over the parse error.
            Err(_) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(AppError::internal(format!(
                    "evaluator exited with {}: {}",
                    output.status,
                    stderr.trim()
                )))
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireOutcome {
    ok: bool,
    #[serde(default)]
    bindings: Vec<WireBinding>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireBinding {
    name: String,
    value: Value,
}

pub fn parse_outcome(raw: &[u8]) -> Result<EvalOutcome, AppError> {
    let wire: WireOutcome = serde_json::from_slice(raw)
        .map_err(|err| AppError::internal(format!("evaluator produced malformed output: {err}")))?;

    if wire.ok {
        let bindings = wire
            .bindings
            .into_iter()
            .map(|binding| Binding {
                name: binding.name,
                value: bound_value_from_json(binding.value),
            })
            .collect();
        return Ok(EvalOutcome::Success { bindings });
    }

    Ok(EvalOutcome::Failure {
        diagnostic: wire
            .error
            .unwrap_or_else(|| "unknown evaluation failure".to_string()),
    })
}

pub fn bound_value_from_json(value: Value) -> BoundValue {
    match value {
        Value::Array(items) => {
            BoundValue::Sequence(items.into_iter().map(bound_value_from_json).collect())
        }
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(display)) = map.get(OPAQUE_KEY) {
                    return BoundValue::Opaque(display.clone());
                }
            }
            BoundValue::Record(
                map.into_iter()
                    .map(|(key, item)| (key, bound_value_from_json(item)))
                    .collect(),
            )
        }
        scalar => BoundValue::Scalar(scalar),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{bound_value_from_json, parse_outcome, BoundValue, EvalOutcome};

    #[test]
    fn parses_success_and_keeps_binding_order() {
        let raw = br#"{"ok":true,"bindings":[{"name":"z","value":3},{"name":"a","value":"hi"}]}"#;

        let outcome = parse_outcome(raw).expect("valid wire outcome");
        let EvalOutcome::Success { bindings } = outcome else {
            panic!("expected success");
        };
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].name, "z");
        assert_eq!(bindings[1].name, "a");
        assert_eq!(bindings[1].value, BoundValue::Scalar(json!("hi")));
    }

    #[test]
    fn parses_failure_diagnostic() {
        let raw = br#"{"ok":false,"error":"Expected a number at line 2"}"#;

        let outcome = parse_outcome(raw).expect("valid wire outcome");
        assert_eq!(
            outcome,
            EvalOutcome::Failure {
                diagnostic: "Expected a number at line 2".to_string()
            }
        );
    }

    #[test]
    fn malformed_output_is_an_infrastructure_error() {
        let err = parse_outcome(b"not json").expect_err("expected parse failure");
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn maps_nested_values() {
        let value = bound_value_from_json(json!({
            "mean": 4.5,
            "dist": {"$opaque": "Normal(4.5, 1.2)"},
            "tags": ["a", "b"]
        }));

        let BoundValue::Record(fields) = value else {
            panic!("expected record");
        };
        assert!(fields.contains(&(
            "dist".to_string(),
            BoundValue::Opaque("Normal(4.5, 1.2)".to_string())
        )));
        assert!(fields.contains(&(
            "tags".to_string(),
            BoundValue::Sequence(vec![
                BoundValue::Scalar(json!("a")),
                BoundValue::Scalar(json!("b")),
            ])
        )));
    }

    #[test]
    fn canonical_text_preserves_record_field_order() {
        let value = BoundValue::Record(vec![
            ("z".to_string(), BoundValue::Scalar(json!(1))),
            ("a".to_string(), BoundValue::Opaque("Beta(2, 5)".to_string())),
        ]);

        assert_eq!(value.canonical_text(), r#"{"z":1,"a":"Beta(2, 5)"}"#);
    }
}
