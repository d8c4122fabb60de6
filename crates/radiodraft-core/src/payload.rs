//! Two-step parser for the triage model's structured answer.
//!
//! Vision models asked for "JSON only" still wrap their answer in prose or
//! markdown fences often enough that the raw text cannot go straight to
//! `serde_json`. Parsing is therefore split:
//!
//! 1. [`extract_payload`] picks the candidate JSON substring out of the
//!    reply using a fixed fence rule.
//! 2. [`parse_triage`] decodes that substring and checks it field by field
//!    against the triage schema, returning a typed [`PayloadError`] that
//!    names what was wrong.
//!
//! # Schema
//!
//! | field                  | required | type                                  |
//! |------------------------|----------|---------------------------------------|
//! | `urgency`              | yes      | `"urgent"` / `"routine"` / `"normal"` |
//! | `complexity`           | yes      | `"simple"` / `"complex"`              |
//! | `confidence`           | yes      | number in `[0, 1]`                    |
//! | `preliminary_findings` | yes      | array of strings                      |
//! | `reasoning`            | yes      | string                                |
//! | `quality_issues`       | no       | string or `null`                      |
//! | `recommended_action`   | no       | string or `null`                      |
//!
//! Enum values are matched case-insensitively. Unknown fields are ignored.

use serde_json::{Map, Value};
use thiserror::Error;

use radiodraft_types::{Complexity, TriageVerdict, Urgency};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Why a triage reply could not be turned into a verdict.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// Nothing left after extraction.
    #[error("empty triage payload")]
    Empty,

    /// The extracted text is not JSON.
    #[error("triage payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON, but not an object.
    #[error("triage payload is not a JSON object")]
    NotAnObject,

    /// A required field is absent or `null`.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present with an unusable value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Schema field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Extract the candidate JSON substring from a model reply.
///
/// - If the text contains a `` ```json `` fence, the payload is everything
///   after the first such fence up to the next `` ``` `` (or the end of the
///   text when the closing fence is missing).
/// - Otherwise, if the trimmed text opens with a bare `` ``` `` fence, the
///   fence line is dropped along with a trailing `` ``` ``.
/// - Otherwise the whole text is the payload.
///
/// The result is always trimmed.
pub fn extract_payload(text: &str) -> &str {
    if let Some(start) = text.find(JSON_FENCE) {
        let rest = &text[start + JSON_FENCE.len()..];
        let body = match rest.find(FENCE) {
            Some(end) => &rest[..end],
            None => rest,
        };
        return body.trim();
    }

    let trimmed = text.trim();
    if let Some(after_open) = trimmed.strip_prefix(FENCE) {
        // Drop an info string such as "JSON" or "javascript" on the fence line.
        let body = match after_open.find('\n') {
            Some(nl) => &after_open[nl + 1..],
            None => after_open,
        };
        let body = body.trim_end();
        return body.strip_suffix(FENCE).unwrap_or(body).trim();
    }

    trimmed
}

/// Parse a triage reply into a verdict carrying `cost`.
pub fn parse_triage(text: &str, cost: f64) -> Result<TriageVerdict, PayloadError> {
    let payload = extract_payload(text);
    if payload.is_empty() {
        return Err(PayloadError::Empty);
    }

    let value: Value = serde_json::from_str(payload)?;
    let obj = value.as_object().ok_or(PayloadError::NotAnObject)?;

    let urgency: Urgency = required_str(obj, "urgency")?
        .parse()
        .map_err(|e| invalid("urgency", e))?;
    let complexity: Complexity = required_str(obj, "complexity")?
        .parse()
        .map_err(|e| invalid("complexity", e))?;

    Ok(TriageVerdict {
        urgency,
        complexity,
        confidence: confidence(obj)?,
        preliminary_findings: findings(obj)?,
        reasoning: required_str(obj, "reasoning")?.to_string(),
        quality_issues: optional_str(obj, "quality_issues")?,
        recommended_action: optional_str(obj, "recommended_action")?,
        cost,
    })
}

fn invalid(field: &'static str, reason: impl ToString) -> PayloadError {
    PayloadError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, PayloadError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(PayloadError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, PayloadError> {
    required(obj, field)?
        .as_str()
        .ok_or_else(|| invalid(field, "expected a string"))
}

fn optional_str(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, PayloadError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(field, "expected a string or null")),
    }
}

fn confidence(obj: &Map<String, Value>) -> Result<f64, PayloadError> {
    let c = required(obj, "confidence")?
        .as_f64()
        .ok_or_else(|| invalid("confidence", "expected a number"))?;
    if !(0.0..=1.0).contains(&c) {
        return Err(invalid("confidence", format!("{c} is outside [0, 1]")));
    }
    Ok(c)
}

fn findings(obj: &Map<String, Value>) -> Result<Vec<String>, PayloadError> {
    required(obj, "preliminary_findings")?
        .as_array()
        .ok_or_else(|| invalid("preliminary_findings", "expected an array"))?
        .iter()
        .map(|item| {
            item.as_str()
                .map(String::from)
                .ok_or_else(|| invalid("preliminary_findings", "expected an array of strings"))
        })
        .collect()
}
