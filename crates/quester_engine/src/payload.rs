use serde::Deserialize;
use serde_json::Value;

use crate::FetchFailure;

/// Accepted response bodies: a bare list, or an object carrying the list
/// under `nested` (preferred) or `terms`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrendsPayload {
    Flat(Vec<Value>),
    Wrapped {
        nested: Option<Value>,
        terms: Option<Value>,
    },
}

/// Normalizes a trends response body into a flat, ordered list of terms.
///
/// List entries may be strings or tuples; for tuples only the first element is kept.
/// Entries with no usable text are skipped.
pub fn parse_terms(body: &[u8]) -> Result<Vec<String>, FetchFailure> {
    let payload: TrendsPayload = serde_json::from_slice(body)
        .map_err(|err| FetchFailure::MalformedPayload(err.to_string()))?;

    let items = match payload {
        TrendsPayload::Flat(items) => items,
        // `terms` is only consulted when `nested` is absent or null.
        TrendsPayload::Wrapped { nested, terms } => match nested.or(terms) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(FetchFailure::MalformedPayload(format!(
                    "expected a list of terms, found {other}"
                )))
            }
            None => {
                return Err(FetchFailure::MalformedPayload(
                    "object has neither `nested` nor `terms`".to_string(),
                ))
            }
        },
    };

    Ok(items.into_iter().filter_map(term_text).collect())
}

fn term_text(item: Value) -> Option<String> {
    match item {
        Value::Array(parts) => parts.into_iter().next().and_then(scalar_text),
        other => scalar_text(other),
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
