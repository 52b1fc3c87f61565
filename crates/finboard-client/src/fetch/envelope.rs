use serde_json::Value;
use tracing::debug;

use crate::dashboard::record::TransactionRecord;
use crate::{ClientError, ClientResult};

/// Wrapping structure the backend used for a transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    BareArray,
    StatusData,
    Content,
    Transactions,
    List,
}

impl EnvelopeShape {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BareArray => "array",
            Self::StatusData => "status_data",
            Self::Content => "content",
            Self::Transactions => "transactions",
            Self::List => "list",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedList {
    pub shape: EnvelopeShape,
    pub records: Vec<TransactionRecord>,
    pub skipped: usize,
}

const KEYED_SHAPES: [(&str, EnvelopeShape); 3] = [
    ("content", EnvelopeShape::Content),
    ("transactions", EnvelopeShape::Transactions),
    ("list", EnvelopeShape::List),
];

pub fn normalize_body(body: &str) -> ClientResult<NormalizedList> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Err(ClientError::unrecognized_envelope("html document"));
    }
    let value: Value = serde_json::from_str(trimmed)
        .map_err(|_| ClientError::unrecognized_envelope("non-JSON body"))?;
    normalize_envelope(&value)
}

pub fn normalize_envelope(body: &Value) -> ClientResult<NormalizedList> {
    let (shape, items) = locate_list(body)?;

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for (index, item) in items.iter().enumerate() {
        match TransactionRecord::from_value(item) {
            Some(record) => records.push(record),
            None => {
                debug!(index, "skipping non-object transaction entry");
                skipped += 1;
            }
        }
    }

    Ok(NormalizedList {
        shape,
        records,
        skipped,
    })
}

fn locate_list(body: &Value) -> ClientResult<(EnvelopeShape, &Vec<Value>)> {
    if let Some(items) = body.as_array() {
        return Ok((EnvelopeShape::BareArray, items));
    }

    let Some(object) = body.as_object() else {
        return Err(ClientError::unrecognized_envelope(json_kind(body)));
    };

    let status = object.get("status").and_then(Value::as_str);
    if status == Some("success")
        && let Some(items) = object.get("data").and_then(Value::as_array)
    {
        return Ok((EnvelopeShape::StatusData, items));
    }

    for (key, shape) in KEYED_SHAPES {
        if let Some(items) = object.get(key).and_then(Value::as_array) {
            return Ok((shape, items));
        }
    }

    if let Some(message) = object.get("message").and_then(Value::as_str)
        && status.is_some_and(|value| value != "success")
    {
        return Err(ClientError::backend_rejected("transaction history", message));
    }

    let mut keys = object.keys().map(String::as_str).collect::<Vec<&str>>();
    keys.sort_unstable();
    Err(ClientError::unrecognized_envelope(&format!(
        "object with keys [{}]",
        keys.join(", ")
    )))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
