//! Wire ↔ display record mapping.
//!
//! The backend stores flat rows keyed by storage column names
//! (`first_name_c`, `CreatedOn`, ...). Presentation code works with display
//! records keyed by the names in [`KindConfig`](crate::entity::KindConfig),
//! with every field present and typed. Both directions are pure.

use serde_json::Value;

use crate::entity::{
    EntityKind, FieldDefault, FieldSpec, FieldType, NameRule, ID_FIELD, NAME_COLUMN,
};
use crate::error::CoreError;
use crate::types::{DbId, Record};

/// Whether a wire fragment is destined for an insert or a partial replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Absent fields receive their defaults.
    Create,
    /// Absent fields are omitted so the stored value is kept.
    Update,
}

// ---------------------------------------------------------------------------
// Wire -> display
// ---------------------------------------------------------------------------

/// Convert a wire record to its display shape.
///
/// Every configured field is present in the result. Missing or blank wire
/// values are replaced by the field's default; references arriving as
/// `{"Id": n, ...}` objects are flattened to `n`.
pub fn to_display(kind: EntityKind, wire: &Record) -> Record {
    let cfg = kind.config();
    let mut out = Record::new();

    let id = wire.get(ID_FIELD).and_then(coerce_id);
    out.insert(ID_FIELD.to_string(), id.map(Value::from).unwrap_or(Value::Null));

    let mut deferred = Vec::new();
    for field in cfg.fields {
        let value = wire
            .get(field.wire)
            .filter(|v| !is_blank(v))
            .and_then(|v| display_value(field, v));
        match (value, field.default) {
            (Some(v), _) => {
                out.insert(field.display.to_string(), v);
            }
            (None, FieldDefault::Field(source)) => deferred.push((field.display, source)),
            (None, default) => {
                out.insert(field.display.to_string(), default_value(default));
            }
        }
    }

    // Field-to-field defaults resolve after every direct value is known.
    for (display, source) in deferred {
        let value = out.get(source).cloned().unwrap_or(Value::Null);
        out.insert(display.to_string(), value);
    }

    out
}

fn display_value(field: &FieldSpec, raw: &Value) -> Option<Value> {
    match field.ty {
        FieldType::Text | FieldType::Timestamp => match raw {
            Value::String(s) => Some(Value::String(s.clone())),
            Value::Number(n) => Some(Value::String(n.to_string())),
            Value::Bool(b) => Some(Value::String(b.to_string())),
            _ => None,
        },
        FieldType::Integer => coerce_i64(raw).map(Value::from),
        FieldType::Decimal => coerce_f64(raw).map(Value::from),
        FieldType::Reference { .. } => coerce_id(raw).map(Value::from),
    }
}

fn default_value(default: FieldDefault) -> Value {
    match default {
        FieldDefault::Empty => Value::String(String::new()),
        FieldDefault::Zero => Value::from(0),
        FieldDefault::Text(s) => Value::String(s.to_string()),
        FieldDefault::Null | FieldDefault::Field(_) | FieldDefault::Now => Value::Null,
    }
}

// ---------------------------------------------------------------------------
// Display -> wire
// ---------------------------------------------------------------------------

/// Convert a display draft to a wire fragment suitable for insert/replace.
///
/// Server-assigned columns are never written. Text is trimmed, numbers are
/// coerced (non-numeric becomes `0`), and references are parsed as integer
/// identities. Blank timestamps defaulting to now are stamped here, so the
/// stored row carries the value every later read returns. A required reference that cannot be parsed fails with
/// [`CoreError::InvalidReference`]; an optional one is left out.
pub fn to_wire(kind: EntityKind, display: &Record, mode: WriteMode) -> Result<Record, CoreError> {
    let cfg = kind.config();
    let mut out = Record::new();

    for field in cfg.fields.iter().filter(|f| f.writable) {
        let raw = match (display.get(field.display), mode) {
            (Some(v), _) => Some(v),
            (None, WriteMode::Update) => continue,
            (None, WriteMode::Create) => None,
        };
        if let Some(value) = wire_value(field, raw)? {
            out.insert(field.wire.to_string(), value);
        }
    }

    if let Some(name) = wire_name(kind, display) {
        out.insert(NAME_COLUMN.to_string(), Value::String(name));
    }

    Ok(out)
}

/// Derive the wire `Name` column from a display record.
///
/// Returns `None` unless every input field is present, so a partial draft
/// never produces a fragment. Callers updating a stored record pass the
/// stored fields merged with the draft.
pub fn wire_name(kind: EntityKind, display: &Record) -> Option<String> {
    derive_name(kind.config().name_rule, display)
}

fn wire_value(field: &FieldSpec, raw: Option<&Value>) -> Result<Option<Value>, CoreError> {
    let value = match field.ty {
        FieldType::Text => {
            let text = raw.and_then(text_of).map(|s| s.trim().to_string());
            match (text, field.default) {
                (Some(s), FieldDefault::Text(initial)) if s.is_empty() => {
                    Some(Value::String(initial.to_string()))
                }
                (Some(s), _) => Some(Value::String(s)),
                (None, FieldDefault::Text(initial)) => Some(Value::String(initial.to_string())),
                (None, _) => Some(Value::String(String::new())),
            }
        }
        FieldType::Integer => Some(Value::from(raw.and_then(coerce_i64).unwrap_or(0))),
        FieldType::Decimal => Some(Value::from(raw.and_then(coerce_f64).unwrap_or(0.0))),
        FieldType::Reference { required } => match raw.and_then(coerce_id) {
            Some(id) => Some(Value::from(id)),
            None if required => {
                return Err(CoreError::InvalidReference {
                    field: field.display.to_string(),
                    value: raw.map(render).unwrap_or_default(),
                })
            }
            None => None,
        },
        FieldType::Timestamp => {
            let stamp = raw
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            match (stamp, field.default) {
                (Some(s), _) => Some(Value::String(s)),
                (None, FieldDefault::Now) => Some(Value::String(chrono::Utc::now().to_rfc3339())),
                (None, _) => None,
            }
        }
    };
    Ok(value)
}

fn derive_name(rule: NameRule, display: &Record) -> Option<String> {
    let text = |name: &str| display.get(name).and_then(text_of).map(|s| s.trim().to_string());
    match rule {
        NameRule::Field(name) => text(name),
        NameRule::Joined(names) => {
            let parts: Option<Vec<String>> = names.iter().map(|n| text(n)).collect();
            parts.map(|p| p.join(" ").trim().to_string())
        }
        NameRule::Summary {
            prefix,
            body,
            max_chars,
        } => {
            let prefix = text(prefix)?;
            let body: String = text(body)?.chars().take(max_chars).collect();
            Some(format!("{prefix} - {body}"))
        }
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Normalize an identity or reference value to a positive integer.
///
/// Accepts a bare number, a numeric string, or an object carrying `Id`
/// (the shape lookups come back in).
pub fn coerce_id(value: &Value) -> Option<DbId> {
    let id = match value {
        Value::Object(map) => return map.get(ID_FIELD).and_then(coerce_id),
        other => coerce_i64(other)?,
    };
    (id > 0).then_some(id)
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
