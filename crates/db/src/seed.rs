//! Seed data loading for the in-process backend.
//!
//! A seed document is a JSON object keyed by entity kind (singular, plural
//! or table name) whose values are arrays of display records:
//!
//! ```json
//! { "companies": [ { "Id": 1, "Name": "Acme", "Industry": "Tech" } ] }
//! ```
//!
//! Records go through the same field mapper as regular writes, but keep
//! their `Id` and `createdAt` when present.

use std::path::Path;

use crm_core::entity::{EntityKind, CREATED_ON_COLUMN, ID_FIELD};
use crm_core::error::CoreError;
use crm_core::mapper::{coerce_id, to_wire, WriteMode};
use crm_core::types::Record;
use serde_json::Value;

use crate::memory::MemoryBackend;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Seed document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Seed document must be an object of record arrays")]
    Shape,

    #[error("{0}")]
    UnknownKind(String),

    #[error("Invalid {kind} seed record: {source}")]
    Record {
        kind: EntityKind,
        #[source]
        source: CoreError,
    },
}

/// Read and load a seed file. Returns the number of records loaded.
pub async fn load_seed_file(backend: &MemoryBackend, path: &Path) -> Result<usize, SeedError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let document: Value = serde_json::from_str(&text)?;
    load_seed(backend, &document).await
}

/// Load a parsed seed document. Returns the number of records loaded.
pub async fn load_seed(backend: &MemoryBackend, document: &Value) -> Result<usize, SeedError> {
    let sections = document.as_object().ok_or(SeedError::Shape)?;
    let mut loaded = 0;

    for (key, rows) in sections {
        let kind: EntityKind = key.parse().map_err(SeedError::UnknownKind)?;
        let rows = rows.as_array().ok_or(SeedError::Shape)?;

        let mut wire_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let display = row.as_object().ok_or(SeedError::Shape)?;
            wire_rows.push(seed_row(kind, display)?);
        }

        loaded += wire_rows.len();
        tracing::debug!(%kind, count = wire_rows.len(), "Seeding table");
        backend.seed(kind.table(), wire_rows).await;
    }

    Ok(loaded)
}

fn seed_row(kind: EntityKind, display: &Record) -> Result<Record, SeedError> {
    let mut wire = to_wire(kind, display, WriteMode::Create)
        .map_err(|source| SeedError::Record { kind, source })?;
    if let Some(id) = display.get(ID_FIELD).and_then(coerce_id) {
        wire.insert(ID_FIELD.to_string(), Value::from(id));
    }
    if let Some(created) = display.get("createdAt").and_then(Value::as_str) {
        wire.insert(CREATED_ON_COLUMN.to_string(), Value::String(created.to_string()));
    }
    Ok(wire)
}
