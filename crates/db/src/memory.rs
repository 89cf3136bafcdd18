//! In-process record backend.
//!
//! Each table is an independent collection behind one `RwLock`; there is no
//! cross-table atomicity and no cascading. Identity allocation keeps a
//! per-table high-water mark so ids are never reused after deletion. The
//! write lock serializes inserts, which makes allocation single-writer.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use crm_core::entity::{CREATED_ON_COLUMN, ID_FIELD, MODIFIED_ON_COLUMN};
use crm_core::listing::locale_compare;
use crm_core::mapper::coerce_id;
use crm_core::types::{DbId, Record};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::backend::{
    BackendError, Condition, FetchParams, Operator, RecordBackend, RemoveOutcome, SortType,
    WriteResult,
};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,
    /// Highest identity ever assigned in this table.
    last_id: DbId,
}

impl Table {
    fn position(&self, id: DbId) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(ID_FIELD).and_then(coerce_id) == Some(id))
    }
}

/// Explicitly owned store; construct one per application (or per test).
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryBackend {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load wire rows verbatim, keeping their identities.
    ///
    /// Rows without an `Id` are assigned the next identity; rows without
    /// `CreatedOn` are stamped with the current time.
    pub async fn seed(&self, table: &str, rows: Vec<Record>) {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        for mut row in rows {
            let id = match row.get(ID_FIELD).and_then(coerce_id) {
                Some(id) => id,
                None => table.last_id + 1,
            };
            table.last_id = table.last_id.max(id);
            row.insert(ID_FIELD.to_string(), Value::from(id));
            if !row.contains_key(CREATED_ON_COLUMN) {
                row.insert(CREATED_ON_COLUMN.to_string(), now());
            }
            table.rows.push(row);
        }
    }

    /// Number of rows currently stored in `table`.
    pub async fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |t| t.rows.len())
    }

    /// Whether `table` holds no rows.
    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }
}

#[async_trait]
impl RecordBackend for MemoryBackend {
    async fn fetch(&self, table: &str, params: &FetchParams) -> Result<Vec<Record>, BackendError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&Record> = table
            .rows
            .iter()
            .filter(|row| params.conditions.iter().all(|c| condition_holds(row, c)))
            .filter(|row| {
                params.any_of.is_empty() || params.any_of.iter().any(|c| condition_holds(row, c))
            })
            .collect();

        rows.sort_by(|a, b| compare_rows(a, b, params));

        let offset = usize::try_from(params.paging_info.offset.max(0)).unwrap_or(0);
        let limit = usize::try_from(params.paging_info.limit.max(0)).unwrap_or(0);
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, &params.fields))
            .collect())
    }

    async fn fetch_one(
        &self,
        table: &str,
        id: DbId,
        fields: &[String],
    ) -> Result<Option<Record>, BackendError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|t| t.position(id).map(|i| project(&t.rows[i], fields))))
    }

    async fn insert(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<Vec<WriteResult>, BackendError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        let mut results = Vec::with_capacity(records.len());
        for mut record in records {
            table.last_id += 1;
            let stamp = now();
            record.insert(ID_FIELD.to_string(), Value::from(table.last_id));
            record.insert(CREATED_ON_COLUMN.to_string(), stamp.clone());
            record.insert(MODIFIED_ON_COLUMN.to_string(), stamp);
            table.rows.push(record.clone());
            results.push(WriteResult::ok(record));
        }
        Ok(results)
    }

    async fn replace(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<Vec<WriteResult>, BackendError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = record.get(ID_FIELD).and_then(coerce_id) else {
                results.push(WriteResult::failed("Record Id is required"));
                continue;
            };
            let Some(index) = table.position(id) else {
                results.push(WriteResult::failed(format!("Record {id} not found")));
                continue;
            };
            let row = &mut table.rows[index];
            for (key, value) in record {
                if key != ID_FIELD && key != CREATED_ON_COLUMN {
                    row.insert(key, value);
                }
            }
            row.insert(MODIFIED_ON_COLUMN.to_string(), now());
            results.push(WriteResult::ok(row.clone()));
        }
        Ok(results)
    }

    async fn remove(&self, table: &str, ids: Vec<DbId>) -> Result<RemoveOutcome, BackendError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        let mut missing = Vec::new();
        for id in ids {
            match table.position(id) {
                Some(index) => {
                    table.rows.remove(index);
                }
                None => missing.push(id),
            }
        }
        if missing.is_empty() {
            Ok(RemoveOutcome {
                success: true,
                message: "Records deleted".to_string(),
            })
        } else {
            Ok(RemoveOutcome {
                success: false,
                message: format!("Records not found: {missing:?}"),
            })
        }
    }
}

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

/// Comparable text of a stored value. Lookup objects compare by their `Id`.
fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => map.get(ID_FIELD).map(value_key).unwrap_or_default(),
        _ => String::new(),
    }
}

fn condition_holds(row: &Record, condition: &Condition) -> bool {
    let actual = row
        .get(&condition.field_name)
        .map(value_key)
        .unwrap_or_default();
    match condition.operator {
        Operator::ExactMatch => condition.values.iter().any(|v| value_key(v) == actual),
        Operator::Contains => {
            let haystack = actual.to_lowercase();
            condition
                .values
                .iter()
                .any(|v| haystack.contains(&value_key(v).to_lowercase()))
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => locale_compare(
            &a.map(value_key).unwrap_or_default(),
            &b.map(value_key).unwrap_or_default(),
        ),
    }
}

fn compare_rows(a: &Record, b: &Record, params: &FetchParams) -> Ordering {
    let mut ordering = Ordering::Equal;
    for order in &params.order_by {
        let ord = compare_values(a.get(&order.field_name), b.get(&order.field_name));
        ordering = ordering.then(match order.sorttype {
            SortType::Asc => ord,
            SortType::Desc => ord.reverse(),
        });
    }
    // Rows stamped within the same instant fall back to identity, following
    // the direction of the primary ordering.
    let by_id = compare_values(a.get(ID_FIELD), b.get(ID_FIELD));
    match params.order_by.first().map(|o| o.sorttype) {
        Some(SortType::Desc) => ordering.then(by_id.reverse()),
        _ => ordering.then(by_id),
    }
}

fn project(row: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return row.clone();
    }
    row.iter()
        .filter(|(key, _)| key.as_str() == ID_FIELD || fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
