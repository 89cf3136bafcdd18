//! Generic repository over one entity kind.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crm_core::entity::{EntityKind, ID_FIELD, NAME_COLUMN};
use crm_core::error::CoreError;
use crm_core::listing::{build_list, ListFilter, SortOrder};
use crm_core::mapper::{to_display, to_wire, wire_name, WriteMode};
use crm_core::models::Entity;
use crm_core::search::MAX_PAGE_SIZE;
use crm_core::types::{DbId, Record};
use crm_core::validation::missing_required;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{BackendError, Condition, FetchParams, RecordBackend, SortType, WriteResult};

/// Acknowledgement returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteAck {
    pub success: bool,
    pub message: String,
}

/// CRUD and query operations for one entity kind.
///
/// Cheap to clone; the backend is shared behind an `Arc`.
#[derive(Clone)]
pub struct EntityRepo {
    kind: EntityKind,
    backend: Arc<dyn RecordBackend>,
}

impl EntityRepo {
    pub fn new(kind: EntityKind, backend: Arc<dyn RecordBackend>) -> Self {
        Self { kind, backend }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    fn table(&self) -> &'static str {
        self.kind.table()
    }

    /// Log a backend failure and normalize it for the caller.
    fn failure(&self, action: &str, err: BackendError) -> CoreError {
        tracing::error!(kind = %self.kind, action, error = %err, "Record backend call failed");
        err.into()
    }

    /// Build the backend query for a list request.
    ///
    /// Category and search are pushed down as conditions; the sort field
    /// (or `CreatedOn DESC` by default) becomes the backend ordering.
    ///
    /// Blank stored values display as the field default, so a category
    /// equal to that default also matches blanks, and a search term found
    /// in a searchable default is not pushed down at all. [`build_list`]
    /// then filters on display values.
    pub fn list_params(&self, filter: &ListFilter) -> FetchParams {
        let cfg = self.kind.config();
        let mut params = FetchParams::for_kind(self.kind);

        if let Some(category) = filter.active_category() {
            if let Some(field) = cfg.field(cfg.category) {
                params = params.with_condition(Condition::exact_or_blank(field, category));
            }
        }

        if let Some(term) = filter.search_term() {
            let matches_default = cfg
                .searchable
                .iter()
                .filter_map(|name| cfg.field(name).and_then(|f| f.default_text()))
                .any(|text| text.to_lowercase().contains(term.as_str()));
            if !matches_default {
                let any_of = cfg
                    .searchable_wire()
                    .into_iter()
                    .map(|wire| Condition::contains(wire, &term))
                    .collect();
                params = params.with_any_of(any_of);
            }
        }

        if let Some(sort_by) = filter.sort_field(self.kind) {
            let wire = cfg.field(sort_by).map_or(ID_FIELD, |f| f.wire);
            let sorttype = match filter.sort_order {
                SortOrder::Asc => SortType::Asc,
                SortOrder::Desc => SortType::Desc,
            };
            params = params.ordered_by(wire, sorttype);
        }

        params
    }

    /// List display records matching `filter`. The filter is never mutated.
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<Record>, CoreError> {
        let params = self.list_params(filter);
        let rows = self
            .backend
            .fetch(self.table(), &params)
            .await
            .map_err(|e| self.failure("list", e))?;
        let records = rows.iter().map(|row| to_display(self.kind, row)).collect();
        Ok(build_list(self.kind, records, filter))
    }

    /// Typed variant of [`list`](Self::list).
    pub async fn list_as<T: Entity>(&self, filter: &ListFilter) -> Result<Vec<T>, CoreError> {
        self.list(filter)
            .await?
            .into_iter()
            .map(T::from_record)
            .collect()
    }

    /// Fetch one record. Missing ids and backend failures both yield `None`.
    pub async fn get_by_id(&self, id: DbId) -> Option<Record> {
        let fields = self.kind.config().wire_columns();
        match self.backend.fetch_one(self.table(), id, &fields).await {
            Ok(row) => row.map(|r| to_display(self.kind, &r)),
            Err(err) => {
                tracing::warn!(kind = %self.kind, id, error = %err, "Lookup failed, treating as absent");
                None
            }
        }
    }

    /// Create a record from a display draft and return it as stored.
    pub async fn create(&self, draft: &Record) -> Result<Record, CoreError> {
        let missing = missing_required(self.kind, draft, WriteMode::Create);
        if !missing.is_empty() {
            return Err(CoreError::Validation(missing));
        }

        let draft = self.touched(draft);
        let wire = to_wire(self.kind, &draft, WriteMode::Create)?;
        let results = self
            .backend
            .insert(self.table(), vec![wire])
            .await
            .map_err(|e| self.failure("create", e))?;
        let record = self.first_written("create", results)?;
        tracing::info!(kind = %self.kind, id = ?record.get(ID_FIELD), "Record created");
        Ok(record)
    }

    /// Apply the supplied fields of `draft` to record `id`.
    ///
    /// Unsupplied fields keep their stored values and the identity never
    /// changes. The stored `Name` is re-derived from the stored fields
    /// merged with the draft. Fails with [`CoreError::NotFound`] when `id`
    /// is absent.
    pub async fn update(&self, id: DbId, draft: &Record) -> Result<Record, CoreError> {
        let mut merged = self.fetch_stored(id).await?;

        let missing = missing_required(self.kind, draft, WriteMode::Update);
        if !missing.is_empty() {
            return Err(CoreError::Validation(missing));
        }

        let draft = self.touched(draft);
        let mut wire = to_wire(self.kind, &draft, WriteMode::Update)?;
        merged.extend(draft);
        if let Some(name) = wire_name(self.kind, &merged) {
            wire.insert(NAME_COLUMN.to_string(), Value::String(name));
        }
        wire.insert(ID_FIELD.to_string(), Value::from(id));
        let results = self
            .backend
            .replace(self.table(), vec![wire])
            .await
            .map_err(|e| self.failure("update", e))?;
        let record = self.first_written("update", results)?;
        tracing::info!(kind = %self.kind, id, "Record updated");
        Ok(record)
    }

    /// Permanently remove record `id`. No cascade to referencing records.
    pub async fn delete(&self, id: DbId) -> Result<DeleteAck, CoreError> {
        self.ensure_exists(id).await?;

        let outcome = self
            .backend
            .remove(self.table(), vec![id])
            .await
            .map_err(|e| self.failure("delete", e))?;
        if !outcome.success {
            return Err(self.failure("delete", BackendError::Rejected(outcome.message)));
        }
        tracing::info!(kind = %self.kind, id, "Record deleted");
        Ok(DeleteAck {
            success: true,
            message: format!("{} deleted successfully", self.kind.label()),
        })
    }

    /// Exact-match query on one display field, newest first.
    pub async fn list_where(
        &self,
        field: &str,
        value: impl Into<Value>,
        limit: i64,
    ) -> Result<Vec<Record>, CoreError> {
        let value = value.into();
        let column = self.kind.config().field(field).ok_or_else(|| {
            CoreError::Internal(format!("{} has no field {field}", self.kind.label()))
        })?;
        let condition = match &value {
            Value::String(text) => Condition::exact_or_blank(column, text),
            other => Condition::exact(column.wire, other.clone()),
        };
        let params = FetchParams::for_kind(self.kind)
            .with_condition(condition)
            .with_limit(limit);
        self.fetch_display("list_where", &params).await
    }

    /// Free-text query over the searchable fields, newest first.
    pub async fn search_text(&self, query: &str, limit: i64) -> Result<Vec<Record>, CoreError> {
        let filter = ListFilter {
            search: Some(query.to_string()),
            ..Default::default()
        };
        let params = self.list_params(&filter).with_limit(limit);
        let rows = self.fetch_display("search", &params).await?;
        Ok(build_list(self.kind, rows, &filter))
    }

    /// Distinct non-empty values of a display field, sorted ascending.
    pub async fn distinct_values(&self, field: &str) -> Result<Vec<String>, CoreError> {
        let values: BTreeSet<String> = self
            .fetch_all()
            .await?
            .iter()
            .filter_map(|r| r.get(field).and_then(Value::as_str))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        Ok(values.into_iter().collect())
    }

    /// Every record of this kind, read page by page.
    ///
    /// Stops at the first short page, or at a page that brings no unseen
    /// identity (a backend that ignores `offset` repeats its first page).
    pub async fn fetch_all(&self) -> Result<Vec<Record>, CoreError> {
        let mut all = Vec::new();
        let mut seen = HashSet::new();
        let mut offset = 0;
        loop {
            let params = FetchParams::for_kind(self.kind)
                .with_limit(MAX_PAGE_SIZE)
                .with_offset(offset);
            let page = self.fetch_display("fetch_all", &params).await?;
            let count = page.len() as i64;
            let before = all.len();
            for record in page {
                match record.get(ID_FIELD).and_then(Value::as_i64) {
                    Some(id) if !seen.insert(id) => {}
                    _ => all.push(record),
                }
            }
            if count < MAX_PAGE_SIZE {
                return Ok(all);
            }
            if all.len() == before {
                tracing::warn!(kind = %self.kind, offset, "Backend repeated a page, stopping");
                return Ok(all);
            }
            offset += count;
        }
    }

    async fn fetch_display(&self, action: &str, params: &FetchParams) -> Result<Vec<Record>, CoreError> {
        let rows = self
            .backend
            .fetch(self.table(), params)
            .await
            .map_err(|e| self.failure(action, e))?;
        Ok(rows.iter().map(|row| to_display(self.kind, row)).collect())
    }

    /// Display form of stored record `id`, or [`CoreError::NotFound`].
    async fn fetch_stored(&self, id: DbId) -> Result<Record, CoreError> {
        let fields = self.kind.config().wire_columns();
        let found = self
            .backend
            .fetch_one(self.table(), id, &fields)
            .await
            .map_err(|e| self.failure("lookup", e))?;
        match found {
            Some(row) => Ok(to_display(self.kind, &row)),
            None => Err(CoreError::NotFound {
                entity: self.kind.label(),
                id,
            }),
        }
    }

    async fn ensure_exists(&self, id: DbId) -> Result<(), CoreError> {
        let found = self
            .backend
            .fetch_one(self.table(), id, &[ID_FIELD.to_string()])
            .await
            .map_err(|e| self.failure("lookup", e))?;
        match found {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                entity: self.kind.label(),
                id,
            }),
        }
    }

    /// Copy of `draft` with the kind's touch field stamped, if it has one.
    fn touched(&self, draft: &Record) -> Record {
        let mut draft = draft.clone();
        if let Some(field) = self.kind.config().touch {
            draft.insert(
                field.to_string(),
                Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        draft
    }

    fn first_written(&self, action: &str, results: Vec<WriteResult>) -> Result<Record, CoreError> {
        match results.into_iter().next() {
            Some(WriteResult {
                success: true,
                data: Some(data),
                ..
            }) => Ok(to_display(self.kind, &data)),
            Some(WriteResult { message, .. }) => {
                let message =
                    message.unwrap_or_else(|| format!("Failed to {action} {}", self.kind.label()));
                Err(self.failure(action, BackendError::Rejected(message)))
            }
            None => Err(self.failure(
                action,
                BackendError::Decode(format!("{action} returned no results")),
            )),
        }
    }
}
