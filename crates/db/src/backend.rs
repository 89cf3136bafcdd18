//! The record backend seam.
//!
//! Repositories never talk to storage directly; they go through
//! [`RecordBackend`], which speaks in wire records keyed by table name.
//! [`MemoryBackend`](crate::memory::MemoryBackend) and
//! [`HttpBackend`](crate::http::HttpBackend) implement it.

use async_trait::async_trait;
use crm_core::entity::{EntityKind, FieldSpec, CREATED_ON_COLUMN};
use crm_core::error::CoreError;
use crm_core::search::DEFAULT_PAGE_SIZE;
use crm_core::types::{DbId, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure reported by a record backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend processed the request and refused it.
    #[error("{0}")]
    Rejected(String),

    /// The request never produced a usable response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<BackendError> for CoreError {
    fn from(err: BackendError) -> Self {
        CoreError::Backend(err.to_string())
    }
}

/// Condition operators understood by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Field equals one of the values.
    ExactMatch,
    /// Field contains one of the values, case-insensitively.
    Contains,
}

/// A single field condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field_name: String,
    pub operator: Operator,
    pub values: Vec<Value>,
}

impl Condition {
    pub fn exact(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field_name: field.to_string(),
            operator: Operator::ExactMatch,
            values: vec![value.into()],
        }
    }

    /// Exact match on `value`, or on a blank stored value when `value` is
    /// what a blank displays as.
    pub fn exact_or_blank(field: &FieldSpec, value: &str) -> Self {
        let mut condition = Self::exact(field.wire, value);
        if field.default_text() == Some(value) {
            condition.values.push(Value::String(String::new()));
        }
        condition
    }

    pub fn contains(field: &str, needle: &str) -> Self {
        Self {
            field_name: field.to_string(),
            operator: Operator::Contains,
            values: vec![Value::String(needle.to_string())],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field_name: String,
    pub sorttype: SortType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PagingInfo {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Parameters of a `fetch` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    /// Wire columns to return. Empty means every column.
    pub fields: Vec<String>,
    /// Every condition must hold.
    #[serde(default, rename = "where")]
    pub conditions: Vec<Condition>,
    /// When non-empty, at least one of these must hold.
    #[serde(default)]
    pub any_of: Vec<Condition>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub paging_info: PagingInfo,
}

impl FetchParams {
    /// All columns of `kind`, newest first, one default-sized page.
    pub fn for_kind(kind: EntityKind) -> Self {
        Self {
            fields: kind.config().wire_columns(),
            conditions: Vec::new(),
            any_of: Vec::new(),
            order_by: vec![OrderBy {
                field_name: CREATED_ON_COLUMN.to_string(),
                sorttype: SortType::Desc,
            }],
            paging_info: PagingInfo::default(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_any_of(mut self, conditions: Vec<Condition>) -> Self {
        self.any_of = conditions;
        self
    }

    /// Replace the ordering with a single column.
    pub fn ordered_by(mut self, field: &str, sorttype: SortType) -> Self {
        self.order_by = vec![OrderBy {
            field_name: field.to_string(),
            sorttype,
        }];
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.paging_info.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.paging_info.offset = offset;
        self
    }
}

/// Per-record outcome of an insert or replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WriteResult {
    pub fn ok(data: Record) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Outcome of a remove call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOutcome {
    pub success: bool,
    pub message: String,
}

/// Storage capability consumed by the repositories.
///
/// Implementations assign identities on insert (strictly increasing per
/// table, never reused) and stamp `CreatedOn`/`ModifiedOn`.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    async fn fetch(&self, table: &str, params: &FetchParams) -> Result<Vec<Record>, BackendError>;

    async fn fetch_one(
        &self,
        table: &str,
        id: DbId,
        fields: &[String],
    ) -> Result<Option<Record>, BackendError>;

    async fn insert(&self, table: &str, records: Vec<Record>)
        -> Result<Vec<WriteResult>, BackendError>;

    /// Merge each fragment (which must carry `Id`) into the stored record.
    async fn replace(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<Vec<WriteResult>, BackendError>;

    async fn remove(&self, table: &str, ids: Vec<DbId>) -> Result<RemoveOutcome, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_params_order_newest_first() {
        let params = FetchParams::for_kind(EntityKind::Deal);
        assert_eq!(params.order_by[0].field_name, "CreatedOn");
        assert_eq!(params.order_by[0].sorttype, SortType::Desc);
        assert_eq!(params.paging_info.limit, 100);
        assert!(params.fields.contains(&"stage_c".to_string()));
    }

    #[test]
    fn params_serialize_in_backend_shape() {
        let params = FetchParams::for_kind(EntityKind::Company)
            .with_condition(Condition::exact("industry_c", "Tech"))
            .with_limit(10);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value["where"][0],
            json!({"fieldName": "industry_c", "operator": "ExactMatch", "values": ["Tech"]})
        );
        assert_eq!(value["orderBy"][0]["sorttype"], json!("DESC"));
        assert_eq!(value["pagingInfo"], json!({"limit": 10, "offset": 0}));
    }

    #[test]
    fn exact_or_blank_widens_only_the_default_value() {
        let stage = EntityKind::Deal.config().field("stage").unwrap();
        assert_eq!(Condition::exact_or_blank(stage, "lead").values, vec![json!("lead"), json!("")]);
        assert_eq!(Condition::exact_or_blank(stage, "won").values, vec![json!("won")]);
    }

    #[test]
    fn backend_error_normalizes_to_core_error() {
        let err: CoreError = BackendError::Rejected("quota exceeded".into()).into();
        assert!(matches!(err, CoreError::Backend(msg) if msg == "quota exceeded"));
    }
}
