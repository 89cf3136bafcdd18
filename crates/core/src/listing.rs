//! List view-model builder.
//!
//! Derives the rows a list page renders from a batch of display records:
//! free-text search, category restriction, then a stable sort. Pure
//! function of its inputs.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{EntityKind, ALL_CATEGORIES, ID_FIELD};
use crate::types::Record;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Options controlling a list request. Unset options are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    /// Case-insensitive substring matched against the kind's searchable fields.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact value of the kind's category field. `"all"` disables it.
    #[serde(default, alias = "industry", alias = "stage", alias = "status", alias = "type")]
    pub category: Option<String>,
    /// Display field to sort by.
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl ListFilter {
    /// Lower-cased search term, or `None` when search is unset or empty.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Active category, or `None` when unset, empty, or the `"all"` sentinel.
    pub fn active_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Sort field, or `None` when unset or not a field of `kind`.
    pub fn sort_field(&self, kind: EntityKind) -> Option<&str> {
        self.sort_by
            .as_deref()
            .filter(|f| *f == ID_FIELD || kind.config().field(f).is_some())
    }
}

/// Apply search, category and sort to `records`.
///
/// An unknown `sort_by` leaves the order untouched. The sort is stable, so
/// records with equal keys keep their incoming relative order in either
/// direction.
pub fn build_list(kind: EntityKind, records: Vec<Record>, filter: &ListFilter) -> Vec<Record> {
    let cfg = kind.config();
    let term = filter.search_term();
    let category = filter.active_category();

    let mut rows: Vec<Record> = records
        .into_iter()
        .filter(|r| match &term {
            Some(term) => cfg
                .searchable
                .iter()
                .any(|field| field_text(r, field).to_lowercase().contains(term.as_str())),
            None => true,
        })
        .filter(|r| match category {
            Some(category) => r.get(cfg.category).and_then(Value::as_str) == Some(category),
            None => true,
        })
        .collect();

    if let Some(field) = filter.sort_field(kind) {
        let numeric = field == ID_FIELD || cfg.field(field).is_some_and(|f| f.is_numeric());
        rows.sort_by(|a, b| {
            let ord = compare_field(a.get(field), b.get(field), numeric);
            match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    rows
}

/// Text rendering of a field used for search matching.
pub fn field_text(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn compare_field(a: Option<&Value>, b: Option<&Value>, numeric: bool) -> Ordering {
    let both_numbers = matches!((a, b), (Some(Value::Number(_)), Some(Value::Number(_))));
    if numeric || both_numbers {
        let x = a.and_then(Value::as_f64).unwrap_or(f64::NEG_INFINITY);
        let y = b.and_then(Value::as_f64).unwrap_or(f64::NEG_INFINITY);
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    let x = a.map(value_text).unwrap_or_default();
    let y = b.map(value_text).unwrap_or_default();
    locale_compare(&x, &y)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Collation-style string ordering: case-folded comparison first, exact
/// comparison only to break ties between strings that differ in case.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
