use std::collections::VecDeque;

use crm_core::entity::EntityKind;
use crm_core::error::FieldErrors;
use crm_core::listing::{ListFilter, SortOrder};
use crm_core::types::{DbId, Record};
use crm_core::validation::rules::{ACTIVITY_TYPES, CONTACT_STATUSES, DEAL_STAGES};
use crm_core::validation::validate;
use crm_db::repositories::EntityRepo;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use super::sequence::RequestSequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the presentation layer (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything a list page renders.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub records: Vec<Record>,
    pub loading: bool,
    /// Set when the last load failed; cleared by a successful load.
    pub error: Option<String>,
    pub filter: ListFilter,
    /// Options for the category dropdown.
    pub categories: Vec<String>,
    pub draft: Record,
    pub form_errors: FieldErrors,
    /// A write is in flight.
    pub busy: bool,
    /// Record being edited, `None` when the form creates.
    pub editing: Option<DbId>,
    #[serde(skip)]
    notices: VecDeque<Notice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied,
    /// A newer reload was issued while this one was in flight.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Record),
    Updated(Record),
    /// The draft failed validation; see [`PageState::form_errors`].
    Invalid,
    /// Another write is in flight.
    Busy,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Busy,
    Failed,
}

/// Controller for one entity list page.
///
/// Methods take `&self` so several actions can be in flight at once; the
/// page state sits behind a mutex that is never held across a repository
/// call.
pub struct ListController {
    repo: EntityRepo,
    state: Mutex<PageState>,
    sequence: RequestSequence,
}

impl ListController {
    pub fn new(repo: EntityRepo) -> Self {
        Self {
            repo,
            state: Mutex::new(PageState::default()),
            sequence: RequestSequence::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.repo.kind()
    }

    /// Copy of the current page state.
    pub async fn snapshot(&self) -> PageState {
        self.state.lock().await.clone()
    }

    /// Drain queued notices, oldest first.
    pub async fn take_notices(&self) -> Vec<Notice> {
        self.state.lock().await.notices.drain(..).collect()
    }

    // -----------------------------------------------------------------------
    // Filtering and sorting
    // -----------------------------------------------------------------------

    pub async fn set_search(&self, search: &str) -> ReloadOutcome {
        self.state.lock().await.filter.search = Some(search.to_string());
        self.reload().await
    }

    /// Restrict to one category value; `"all"` clears the restriction.
    pub async fn set_category(&self, category: &str) -> ReloadOutcome {
        self.state.lock().await.filter.category = Some(category.to_string());
        self.reload().await
    }

    /// Sort by `field`. Clicking the current sort field flips the order; a
    /// new field starts ascending.
    pub async fn toggle_sort(&self, field: &str) -> ReloadOutcome {
        {
            let mut state = self.state.lock().await;
            let filter = &mut state.filter;
            if filter.sort_by.as_deref() == Some(field) {
                filter.sort_order = filter.sort_order.flipped();
            } else {
                filter.sort_by = Some(field.to_string());
                filter.sort_order = SortOrder::Asc;
            }
        }
        self.reload().await
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Fetch the list for the current filter.
    ///
    /// The response is applied only if no newer reload started meanwhile.
    pub async fn reload(&self) -> ReloadOutcome {
        let tag = self.sequence.next();
        let filter = {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.filter.clone()
        };

        let result = self.repo.list(&filter).await;

        let mut state = self.state.lock().await;
        if !self.sequence.is_latest(tag) {
            tracing::debug!(kind = %self.kind(), tag, "Discarding stale list response");
            return ReloadOutcome::Stale;
        }
        state.loading = false;
        match result {
            Ok(records) => {
                state.records = records;
                state.error = None;
            }
            Err(err) => {
                tracing::error!(kind = %self.kind(), error = %err, "Failed to load list");
                state.error = Some(format!("Failed to load {}", self.kind().plural()));
            }
        }
        ReloadOutcome::Applied
    }

    /// Clear the error state and load again.
    pub async fn retry(&self) -> ReloadOutcome {
        self.state.lock().await.error = None;
        self.reload().await
    }

    /// Populate the category dropdown.
    ///
    /// Companies offer the industries in use; the other kinds offer their
    /// fixed enumeration. A failure is logged and leaves the options empty.
    pub async fn load_categories(&self) {
        let options = match self.kind() {
            EntityKind::Company => {
                let field = self.kind().config().category;
                self.repo.distinct_values(field).await.unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "Failed to load category options");
                    Vec::new()
                })
            }
            EntityKind::Contact => to_owned(CONTACT_STATUSES),
            EntityKind::Deal => to_owned(DEAL_STAGES),
            EntityKind::Activity => to_owned(ACTIVITY_TYPES),
        };
        self.state.lock().await.categories = options;
    }

    // -----------------------------------------------------------------------
    // Form
    // -----------------------------------------------------------------------

    pub async fn set_field(&self, field: &str, value: impl Into<Value>) {
        let mut state = self.state.lock().await;
        state.draft.insert(field.to_string(), value.into());
        state.form_errors.remove(field);
    }

    /// Load record `id` into the form for editing. Returns `false` when it
    /// could not be found.
    pub async fn edit(&self, id: DbId) -> bool {
        let Some(record) = self.repo.get_by_id(id).await else {
            return false;
        };
        let mut state = self.state.lock().await;
        state.draft = record;
        state.form_errors.clear();
        state.editing = Some(id);
        true
    }

    /// Empty the form and leave edit mode.
    pub async fn reset_form(&self) {
        let mut state = self.state.lock().await;
        state.draft.clear();
        state.form_errors.clear();
        state.editing = None;
    }

    /// Validate and write the draft.
    ///
    /// Only one write may be in flight. On success the form resets and the
    /// list reloads; on failure an error notice is queued and the list is
    /// left as it was.
    pub async fn submit(&self) -> SubmitOutcome {
        let (draft, editing) = {
            let mut state = self.state.lock().await;
            if state.busy {
                return SubmitOutcome::Busy;
            }
            let errors = validate(self.kind(), &state.draft);
            if !errors.is_empty() {
                state.form_errors = errors;
                return SubmitOutcome::Invalid;
            }
            state.busy = true;
            (state.draft.clone(), state.editing)
        };

        let label = self.kind().label();
        let result = match editing {
            Some(id) => self.repo.update(id, &draft).await.map(SubmitOutcome::Updated),
            None => self.repo.create(&draft).await.map(SubmitOutcome::Created),
        };

        {
            let mut state = self.state.lock().await;
            state.busy = false;
            match &result {
                Ok(outcome) => {
                    let verb = match outcome {
                        SubmitOutcome::Updated(_) => "updated",
                        _ => "created",
                    };
                    state.notices.push_back(Notice::success(format!("{label} {verb} successfully")));
                    state.draft.clear();
                    state.form_errors.clear();
                    state.editing = None;
                }
                Err(err) => {
                    tracing::error!(kind = %self.kind(), error = %err, "Failed to save record");
                    state.notices.push_back(Notice::error(format!(
                        "Failed to save {}: {err}",
                        label.to_lowercase()
                    )));
                }
            }
        }

        match result {
            Ok(outcome) => {
                self.reload().await;
                outcome
            }
            Err(_) => SubmitOutcome::Failed,
        }
    }

    /// Delete record `id`, under the same single-write rule as
    /// [`submit`](Self::submit).
    pub async fn delete(&self, id: DbId) -> ActionOutcome {
        {
            let mut state = self.state.lock().await;
            if state.busy {
                return ActionOutcome::Busy;
            }
            state.busy = true;
        }

        let result = self.repo.delete(id).await;

        {
            let mut state = self.state.lock().await;
            state.busy = false;
            match &result {
                Ok(ack) => state.notices.push_back(Notice::success(ack.message.clone())),
                Err(err) => {
                    tracing::error!(kind = %self.kind(), id, error = %err, "Failed to delete record");
                    state.notices.push_back(Notice::error(format!(
                        "Failed to delete {}: {err}",
                        self.kind().label().to_lowercase()
                    )));
                }
            }
        }

        match result {
            Ok(_) => {
                self.reload().await;
                ActionOutcome::Done
            }
            Err(_) => ActionOutcome::Failed,
        }
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
