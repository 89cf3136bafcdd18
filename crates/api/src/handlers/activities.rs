use axum::extract::{Path, State};
use axum::Json;
use crm_core::types::{DbId, Record};

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/activities/by-contact/{contact_id}
pub async fn by_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<DbId>,
) -> Json<DataResponse<Vec<Record>>> {
    let activities = state.repos.activities.by_contact(contact_id).await;
    Json(DataResponse { data: activities })
}
