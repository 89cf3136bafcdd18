use axum::extract::{Query, State};
use axum::Json;
use crm_core::types::Record;

use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/contacts/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<DataResponse<Vec<Record>>> {
    let contacts = state.repos.contacts.search(&params.q).await;
    Json(DataResponse { data: contacts })
}
