use axum::extract::{Path, State};
use axum::Json;
use crm_core::types::Record;
use crm_core::validation::rules::DEAL_STAGES;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/deals/by-stage/{stage}
///
/// Unknown stages are rejected with 400 rather than answered with an
/// empty list.
pub async fn by_stage(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Record>>>> {
    if !DEAL_STAGES.contains(&stage.as_str()) {
        return Err(AppError::BadRequest(format!("Unknown deal stage: {stage}")));
    }
    let deals = state.repos.deals.by_stage(&stage).await;
    Ok(Json(DataResponse { data: deals }))
}
