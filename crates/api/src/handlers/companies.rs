//! Company-specific handlers.

use axum::extract::State;
use axum::Json;
use crm_db::repositories::CompanyStats;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/companies/industries
pub async fn industries(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let industries = state.repos.companies.industries().await?;
    Ok(Json(DataResponse { data: industries }))
}

/// GET /api/v1/companies/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DataResponse<CompanyStats>>> {
    let stats = state.repos.companies.stats().await?;
    Ok(Json(DataResponse { data: stats }))
}
