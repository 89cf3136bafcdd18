//! CRUD handlers shared by every entity kind.
//!
//! Each handler is generic over an [`Entity`] type, which only selects the
//! kind; request and response bodies are display records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crm_core::entity::EntityKind;
use crm_core::error::{CoreError, FieldErrors};
use crm_core::listing::ListFilter;
use crm_core::models::Entity;
use crm_core::types::{DbId, Record};
use crm_core::validation::{validate, validate_supplied};
use crm_db::repositories::DeleteAck;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, ValidationReport};
use crate::state::AppState;

fn reject_invalid(errors: FieldErrors) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(errors)))
    }
}

fn not_found(kind: EntityKind, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: kind.label(),
        id,
    })
}

/// GET /api/v1/{kind}
pub async fn list<E: Entity>(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<DataResponse<Vec<Record>>>> {
    let records = state.repos.repo(E::KIND).list(&filter).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/{kind}/{id}
pub async fn get_by_id<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Record>>> {
    let record = state
        .repos
        .repo(E::KIND)
        .get_by_id(id)
        .await
        .ok_or_else(|| not_found(E::KIND, id))?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/{kind}
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    Json(draft): Json<Record>,
) -> AppResult<(StatusCode, Json<DataResponse<Record>>)> {
    reject_invalid(validate(E::KIND, &draft))?;
    let record = state.repos.repo(E::KIND).create(&draft).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// PUT /api/v1/{kind}/{id}
///
/// Partial update: only the fields present in the body are validated and
/// written.
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(draft): Json<Record>,
) -> AppResult<Json<DataResponse<Record>>> {
    reject_invalid(validate_supplied(E::KIND, &draft))?;
    let record = state.repos.repo(E::KIND).update(id, &draft).await?;
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/{kind}/{id}
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeleteAck>>> {
    let ack = state.repos.repo(E::KIND).delete(id).await?;
    Ok(Json(DataResponse { data: ack }))
}

/// POST /api/v1/{kind}/validate
///
/// Dry run of the form rules; never writes.
pub async fn validate_draft<E: Entity>(Json(draft): Json<Record>) -> Json<DataResponse<ValidationReport>> {
    Json(DataResponse {
        data: validate(E::KIND, &draft).into(),
    })
}
