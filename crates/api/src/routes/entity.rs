//! CRUD routes shared by every entity kind.

use axum::routing::{get, post};
use axum::Router;
use crm_core::models::Entity;

use crate::handlers::entity;
use crate::state::AppState;

/// Generic CRUD routes for kind `E`.
///
/// ```text
/// GET    /            -> list (?search=&category=&sortBy=&sortOrder=)
/// POST   /            -> create
/// POST   /validate    -> validate_draft
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn crud_routes<E: Entity + Send + Sync + 'static>() -> Router<AppState> {
    Router::new()
        .route("/", get(entity::list::<E>).post(entity::create::<E>))
        .route("/validate", post(entity::validate_draft::<E>))
        .route(
            "/{id}",
            get(entity::get_by_id::<E>)
                .put(entity::update::<E>)
                .delete(entity::delete::<E>),
        )
}
