use axum::routing::get;
use axum::Router;
use crm_core::models::Company;

use super::entity::crud_routes;
use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// (generic CRUD routes)
/// GET    /industries  -> industries
/// GET    /stats       -> stats
/// ```
pub fn router() -> Router<AppState> {
    crud_routes::<Company>()
        .route("/industries", get(companies::industries))
        .route("/stats", get(companies::stats))
}
