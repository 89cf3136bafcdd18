use axum::routing::get;
use axum::Router;
use crm_core::models::Deal;

use super::entity::crud_routes;
use crate::handlers::deals;
use crate::state::AppState;

/// Routes mounted at `/deals`.
///
/// ```text
/// (generic CRUD routes)
/// GET    /by-stage/{stage}  -> by_stage
/// ```
pub fn router() -> Router<AppState> {
    crud_routes::<Deal>().route("/by-stage/{stage}", get(deals::by_stage))
}
