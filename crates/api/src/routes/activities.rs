use axum::routing::get;
use axum::Router;
use crm_core::models::Activity;

use super::entity::crud_routes;
use crate::handlers::activities;
use crate::state::AppState;

/// Routes mounted at `/activities`.
///
/// ```text
/// (generic CRUD routes)
/// GET    /by-contact/{contact_id}  -> by_contact
/// ```
pub fn router() -> Router<AppState> {
    crud_routes::<Activity>().route("/by-contact/{contact_id}", get(activities::by_contact))
}
