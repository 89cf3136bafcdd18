use axum::routing::get;
use axum::Router;
use crm_core::models::Contact;

use super::entity::crud_routes;
use crate::handlers::contacts;
use crate::state::AppState;

/// Routes mounted at `/contacts`.
///
/// ```text
/// (generic CRUD routes)
/// GET    /search?q=   -> search
/// ```
pub fn router() -> Router<AppState> {
    crud_routes::<Contact>().route("/search", get(contacts::search))
}
