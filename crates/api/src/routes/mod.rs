pub mod activities;
pub mod companies;
pub mod contacts;
pub mod deals;
pub mod entity;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /companies    -> companies::router()
/// /contacts     -> contacts::router()
/// /deals        -> deals::router()
/// /activities   -> activities::router()
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/companies", companies::router())
        .nest("/contacts", contacts::router())
        .nest("/deals", deals::router())
        .nest("/activities", activities::router())
}
