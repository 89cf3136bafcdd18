//! Shared query parameter types for API handlers.
//!
//! List endpoints deserialize [`ListFilter`](crm_core::listing::ListFilter)
//! directly (`?search=&category=&sortBy=&sortOrder=`); the lookup
//! endpoints use the structs below.

use serde::Deserialize;

/// Free-text lookup parameters (`?q=`).
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}
