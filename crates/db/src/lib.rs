//! Record storage for the CRM.
//!
//! - [`backend`]: the [`RecordBackend`](backend::RecordBackend) seam.
//! - [`memory`] and [`http`]: its two implementations.
//! - [`repositories`]: per-kind CRUD on top of a shared backend.
//! - [`seed`]: loading seed documents into the memory backend.

pub mod backend;
pub mod http;
pub mod memory;
pub mod repositories;
pub mod seed;

use std::sync::Arc;

pub use backend::{BackendError, RecordBackend};
pub use repositories::Repositories;

/// Backend handle shared by every repository.
pub type SharedBackend = Arc<dyn RecordBackend>;
