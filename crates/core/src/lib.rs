//! CRM record core.
//!
//! Pure logic shared by the repository layer and the API: entity-kind
//! configuration, wire/display field mapping, list filtering and sorting,
//! and form validation. No I/O lives in this crate.

pub mod entity;
pub mod error;
pub mod listing;
pub mod mapper;
pub mod models;
pub mod search;
pub mod types;
pub mod validation;
