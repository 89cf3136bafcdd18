//! Request handlers.
//!
//! [`entity`] holds the CRUD handlers shared by every kind, generic over the
//! typed record marker; the per-kind modules hold the extra lookups.

pub mod activities;
pub mod companies;
pub mod contacts;
pub mod deals;
pub mod entity;
