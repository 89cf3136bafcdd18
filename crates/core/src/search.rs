//! Paging constants shared by the repository layer.

/// Fixed page size for list queries.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Page size for free-text contact search and per-contact activity lookups.
pub const LOOKUP_PAGE_SIZE: i64 = 50;

/// Upper bound for any caller-supplied limit.
pub const MAX_PAGE_SIZE: i64 = 100;
