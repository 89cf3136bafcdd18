//! Form validation.
//!
//! Rule tables per entity kind plus a pure evaluator that turns a draft into
//! a field -> message map. An empty map means the draft may be submitted.

pub mod evaluator;
pub mod rules;

pub use evaluator::{missing_required, validate, validate_supplied};
pub use rules::{rules_for, FormRule, RuleKind};
