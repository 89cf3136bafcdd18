//! List-page orchestration.
//!
//! [`ListController`] owns the state of one entity list page (rows, filter,
//! sort, category options, form draft) and drives the repository on user
//! actions. Reloads are tagged by [`RequestSequence`] so that only the
//! newest response is applied.

pub mod controller;
pub mod sequence;

pub use controller::{
    ActionOutcome, ListController, Notice, NoticeLevel, PageState, ReloadOutcome, SubmitOutcome,
};
pub use sequence::RequestSequence;
