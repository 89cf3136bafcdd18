//! Repository for the `deal_c` table.

use std::ops::Deref;
use std::sync::Arc;

use crm_core::entity::EntityKind;
use crm_core::search::DEFAULT_PAGE_SIZE;
use crm_core::types::Record;

use super::entity_repo::EntityRepo;
use crate::backend::RecordBackend;

#[derive(Clone)]
pub struct DealRepo(EntityRepo);

impl DealRepo {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self(EntityRepo::new(EntityKind::Deal, backend))
    }

    /// Deals in `stage`, newest first. Failures degrade to an empty list.
    pub async fn by_stage(&self, stage: &str) -> Vec<Record> {
        match self.list_where("stage", stage, DEFAULT_PAGE_SIZE).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(stage, error = %err, "Deal lookup by stage failed");
                Vec::new()
            }
        }
    }
}

impl Deref for DealRepo {
    type Target = EntityRepo;

    fn deref(&self) -> &EntityRepo {
        &self.0
    }
}
