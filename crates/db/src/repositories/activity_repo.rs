//! Repository for the `activity_c` table.

use std::ops::Deref;
use std::sync::Arc;

use crm_core::entity::EntityKind;
use crm_core::search::LOOKUP_PAGE_SIZE;
use crm_core::types::{DbId, Record};

use super::entity_repo::EntityRepo;
use crate::backend::RecordBackend;

#[derive(Clone)]
pub struct ActivityRepo(EntityRepo);

impl ActivityRepo {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self(EntityRepo::new(EntityKind::Activity, backend))
    }

    /// Activities logged against `contact_id`, newest first.
    ///
    /// Failures degrade to an empty list.
    pub async fn by_contact(&self, contact_id: DbId) -> Vec<Record> {
        match self.list_where("contactId", contact_id, LOOKUP_PAGE_SIZE).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(contact_id, error = %err, "Activity lookup by contact failed");
                Vec::new()
            }
        }
    }
}

impl Deref for ActivityRepo {
    type Target = EntityRepo;

    fn deref(&self) -> &EntityRepo {
        &self.0
    }
}
