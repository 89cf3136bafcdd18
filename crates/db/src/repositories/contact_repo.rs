//! Repository for the `contact_c` table.

use std::ops::Deref;
use std::sync::Arc;

use crm_core::entity::EntityKind;
use crm_core::search::LOOKUP_PAGE_SIZE;
use crm_core::types::Record;

use super::entity_repo::EntityRepo;
use crate::backend::RecordBackend;

#[derive(Clone)]
pub struct ContactRepo(EntityRepo);

impl ContactRepo {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self(EntityRepo::new(EntityKind::Contact, backend))
    }

    /// Contacts whose name, email or company contains `query`.
    ///
    /// Lookup helper for pickers; failures degrade to an empty list.
    pub async fn search(&self, query: &str) -> Vec<Record> {
        match self.search_text(query, LOOKUP_PAGE_SIZE).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(error = %err, "Contact search failed");
                Vec::new()
            }
        }
    }
}

impl Deref for ContactRepo {
    type Target = EntityRepo;

    fn deref(&self) -> &EntityRepo {
        &self.0
    }
}
