//! Repository layer.
//!
//! [`EntityRepo`] carries the CRUD operations shared by every kind; the
//! per-kind wrappers deref to it and add their own lookups. All of them
//! share one [`RecordBackend`](crate::backend::RecordBackend).

pub mod activity_repo;
pub mod company_repo;
pub mod contact_repo;
pub mod deal_repo;
pub mod entity_repo;

pub use activity_repo::ActivityRepo;
pub use company_repo::{CompanyRepo, CompanyStats};
pub use contact_repo::ContactRepo;
pub use deal_repo::DealRepo;
pub use entity_repo::{DeleteAck, EntityRepo};

use std::sync::Arc;

use crm_core::entity::EntityKind;

use crate::backend::RecordBackend;

/// One repository per entity kind over a shared backend.
#[derive(Clone)]
pub struct Repositories {
    pub companies: CompanyRepo,
    pub contacts: ContactRepo,
    pub deals: DealRepo,
    pub activities: ActivityRepo,
}

impl Repositories {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self {
            companies: CompanyRepo::new(Arc::clone(&backend)),
            contacts: ContactRepo::new(Arc::clone(&backend)),
            deals: DealRepo::new(Arc::clone(&backend)),
            activities: ActivityRepo::new(backend),
        }
    }

    /// The generic repository for `kind`.
    pub fn repo(&self, kind: EntityKind) -> &EntityRepo {
        match kind {
            EntityKind::Company => &self.companies,
            EntityKind::Contact => &self.contacts,
            EntityKind::Deal => &self.deals,
            EntityKind::Activity => &self.activities,
        }
    }
}
