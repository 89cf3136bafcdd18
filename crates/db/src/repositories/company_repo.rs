//! Repository for the `company_c` table.

use std::ops::Deref;
use std::sync::Arc;

use crm_core::entity::EntityKind;
use crm_core::error::CoreError;
use crm_core::listing::field_text;
use serde::Serialize;
use serde_json::Value;

use super::entity_repo::EntityRepo;
use crate::backend::RecordBackend;

/// Aggregate figures over every stored company.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStats {
    pub total_companies: usize,
    pub total_revenue: f64,
    pub total_employees: i64,
    /// Number of distinct non-empty industries.
    pub industries: usize,
}

#[derive(Clone)]
pub struct CompanyRepo(EntityRepo);

impl CompanyRepo {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self(EntityRepo::new(EntityKind::Company, backend))
    }

    /// Distinct industries across all companies, sorted ascending.
    pub async fn industries(&self) -> Result<Vec<String>, CoreError> {
        self.distinct_values("Industry").await
    }

    pub async fn stats(&self) -> Result<CompanyStats, CoreError> {
        let companies = self.fetch_all().await?;
        let total_revenue = companies
            .iter()
            .filter_map(|c| c.get("AnnualRevenue").and_then(Value::as_f64))
            .sum();
        let total_employees = companies
            .iter()
            .filter_map(|c| c.get("EmployeeCount").and_then(Value::as_i64))
            .fold(0i64, i64::saturating_add);
        let mut industries: Vec<String> = companies
            .iter()
            .map(|c| field_text(c, "Industry"))
            .filter(|i| !i.is_empty())
            .collect();
        industries.sort();
        industries.dedup();

        Ok(CompanyStats {
            total_companies: companies.len(),
            total_revenue,
            total_employees,
            industries: industries.len(),
        })
    }
}

impl Deref for CompanyRepo {
    type Target = EntityRepo;

    fn deref(&self) -> &EntityRepo {
        &self.0
    }
}
