//! Typed views of display records.
//!
//! Repositories traffic in [`Record`]s so per-kind behaviour stays data
//! driven; callers that want a strongly typed value convert through
//! [`Entity::from_record`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::EntityKind;
use crate::error::CoreError;
use crate::types::{DbId, Record};

/// A typed display record of one entity kind.
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> DbId;

    /// Decode a display record produced by the field mapper.
    fn from_record(record: Record) -> Result<Self, CoreError> {
        serde_json::from_value(Value::Object(record)).map_err(|e| {
            CoreError::Internal(format!("Malformed {} record: {e}", Self::KIND.label()))
        })
    }

    /// Encode back to a display record, e.g. to use as an update draft.
    fn to_record(&self) -> Result<Record, CoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Internal(format!(
                "{} did not serialize to an object",
                Self::KIND.label()
            ))),
            Err(e) => Err(CoreError::Internal(e.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub industry: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub employee_count: i64,
    pub annual_revenue: f64,
    pub founded: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl Entity for Company {
    const KIND: EntityKind = EntityKind::Company;

    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Lead,
    Prospect,
    Customer,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "Id")]
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: ContactStatus,
    pub last_activity: Option<String>,
    pub created_at: Option<String>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Entity for Contact {
    const KIND: EntityKind = EntityKind::Contact;

    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    #[serde(rename = "Id")]
    pub id: DbId,
    pub title: String,
    /// Weak reference to a [`Contact`].
    pub contact_id: Option<DbId>,
    pub value: f64,
    pub stage: DealStage,
    pub probability: i64,
    /// `None` only for rows written without going through the mapper.
    pub expected_close_date: Option<String>,
    pub created_at: Option<String>,
}

impl Entity for Deal {
    const KIND: EntityKind = EntityKind::Deal;

    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    Note,
    Task,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "Id")]
    pub id: DbId,
    /// Weak reference to a [`Contact`].
    pub contact_id: Option<DbId>,
    /// Optional weak reference to a [`Deal`].
    pub deal_id: Option<DbId>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub description: String,
    pub created_at: Option<String>,
}

impl Entity for Activity {
    const KIND: EntityKind = EntityKind::Activity;

    fn id(&self) -> DbId {
        self.id
    }
}
