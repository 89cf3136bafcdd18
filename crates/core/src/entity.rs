//! Entity-kind configuration.
//!
//! Per-kind behaviour (field list, wire names, defaults, searchable fields,
//! category field) is expressed as static data so the mapper, list builder,
//! validator and repository can all stay generic over [`EntityKind`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire and display key of the identity column.
pub const ID_FIELD: &str = "Id";

/// Wire column every record carries as its human-readable label.
pub const NAME_COLUMN: &str = "Name";

/// Wire column holding the server-assigned creation timestamp.
pub const CREATED_ON_COLUMN: &str = "CreatedOn";

/// Wire column holding the server-assigned modification timestamp.
pub const MODIFIED_ON_COLUMN: &str = "ModifiedOn";

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// The four kinds of record the CRM manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Contact,
    Deal,
    Activity,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Company,
        EntityKind::Contact,
        EntityKind::Deal,
        EntityKind::Activity,
    ];

    /// Static configuration for this kind.
    pub fn config(self) -> &'static KindConfig {
        match self {
            EntityKind::Company => &COMPANY,
            EntityKind::Contact => &CONTACT,
            EntityKind::Deal => &DEAL,
            EntityKind::Activity => &ACTIVITY,
        }
    }

    /// Singular label used in error messages ("Company").
    pub fn label(self) -> &'static str {
        self.config().label
    }

    /// Backend table name.
    pub fn table(self) -> &'static str {
        self.config().table
    }

    /// Plural path segment used by the HTTP surface ("companies").
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Company => "companies",
            EntityKind::Contact => "contacts",
            EntityKind::Deal => "deals",
            EntityKind::Activity => "activities",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts the singular, plural or table form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| {
                let cfg = kind.config();
                lower == cfg.label.to_ascii_lowercase()
                    || lower == kind.plural()
                    || lower == cfg.table
            })
            .ok_or_else(|| format!("Unknown entity kind: {s}"))
    }
}

/// How a field's value is typed on the wire and in display records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    /// Weak reference to another record's identity. Never implies ownership.
    Reference { required: bool },
    /// ISO-8601 timestamp or date string.
    Timestamp,
}

/// Value supplied when a wire record lacks a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Empty string.
    Empty,
    /// Numeric zero.
    Zero,
    /// A fixed text value, e.g. an enumeration's initial state.
    Text(&'static str),
    /// JSON `null`.
    Null,
    /// The display value of another field of the same record.
    Field(&'static str),
    /// Stamped with the current time when a record is created without a
    /// value. Reads of a row that never got one show `null`.
    Now,
}

/// One column of an entity kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub display: &'static str,
    pub wire: &'static str,
    pub ty: FieldType,
    pub default: FieldDefault,
    /// Server-assigned columns are read-only and never written back.
    pub writable: bool,
}

impl FieldSpec {
    const fn text(display: &'static str, wire: &'static str) -> Self {
        Self {
            display,
            wire,
            ty: FieldType::Text,
            default: FieldDefault::Empty,
            writable: true,
        }
    }

    const fn enumeration(display: &'static str, wire: &'static str, initial: &'static str) -> Self {
        Self {
            display,
            wire,
            ty: FieldType::Text,
            default: FieldDefault::Text(initial),
            writable: true,
        }
    }

    const fn integer(display: &'static str, wire: &'static str) -> Self {
        Self {
            display,
            wire,
            ty: FieldType::Integer,
            default: FieldDefault::Zero,
            writable: true,
        }
    }

    const fn decimal(display: &'static str, wire: &'static str) -> Self {
        Self {
            display,
            wire,
            ty: FieldType::Decimal,
            default: FieldDefault::Zero,
            writable: true,
        }
    }

    const fn reference(display: &'static str, wire: &'static str, required: bool) -> Self {
        Self {
            display,
            wire,
            ty: FieldType::Reference { required },
            default: FieldDefault::Null,
            writable: true,
        }
    }

    const fn timestamp(display: &'static str, wire: &'static str, default: FieldDefault) -> Self {
        Self {
            display,
            wire,
            ty: FieldType::Timestamp,
            default,
            writable: true,
        }
    }

    const fn created_on() -> Self {
        Self {
            display: "createdAt",
            wire: CREATED_ON_COLUMN,
            ty: FieldType::Timestamp,
            default: FieldDefault::Null,
            writable: false,
        }
    }

    /// Fixed text a blank stored value displays as, if any.
    pub fn default_text(&self) -> Option<&'static str> {
        match self.default {
            FieldDefault::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether values of this field sort numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.ty,
            FieldType::Integer | FieldType::Decimal | FieldType::Reference { .. }
        )
    }
}

/// How the wire `Name` column is derived from display fields on write.
#[derive(Debug, Clone, Copy)]
pub enum NameRule {
    /// Copy one field verbatim.
    Field(&'static str),
    /// Join several fields with a space and trim the result.
    Joined(&'static [&'static str]),
    /// `"{prefix} - {body}"` with the body cut to `max_chars` characters.
    Summary {
        prefix: &'static str,
        body: &'static str,
        max_chars: usize,
    },
}

/// Static description of one entity kind.
#[derive(Debug)]
pub struct KindConfig {
    pub kind: EntityKind,
    pub label: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    /// Display fields that must be non-empty after trimming.
    pub required: &'static [&'static str],
    /// Display fields matched by free-text search.
    pub searchable: &'static [&'static str],
    /// Display field used for the category filter.
    pub category: &'static str,
    pub name_rule: NameRule,
    /// Display field stamped with the current time on every write.
    pub touch: Option<&'static str>,
}

impl KindConfig {
    /// Look up a field by its display name.
    pub fn field(&self, display: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.display == display)
    }

    /// Every wire column requested on fetch, identity first.
    pub fn wire_columns(&self) -> Vec<String> {
        let mut columns = vec![ID_FIELD.to_string(), NAME_COLUMN.to_string()];
        for field in self.fields {
            if !columns.iter().any(|c| c == field.wire) {
                columns.push(field.wire.to_string());
            }
        }
        columns
    }

    /// Wire names of the searchable fields.
    pub fn searchable_wire(&self) -> Vec<&'static str> {
        self.searchable
            .iter()
            .filter_map(|name| self.field(name).map(|f| f.wire))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Kind tables
// ---------------------------------------------------------------------------

static COMPANY: KindConfig = KindConfig {
    kind: EntityKind::Company,
    label: "Company",
    table: "company_c",
    fields: &[
        FieldSpec::text("Name", NAME_COLUMN),
        FieldSpec::text("Industry", "industry_c"),
        FieldSpec::text("Website", "website_c"),
        FieldSpec::text("Phone", "phone_c"),
        FieldSpec::text("Email", "email_c"),
        FieldSpec::text("Address", "address_c"),
        FieldSpec::text("City", "city_c"),
        FieldSpec::text("State", "state_c"),
        FieldSpec::text("Country", "country_c"),
        FieldSpec::text("PostalCode", "postal_code_c"),
        FieldSpec::integer("EmployeeCount", "employee_count_c"),
        FieldSpec::decimal("AnnualRevenue", "annual_revenue_c"),
        FieldSpec::text("Founded", "founded_c"),
        FieldSpec::text("Description", "description_c"),
        FieldSpec::created_on(),
    ],
    required: &["Name", "Industry"],
    searchable: &["Name", "Industry", "City", "Email"],
    category: "Industry",
    name_rule: NameRule::Field("Name"),
    touch: None,
};

static CONTACT: KindConfig = KindConfig {
    kind: EntityKind::Contact,
    label: "Contact",
    table: "contact_c",
    fields: &[
        FieldSpec::text("firstName", "first_name_c"),
        FieldSpec::text("lastName", "last_name_c"),
        FieldSpec::text("email", "email_c"),
        FieldSpec::text("phone", "phone_c"),
        FieldSpec::text("company", "company_c"),
        FieldSpec::enumeration("status", "status_c", "lead"),
        FieldSpec::timestamp("lastActivity", "last_activity_c", FieldDefault::Field("createdAt")),
        FieldSpec::created_on(),
    ],
    required: &["firstName", "lastName", "email"],
    searchable: &["firstName", "lastName", "email", "company"],
    category: "status",
    name_rule: NameRule::Joined(&["firstName", "lastName"]),
    touch: Some("lastActivity"),
};

static DEAL: KindConfig = KindConfig {
    kind: EntityKind::Deal,
    label: "Deal",
    table: "deal_c",
    fields: &[
        FieldSpec::text("title", "title_c"),
        FieldSpec::reference("contactId", "contact_id_c", true),
        FieldSpec::decimal("value", "value_c"),
        FieldSpec::enumeration("stage", "stage_c", "lead"),
        FieldSpec::integer("probability", "probability_c"),
        FieldSpec::timestamp("expectedCloseDate", "expected_close_date_c", FieldDefault::Now),
        FieldSpec::created_on(),
    ],
    required: &["title", "contactId"],
    searchable: &["title"],
    category: "stage",
    name_rule: NameRule::Field("title"),
    touch: None,
};

static ACTIVITY: KindConfig = KindConfig {
    kind: EntityKind::Activity,
    label: "Activity",
    table: "activity_c",
    fields: &[
        FieldSpec::reference("contactId", "contact_id_c", true),
        FieldSpec::reference("dealId", "deal_id_c", false),
        FieldSpec::enumeration("type", "type_c", "call"),
        FieldSpec::text("description", "description_c"),
        FieldSpec::created_on(),
    ],
    required: &["contactId", "description"],
    searchable: &["description", "type"],
    category: "type",
    name_rule: NameRule::Summary {
        prefix: "type",
        body: "description",
        max_chars: 50,
    },
    touch: None,
};
