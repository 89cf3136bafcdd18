//! Validation rule tables.

use crate::entity::EntityKind;

/// Contact pipeline states.
pub const CONTACT_STATUSES: &[&str] = &["lead", "prospect", "customer", "inactive"];

/// Deal pipeline stages.
pub const DEAL_STAGES: &[&str] = &["lead", "qualified", "proposal", "negotiation", "won", "lost"];

/// Activity types.
pub const ACTIVITY_TYPES: &[&str] = &["call", "email", "meeting", "note", "task"];

/// What a rule checks. Every rule except `Required` passes on an empty value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind {
    /// Non-empty after trimming.
    Required,
    /// `local@domain.tld` shape.
    Email,
    /// Starts with `http://` or `https://`.
    Url,
    /// One of a fixed set of values.
    OneOf(&'static [&'static str]),
    /// Whole number within an inclusive range.
    IntRange { min: i64, max: i64 },
    /// Number greater than or equal to zero.
    NonNegative,
}

/// A single field rule with the message shown when it fails.
#[derive(Debug, Clone, Copy)]
pub struct FormRule {
    pub field: &'static str,
    pub kind: RuleKind,
    pub message: &'static str,
}

const fn rule(field: &'static str, kind: RuleKind, message: &'static str) -> FormRule {
    FormRule {
        field,
        kind,
        message,
    }
}

static COMPANY_RULES: &[FormRule] = &[
    rule("Name", RuleKind::Required, "Company name is required"),
    rule("Industry", RuleKind::Required, "Industry is required"),
    rule("Email", RuleKind::Email, "Invalid email format"),
    rule("Website", RuleKind::Url, "Website must start with http:// or https://"),
    rule("EmployeeCount", RuleKind::NonNegative, "Employee count cannot be negative"),
    rule("AnnualRevenue", RuleKind::NonNegative, "Annual revenue cannot be negative"),
];

static CONTACT_RULES: &[FormRule] = &[
    rule("firstName", RuleKind::Required, "First name is required"),
    rule("lastName", RuleKind::Required, "Last name is required"),
    rule("email", RuleKind::Required, "Email is required"),
    rule("email", RuleKind::Email, "Invalid email format"),
    rule("status", RuleKind::OneOf(CONTACT_STATUSES), "Unknown contact status"),
];

static DEAL_RULES: &[FormRule] = &[
    rule("title", RuleKind::Required, "Deal title is required"),
    rule("contactId", RuleKind::Required, "Contact is required"),
    rule("value", RuleKind::NonNegative, "Deal value cannot be negative"),
    rule(
        "probability",
        RuleKind::IntRange { min: 0, max: 100 },
        "Probability must be between 0 and 100",
    ),
    rule("stage", RuleKind::OneOf(DEAL_STAGES), "Unknown deal stage"),
];

static ACTIVITY_RULES: &[FormRule] = &[
    rule("contactId", RuleKind::Required, "Contact is required"),
    rule("description", RuleKind::Required, "Description is required"),
    rule("type", RuleKind::OneOf(ACTIVITY_TYPES), "Unknown activity type"),
];

/// Rules evaluated for drafts of `kind`, in evaluation order.
pub fn rules_for(kind: EntityKind) -> &'static [FormRule] {
    match kind {
        EntityKind::Company => COMPANY_RULES,
        EntityKind::Contact => CONTACT_RULES,
        EntityKind::Deal => DEAL_RULES,
        EntityKind::Activity => ACTIVITY_RULES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rules_match_kind_config() {
        for kind in EntityKind::ALL {
            let mut from_rules: Vec<&str> = rules_for(kind)
                .iter()
                .filter(|r| r.kind == RuleKind::Required)
                .map(|r| r.field)
                .collect();
            let mut from_config = kind.config().required.to_vec();
            from_rules.sort_unstable();
            from_config.sort_unstable();
            assert_eq!(from_rules, from_config, "{kind}");
        }
    }

    #[test]
    fn every_rule_targets_a_known_field() {
        for kind in EntityKind::ALL {
            for r in rules_for(kind) {
                assert!(kind.config().field(r.field).is_some(), "{kind}: {}", r.field);
            }
        }
    }

    #[test]
    fn enumeration_defaults_are_allowed_values() {
        assert!(CONTACT_STATUSES.contains(&"lead"));
        assert!(DEAL_STAGES.contains(&"lead"));
        assert!(ACTIVITY_TYPES.contains(&"call"));
    }
}
