//! Rule evaluator. Pure logic, no backend access.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::rules::{rules_for, FormRule, RuleKind};
use crate::entity::EntityKind;
use crate::error::FieldErrors;
use crate::mapper::WriteMode;
use crate::types::Record;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://.+").expect("valid regex"));

/// Validate a complete draft of `kind`.
///
/// Returns one message per failing field; the first failing rule for a
/// field wins, so "required" is reported before a format problem.
pub fn validate(kind: EntityKind, draft: &Record) -> FieldErrors {
    evaluate(rules_for(kind), draft, |_| true)
}

/// Validate only the fields present in a partial draft.
pub fn validate_supplied(kind: EntityKind, draft: &Record) -> FieldErrors {
    evaluate(rules_for(kind), draft, |field| draft.contains_key(field))
}

/// Required-field check applied by the repository before any write.
///
/// On create every required field must be non-empty; on update only the
/// required fields the caller supplied are checked.
pub fn missing_required(kind: EntityKind, draft: &Record, mode: WriteMode) -> FieldErrors {
    let required: Vec<&FormRule> = rules_for(kind)
        .iter()
        .filter(|r| r.kind == RuleKind::Required)
        .collect();
    let mut errors = FieldErrors::new();
    for rule in required {
        if mode == WriteMode::Update && !draft.contains_key(rule.field) {
            continue;
        }
        if violates(rule, draft.get(rule.field)) {
            errors
                .entry(rule.field.to_string())
                .or_insert_with(|| rule.message.to_string());
        }
    }
    errors
}

fn evaluate(rules: &[FormRule], draft: &Record, applies: impl Fn(&str) -> bool) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for rule in rules.iter().filter(|r| applies(r.field)) {
        if errors.contains_key(rule.field) {
            continue;
        }
        if violates(rule, draft.get(rule.field)) {
            errors.insert(rule.field.to_string(), rule.message.to_string());
        }
    }
    errors
}

fn violates(rule: &FormRule, value: Option<&Value>) -> bool {
    let text = value.map(as_text).unwrap_or_default();
    let text = text.trim();

    match rule.kind {
        RuleKind::Required => text.is_empty(),
        // Optional fields: empty is always acceptable.
        _ if text.is_empty() => false,
        RuleKind::Email => !EMAIL_RE.is_match(text),
        RuleKind::Url => !URL_RE.is_match(text),
        RuleKind::OneOf(allowed) => !allowed.contains(&text),
        RuleKind::IntRange { min, max } => match text.parse::<i64>() {
            Ok(n) => n < min || n > max,
            Err(_) => true,
        },
        RuleKind::NonNegative => match text.parse::<f64>() {
            Ok(n) => !n.is_finite() || n < 0.0,
            Err(_) => true,
        },
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn company_draft_with_blank_name_and_bad_email() {
        let errors = validate(
            EntityKind::Company,
            &draft(json!({"Name": "", "Industry": "Tech", "Email": "bad"})),
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["Name"], "Company name is required");
        assert_eq!(errors["Email"], "Invalid email format");
        assert!(!errors.contains_key("Industry"));
    }

    #[test]
    fn whitespace_only_required_field_fails() {
        let errors = validate(
            EntityKind::Company,
            &draft(json!({"Name": "   ", "Industry": "Tech"})),
        );
        assert_eq!(errors["Name"], "Company name is required");
    }

    #[test]
    fn optional_empty_fields_pass() {
        let errors = validate(
            EntityKind::Company,
            &draft(json!({"Name": "Acme", "Industry": "Tech", "Email": "", "Website": ""})),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn website_requires_scheme() {
        let bad = validate(
            EntityKind::Company,
            &draft(json!({"Name": "Acme", "Industry": "Tech", "Website": "acme.com"})),
        );
        assert_eq!(bad["Website"], "Website must start with http:// or https://");

        let good = validate(
            EntityKind::Company,
            &draft(json!({"Name": "Acme", "Industry": "Tech", "Website": "https://acme.com"})),
        );
        assert!(good.is_empty());
    }

    #[test]
    fn required_reported_before_format() {
        let errors = validate(
            EntityKind::Contact,
            &draft(json!({"firstName": "Ada", "lastName": "Lovelace", "email": ""})),
        );
        assert_eq!(errors["email"], "Email is required");
    }

    #[test]
    fn deal_numeric_rules() {
        let errors = validate(
            EntityKind::Deal,
            &draft(json!({"title": "Renewal", "contactId": 3, "value": -5, "probability": 140, "stage": "won"})),
        );
        assert_eq!(errors["value"], "Deal value cannot be negative");
        assert_eq!(errors["probability"], "Probability must be between 0 and 100");
        assert!(!errors.contains_key("stage"));
    }

    #[test]
    fn enumeration_rejects_unknown_values() {
        let errors = validate(
            EntityKind::Activity,
            &draft(json!({"contactId": "2", "description": "Intro", "type": "fax"})),
        );
        assert_eq!(errors["type"], "Unknown activity type");
    }

    #[test]
    fn supplied_validation_skips_absent_fields() {
        let errors = validate_supplied(EntityKind::Deal, &draft(json!({"stage": "won"})));
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_required_respects_write_mode() {
        let partial = draft(json!({"Industry": "Finance"}));
        assert!(missing_required(EntityKind::Company, &partial, WriteMode::Update).is_empty());

        let create = missing_required(EntityKind::Company, &partial, WriteMode::Create);
        assert_eq!(create.len(), 1);
        assert_eq!(create["Name"], "Company name is required");

        let blanked = draft(json!({"Name": " "}));
        let update = missing_required(EntityKind::Company, &blanked, WriteMode::Update);
        assert_eq!(update["Name"], "Company name is required");
    }
}
