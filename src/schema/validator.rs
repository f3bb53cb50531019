//! Validation engine for declared schemas.
//!
//! Validation semantics:
//! - Every declared field is cleaned in declaration order
//! - Per-field failures are collected, never short-circuited
//! - Cross-field rules only run once all per-field checks pass
//! - The engine never mutates the input and is deterministic for a
//!   fixed clock date
//!
//! The per-call scratch state ([`CleanedFields`]) owns the validated
//! values and the non-empty field set; the schema itself stays read-only.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use chrono::{Months, NaiveDate, Utc};
use regex::Regex;
use serde_json::Value;

use super::errors::{FieldError, ValidationErrors};
use super::types::{FieldDef, FieldKind, FieldValue, Gender, Schema};

/// Upper bound on how far in the past a birthday may lie.
const MAX_AGE_YEARS: u32 = 70;

/// Normalized phone numbers are exactly this long.
const PHONE_LEN: usize = 11;

/// Required leading digit of a normalized phone number.
const PHONE_PREFIX: char = '7';

fn date_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("static regex"))
}

fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@]+@[^@]+$").expect("static regex"))
}

/// Validated values plus the non-empty field set for one validation call.
///
/// Created per request, discarded with it; cross-field rules and the typed
/// request constructors read from here.
#[derive(Debug, Default)]
pub struct CleanedFields {
    values: BTreeMap<&'static str, FieldValue>,
    supplied: BTreeSet<&'static str>,
}

impl CleanedFields {
    /// The stored value for a field, if one was stored (may be empty).
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Whether the field was supplied with a non-empty value.
    pub fn has(&self, name: &str) -> bool {
        self.supplied.contains(name)
    }

    /// Text content of a char/email/phone field (may be the empty string).
    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(FieldValue::as_text)
    }

    /// Text content of a field, only when it was supplied non-empty.
    pub fn non_empty_text(&self, name: &str) -> Option<&str> {
        if self.has(name) {
            self.text(name)
        } else {
            None
        }
    }

    pub fn map(&self, name: &str) -> Option<&serde_json::Map<String, Value>> {
        self.value(name).and_then(FieldValue::as_map)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.value(name).and_then(FieldValue::as_date)
    }

    pub fn gender(&self, name: &str) -> Option<Gender> {
        self.value(name).and_then(FieldValue::as_gender)
    }

    pub fn ids(&self, name: &str) -> Option<&[u64]> {
        self.value(name).and_then(FieldValue::as_ids)
    }

    /// Names of all fields supplied non-empty, in declaration-independent
    /// sorted order.
    pub fn supplied_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.supplied.iter().copied()
    }
}

impl Schema {
    /// Validates a raw key/value mapping against this schema.
    ///
    /// Walks every declared field, records each failure, and only reports
    /// once the whole registry has been checked. On success the returned
    /// [`CleanedFields`] holds the typed values and the non-empty set.
    pub fn validate(&self, raw: &serde_json::Map<String, Value>) -> Result<CleanedFields, ValidationErrors> {
        let mut cleaned = CleanedFields::default();
        let mut errors = ValidationErrors::new();

        for spec in self.fields {
            match clean_field(&spec.def, raw.get(spec.name)) {
                Ok(Some((value, non_empty))) => {
                    if non_empty {
                        cleaned.supplied.insert(spec.name);
                    }
                    cleaned.values.insert(spec.name, value);
                }
                Ok(None) => {}
                Err(error) => errors.push_field(spec.name, error),
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }
}

/// Cleans one raw value (or absence) against its descriptor.
///
/// Returns the stored value and whether it counts as non-empty, or `None`
/// when the field is legitimately not present.
fn clean_field(
    def: &FieldDef,
    raw: Option<&Value>,
) -> Result<Option<(FieldValue, bool)>, FieldError> {
    let Some(value) = raw else {
        if def.required {
            return Err(FieldError::MissingRequired);
        }
        return Ok(None);
    };

    if value.is_null() {
        if !def.nullable {
            return Err(FieldError::EmptyNotAllowed);
        }
        return Ok(None);
    }

    if is_structurally_empty(value) {
        if !def.nullable {
            return Err(FieldError::EmptyNotAllowed);
        }
        return Ok(empty_value(&def.kind).map(|v| (v, false)));
    }

    let cleaned = clean_value(&def.kind, value)?;
    Ok(Some((cleaned, true)))
}

/// Structural emptiness: empty string, empty object, empty array.
///
/// Numbers are never empty; gender code 0 counts as supplied.
fn is_structurally_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// The stored representation of an accepted empty value, where the kind
/// has one.
fn empty_value(kind: &FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::Char | FieldKind::Email | FieldKind::Phone => {
            Some(FieldValue::Text(String::new()))
        }
        FieldKind::Arguments => Some(FieldValue::Map(serde_json::Map::new())),
        FieldKind::ClientIds => Some(FieldValue::Ids(Vec::new())),
        FieldKind::Date | FieldKind::BirthDay | FieldKind::Gender => None,
    }
}

/// Type-specific cleaning for a present, non-empty value.
fn clean_value(kind: &FieldKind, value: &Value) -> Result<FieldValue, FieldError> {
    match kind {
        FieldKind::Char => clean_char(value),
        FieldKind::Arguments => clean_arguments(value),
        FieldKind::Email => clean_email(value),
        FieldKind::Phone => clean_phone(value),
        FieldKind::Date => clean_date(value),
        FieldKind::BirthDay => clean_birthday(value),
        FieldKind::Gender => clean_gender(value),
        FieldKind::ClientIds => clean_client_ids(value),
    }
}

fn clean_char(value: &Value) -> Result<FieldValue, FieldError> {
    match value.as_str() {
        Some(s) => Ok(FieldValue::Text(s.to_string())),
        None => Err(type_error("a string", value)),
    }
}

fn clean_arguments(value: &Value) -> Result<FieldValue, FieldError> {
    match value.as_object() {
        Some(map) => Ok(FieldValue::Map(map.clone())),
        None => Err(type_error("an object", value)),
    }
}

fn clean_email(value: &Value) -> Result<FieldValue, FieldError> {
    let text = value
        .as_str()
        .ok_or_else(|| type_error("a string", value))?;
    if !email_shape().is_match(text) {
        return Err(FieldError::invalid(
            "must contain exactly one '@' with non-empty local and domain parts",
        ));
    }
    Ok(FieldValue::Text(text.to_string()))
}

fn clean_phone(value: &Value) -> Result<FieldValue, FieldError> {
    let digits = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_u64() {
            Some(n) => n.to_string(),
            None => return Err(FieldError::invalid("must be a string or a whole number")),
        },
        other => return Err(type_error("a string or number", other)),
    };

    if digits.len() != PHONE_LEN || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::invalid(format!(
            "must be exactly {} digits",
            PHONE_LEN
        )));
    }
    if !digits.starts_with(PHONE_PREFIX) {
        return Err(FieldError::invalid(format!(
            "must start with {}",
            PHONE_PREFIX
        )));
    }
    Ok(FieldValue::Text(digits))
}

fn parse_exact_date(value: &Value) -> Result<NaiveDate, FieldError> {
    let text = value
        .as_str()
        .ok_or_else(|| type_error("a string", value))?;
    if !date_shape().is_match(text) {
        return Err(FieldError::invalid("must be a date in DD.MM.YYYY format"));
    }
    NaiveDate::parse_from_str(text, "%d.%m.%Y")
        .map_err(|_| FieldError::invalid(format!("'{}' is not a valid calendar date", text)))
}

fn clean_date(value: &Value) -> Result<FieldValue, FieldError> {
    parse_exact_date(value).map(FieldValue::Date)
}

fn clean_birthday(value: &Value) -> Result<FieldValue, FieldError> {
    let date = parse_exact_date(value)?;

    let today = Utc::now().date_naive();
    if date > today {
        return Err(FieldError::invalid("birthday cannot be in the future"));
    }
    let oldest = today
        .checked_sub_months(Months::new(12 * MAX_AGE_YEARS))
        .unwrap_or(NaiveDate::MIN);
    if date < oldest {
        return Err(FieldError::invalid(format!(
            "age cannot exceed {} years",
            MAX_AGE_YEARS
        )));
    }
    Ok(FieldValue::Date(date))
}

fn clean_gender(value: &Value) -> Result<FieldValue, FieldError> {
    let code = match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| FieldError::invalid("must be a whole number"))?,
        other => return Err(type_error("a number", other)),
    };
    Gender::from_code(code)
        .map(FieldValue::Gender)
        .ok_or_else(|| FieldError::invalid("must be one of 0 (unknown), 1 (male), 2 (female)"))
}

fn clean_client_ids(value: &Value) -> Result<FieldValue, FieldError> {
    let items = value
        .as_array()
        .ok_or_else(|| type_error("an array", value))?;
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match item.as_u64() {
            Some(id) => ids.push(id),
            None => {
                return Err(FieldError::invalid(
                    "every client id must be a non-negative integer",
                ))
            }
        }
    }
    Ok(FieldValue::Ids(ids))
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(expected: &str, actual: &Value) -> FieldError {
    FieldError::invalid(format!(
        "must be {}, got {}",
        expected,
        json_type_name(actual)
    ))
}

#[cfg(test)]
mod tests {
    use super::super::types::FieldSpec;
    use super::*;
    use serde_json::json;

    const TEST_SCHEMA: Schema = Schema {
        name: "test",
        fields: &[
            FieldSpec {
                name: "login",
                def: FieldDef::required_nullable(FieldKind::Char),
            },
            FieldSpec {
                name: "method",
                def: FieldDef::required(FieldKind::Char),
            },
            FieldSpec {
                name: "email",
                def: FieldDef::optional(FieldKind::Email),
            },
            FieldSpec {
                name: "phone",
                def: FieldDef::optional(FieldKind::Phone),
            },
            FieldSpec {
                name: "birthday",
                def: FieldDef::optional(FieldKind::BirthDay),
            },
            FieldSpec {
                name: "gender",
                def: FieldDef::optional(FieldKind::Gender),
            },
            FieldSpec {
                name: "client_ids",
                def: FieldDef::optional(FieldKind::ClientIds),
            },
        ],
    };

    fn raw(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().expect("test payload is an object").clone()
    }

    fn clean_one(kind: FieldKind, value: Value) -> Result<FieldValue, FieldError> {
        clean_value(&kind, &value)
    }

    // =========================================================================
    // Engine behavior
    // =========================================================================

    #[test]
    fn test_missing_required_field_names_field() {
        let result = TEST_SCHEMA.validate(&raw(json!({"method": "ping"})));
        let errors = result.unwrap_err();
        assert!(errors.mentions("login"));
        assert!(errors.to_string().contains("required"));
    }

    #[test]
    fn test_empty_not_allowed_for_non_nullable() {
        let result = TEST_SCHEMA.validate(&raw(json!({"login": "h&f", "method": ""})));
        let errors = result.unwrap_err();
        assert!(errors.mentions("method"));
        assert!(errors.to_string().contains("empty"));
    }

    #[test]
    fn test_nullable_empty_accepted_and_not_supplied() {
        let fields = TEST_SCHEMA
            .validate(&raw(json!({"login": "", "method": "ping"})))
            .unwrap();
        assert_eq!(fields.text("login"), Some(""));
        assert!(!fields.has("login"));
        assert!(fields.has("method"));
    }

    #[test]
    fn test_null_accepted_for_nullable_stores_nothing() {
        let fields = TEST_SCHEMA
            .validate(&raw(json!({"login": null, "method": "ping"})))
            .unwrap();
        assert!(fields.value("login").is_none());
        assert!(!fields.has("login"));
    }

    #[test]
    fn test_null_rejected_for_non_nullable() {
        let result = TEST_SCHEMA.validate(&raw(json!({"login": "x", "method": null})));
        assert!(result.unwrap_err().mentions("method"));
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let result = TEST_SCHEMA.validate(&raw(json!({
            "method": "",
            "email": "a-b.com",
            "gender": 9
        })));
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 4); // login missing, method empty, email, gender
        assert!(errors.mentions("login"));
        assert!(errors.mentions("method"));
        assert!(errors.mentions("email"));
        assert!(errors.mentions("gender"));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let payload = raw(json!({"method": "", "email": "broken"}));
        let first = TEST_SCHEMA.validate(&payload).unwrap_err().to_string();
        for _ in 0..50 {
            let again = TEST_SCHEMA.validate(&payload).unwrap_err().to_string();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_absent_optional_fields_are_skipped() {
        let fields = TEST_SCHEMA
            .validate(&raw(json!({"login": "h&f", "method": "ping"})))
            .unwrap();
        assert!(fields.value("email").is_none());
        assert!(!fields.has("email"));
    }

    // =========================================================================
    // Char / Arguments
    // =========================================================================

    #[test]
    fn test_char_accepts_text_rejects_numbers() {
        assert!(clean_one(FieldKind::Char, json!("hello")).is_ok());
        let err = clean_one(FieldKind::Char, json!(42)).unwrap_err();
        assert!(err.to_string().contains("string"));
        assert!(err.to_string().contains("int"));
    }

    #[test]
    fn test_arguments_accepts_object_rejects_list() {
        assert!(clean_one(FieldKind::Arguments, json!({"a": 1})).is_ok());
        assert!(clean_one(FieldKind::Arguments, json!([1, 2])).is_err());
    }

    // =========================================================================
    // Email
    // =========================================================================

    #[test]
    fn test_email_accepts_single_separator() {
        assert_eq!(
            clean_one(FieldKind::Email, json!("a@b.com")).unwrap(),
            FieldValue::Text("a@b.com".into())
        );
    }

    #[test]
    fn test_email_rejects_missing_or_doubled_separator() {
        assert!(clean_one(FieldKind::Email, json!("a-b.com")).is_err());
        assert!(clean_one(FieldKind::Email, json!("a@b@c.com")).is_err());
        assert!(clean_one(FieldKind::Email, json!("@b.com")).is_err());
        assert!(clean_one(FieldKind::Email, json!("a@")).is_err());
    }

    // =========================================================================
    // Phone
    // =========================================================================

    #[test]
    fn test_phone_accepts_string_and_integer() {
        assert_eq!(
            clean_one(FieldKind::Phone, json!("79175002040")).unwrap(),
            FieldValue::Text("79175002040".into())
        );
        assert_eq!(
            clean_one(FieldKind::Phone, json!(79175002040u64)).unwrap(),
            FieldValue::Text("79175002040".into())
        );
    }

    #[test]
    fn test_phone_rejects_wrong_prefix_and_length() {
        // wrong leading digit
        assert!(clean_one(FieldKind::Phone, json!("89175002040")).is_err());
        // wrong length
        assert!(clean_one(FieldKind::Phone, json!("791750020")).is_err());
        assert!(clean_one(FieldKind::Phone, json!("791750020401")).is_err());
    }

    #[test]
    fn test_phone_rejects_non_numeric_content() {
        assert!(clean_one(FieldKind::Phone, json!("7917500204x")).is_err());
        assert!(clean_one(FieldKind::Phone, json!(-79175002040i64)).is_err());
        assert!(clean_one(FieldKind::Phone, json!(7917500204.5)).is_err());
    }

    // =========================================================================
    // Date / BirthDay
    // =========================================================================

    #[test]
    fn test_date_accepts_exact_format() {
        assert_eq!(
            clean_one(FieldKind::Date, json!("01.01.2000")).unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_date_rejects_other_formats() {
        assert!(clean_one(FieldKind::Date, json!("2000-01-01")).is_err());
        assert!(clean_one(FieldKind::Date, json!("1.1.2000")).is_err());
        assert!(clean_one(FieldKind::Date, json!(20000101)).is_err());
    }

    #[test]
    fn test_date_rejects_impossible_days() {
        assert!(clean_one(FieldKind::Date, json!("32.01.2000")).is_err());
        assert!(clean_one(FieldKind::Date, json!("29.02.2001")).is_err());
    }

    #[test]
    fn test_birthday_accepts_69_years_back() {
        let date = Utc::now()
            .date_naive()
            .checked_sub_months(Months::new(12 * 69))
            .unwrap();
        let text = date.format("%d.%m.%Y").to_string();
        assert!(clean_one(FieldKind::BirthDay, json!(text)).is_ok());
    }

    #[test]
    fn test_birthday_rejects_71_years_back() {
        let date = Utc::now()
            .date_naive()
            .checked_sub_months(Months::new(12 * 71))
            .unwrap();
        let text = date.format("%d.%m.%Y").to_string();
        let err = clean_one(FieldKind::BirthDay, json!(text)).unwrap_err();
        assert!(err.to_string().contains("70"));
    }

    #[test]
    fn test_birthday_rejects_future_date() {
        let date = Utc::now()
            .date_naive()
            .checked_add_months(Months::new(12))
            .unwrap();
        let text = date.format("%d.%m.%Y").to_string();
        assert!(clean_one(FieldKind::BirthDay, json!(text)).is_err());
    }

    // =========================================================================
    // Gender
    // =========================================================================

    #[test]
    fn test_gender_accepts_enumerated_codes() {
        assert_eq!(
            clean_one(FieldKind::Gender, json!(0)).unwrap(),
            FieldValue::Gender(Gender::Unknown)
        );
        assert_eq!(
            clean_one(FieldKind::Gender, json!(1)).unwrap(),
            FieldValue::Gender(Gender::Male)
        );
        assert_eq!(
            clean_one(FieldKind::Gender, json!(2)).unwrap(),
            FieldValue::Gender(Gender::Female)
        );
    }

    #[test]
    fn test_gender_rejects_other_codes_and_strings() {
        assert!(clean_one(FieldKind::Gender, json!(3)).is_err());
        assert!(clean_one(FieldKind::Gender, json!(-1)).is_err());
        assert!(clean_one(FieldKind::Gender, json!("1")).is_err());
        assert!(clean_one(FieldKind::Gender, json!(1.5)).is_err());
    }

    #[test]
    fn test_gender_zero_counts_as_supplied() {
        let fields = TEST_SCHEMA
            .validate(&raw(json!({"login": "x", "method": "ping", "gender": 0})))
            .unwrap();
        assert!(fields.has("gender"));
        assert_eq!(fields.gender("gender"), Some(Gender::Unknown));
    }

    // =========================================================================
    // ClientIds
    // =========================================================================

    #[test]
    fn test_client_ids_accepts_integer_list() {
        assert_eq!(
            clean_one(FieldKind::ClientIds, json!([1, 2, 3])).unwrap(),
            FieldValue::Ids(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_client_ids_rejects_mixed_content() {
        assert!(clean_one(FieldKind::ClientIds, json!([1, "2", 3])).is_err());
        assert!(clean_one(FieldKind::ClientIds, json!([1, -2])).is_err());
        assert!(clean_one(FieldKind::ClientIds, json!([1.5])).is_err());
        assert!(clean_one(FieldKind::ClientIds, json!("1,2,3")).is_err());
    }
}
