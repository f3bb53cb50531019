//! Field descriptor and schema type definitions.
//!
//! Supported field kinds:
//! - char: UTF-8 string
//! - arguments: key/value object
//! - email: string with a single `@` separator
//! - phone: 11-digit string starting with 7 (string or integer input)
//! - date: `DD.MM.YYYY` calendar date
//! - birthday: date no more than 70 years in the past
//! - gender: enumerated code {0, 1, 2}
//! - client_ids: non-empty list of non-negative integers

use chrono::NaiveDate;
use serde_json::Value;

/// Supported field kinds for request schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 string
    Char,
    /// Key/value object, values unconstrained
    Arguments,
    /// String with exactly one `@` separating non-empty parts
    Email,
    /// 11-digit subscriber number starting with 7
    Phone,
    /// Calendar date in `DD.MM.YYYY`
    Date,
    /// Date at most 70 years before today and not in the future
    BirthDay,
    /// Enumerated gender code
    Gender,
    /// Non-empty list of non-negative integer client ids
    ClientIds,
}

impl FieldKind {
    /// Returns the kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Char => "char",
            FieldKind::Arguments => "arguments",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Date => "date",
            FieldKind::BirthDay => "birthday",
            FieldKind::Gender => "gender",
            FieldKind::ClientIds => "client_ids",
        }
    }
}

/// A declared field: its kind plus presence and emptiness constraints.
///
/// `required` governs absence; `nullable` governs whether a present but
/// structurally empty value (`""`, `{}`, `[]`, `null`) is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldDef {
    /// Required field that must be non-empty.
    pub const fn required(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            nullable: false,
        }
    }

    /// Required field that may be empty.
    pub const fn required_nullable(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            nullable: true,
        }
    }

    /// Optional field that may be empty.
    pub const fn optional(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            nullable: true,
        }
    }
}

/// A named field descriptor inside a schema's registry.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub def: FieldDef,
}

/// Ordered, immutable field registry for one request shape.
///
/// Declared as a `const` next to the request type and shared by reference;
/// no per-request state ever lives here, so concurrent validations need no
/// coordination.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

/// Enumerated gender codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Unknown = 0,
    Male = 1,
    Female = 2,
}

impl Gender {
    /// Maps a raw integer code to a gender, if valid.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Gender::Unknown),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Unknown => "unknown",
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// A cleaned, typed field value produced by the validation engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Char, email, or normalized phone content
    Text(String),
    /// Arguments payload
    Map(serde_json::Map<String, Value>),
    /// Date or birthday
    Date(NaiveDate),
    /// Gender code
    Gender(Gender),
    /// Client identifiers
    Ids(Vec<u64>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_gender(&self) -> Option<Gender> {
        match self {
            FieldValue::Gender(g) => Some(*g),
            _ => None,
        }
    }

    pub fn as_ids(&self) -> Option<&[u64]> {
        match self {
            FieldValue::Ids(ids) => Some(ids),
            _ => None,
        }
    }
}
