//! Request shapes and their declared schemas.
//!
//! Each shape declares its fields once as a `const` schema; `parse` runs
//! the engine over the raw mapping, then any cross-field rule over the
//! non-empty field set.

use chrono::NaiveDate;
use serde_json::Value;

use crate::schema::{
    CleanedFields, FieldDef, FieldKind, FieldSpec, Gender, Schema, ValidationErrors,
};

/// The outer envelope carrying authentication material and the method
/// arguments.
#[derive(Debug, Clone)]
pub struct MethodRequest {
    pub account: Option<String>,
    pub login: String,
    pub method: String,
    pub token: String,
    pub arguments: serde_json::Map<String, Value>,
}

impl MethodRequest {
    pub const SCHEMA: Schema = Schema {
        name: "method",
        fields: &[
            FieldSpec {
                name: "account",
                def: FieldDef::optional(FieldKind::Char),
            },
            FieldSpec {
                name: "login",
                def: FieldDef::required_nullable(FieldKind::Char),
            },
            FieldSpec {
                name: "method",
                def: FieldDef::required(FieldKind::Char),
            },
            FieldSpec {
                name: "token",
                def: FieldDef::required_nullable(FieldKind::Char),
            },
            FieldSpec {
                name: "arguments",
                def: FieldDef::required_nullable(FieldKind::Arguments),
            },
        ],
    };

    /// Validates the raw envelope and binds the typed request.
    pub fn parse(raw: &serde_json::Map<String, Value>) -> Result<Self, ValidationErrors> {
        let fields = Self::SCHEMA.validate(raw)?;
        Ok(Self {
            account: fields.text("account").map(str::to_string),
            login: fields.text("login").unwrap_or_default().to_string(),
            method: fields.text("method").unwrap_or_default().to_string(),
            token: fields.text("token").unwrap_or_default().to_string(),
            arguments: fields.map("arguments").cloned().unwrap_or_default(),
        })
    }

    /// Whether this request claims the designated administrative login.
    pub fn is_admin(&self, admin_login: &str) -> bool {
        self.login == admin_login
    }
}

/// Arguments of the `online_score` method.
///
/// Every field is optional, but at least one of the declared pairs must be
/// supplied non-empty.
#[derive(Debug, Clone)]
pub struct OnlineScoreRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<Gender>,
    supplied: Vec<String>,
}

impl OnlineScoreRequest {
    pub const SCHEMA: Schema = Schema {
        name: "online_score",
        fields: &[
            FieldSpec {
                name: "first_name",
                def: FieldDef::optional(FieldKind::Char),
            },
            FieldSpec {
                name: "last_name",
                def: FieldDef::optional(FieldKind::Char),
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
        ],
    };

    /// Field pairs of which at least one must be fully non-empty.
    pub const REQUIRED_PAIRS: [[&'static str; 2]; 3] = [
        ["phone", "email"],
        ["first_name", "last_name"],
        ["gender", "birthday"],
    ];

    /// Validates the arguments and enforces the pair rule.
    pub fn parse(raw: &serde_json::Map<String, Value>) -> Result<Self, ValidationErrors> {
        let fields = Self::SCHEMA.validate(raw)?;
        Self::check_pairs(&fields)?;

        Ok(Self {
            first_name: fields.non_empty_text("first_name").map(str::to_string),
            last_name: fields.non_empty_text("last_name").map(str::to_string),
            email: fields.non_empty_text("email").map(str::to_string),
            phone: fields.non_empty_text("phone").map(str::to_string),
            birthday: fields.date("birthday"),
            gender: fields.gender("gender"),
            supplied: fields.supplied_names().map(String::from).collect(),
        })
    }

    /// Cross-field rule: at least one declared pair fully supplied.
    fn check_pairs(fields: &CleanedFields) -> Result<(), ValidationErrors> {
        let satisfied = Self::REQUIRED_PAIRS
            .iter()
            .any(|pair| pair.iter().all(|name| fields.has(name)));
        if satisfied {
            return Ok(());
        }
        Err(ValidationErrors::rule(
            "at least one pair of (phone, email), (first_name, last_name), \
             (gender, birthday) must be supplied non-empty",
        ))
    }

    /// Names of the argument fields supplied non-empty.
    pub fn supplied_fields(&self) -> &[String] {
        &self.supplied
    }
}

/// Arguments of the `clients_interests` method.
#[derive(Debug, Clone)]
pub struct ClientsInterestsRequest {
    pub client_ids: Vec<u64>,
    pub date: Option<NaiveDate>,
}

impl ClientsInterestsRequest {
    pub const SCHEMA: Schema = Schema {
        name: "clients_interests",
        fields: &[
            FieldSpec {
                name: "client_ids",
                def: FieldDef::required(FieldKind::ClientIds),
            },
            FieldSpec {
                name: "date",
                def: FieldDef::optional(FieldKind::Date),
            },
        ],
    };

    pub fn parse(raw: &serde_json::Map<String, Value>) -> Result<Self, ValidationErrors> {
        let fields = Self::SCHEMA.validate(raw)?;
        Ok(Self {
            client_ids: fields.ids("client_ids").unwrap_or_default().to_vec(),
            date: fields.date("date"),
        })
    }
}
