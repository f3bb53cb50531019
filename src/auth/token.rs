//! Request token verification.
//!
//! A request token is the SHA-512 hex digest of `account + login + salt`;
//! the admin login instead proves possession of the admin salt within the
//! current clock hour. Digest comparison is constant-time, and a rejected
//! request learns nothing about which credential component failed.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use crate::api::request::MethodRequest;

/// Salts and the designated administrative login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_salt")]
    pub salt: String,

    #[serde(default = "default_admin_salt")]
    pub admin_salt: String,

    #[serde(default = "default_admin_login")]
    pub admin_login: String,
}

fn default_salt() -> String {
    "Otus".to_string()
}

fn default_admin_salt() -> String {
    "42".to_string()
}

fn default_admin_login() -> String {
    "admin".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            salt: default_salt(),
            admin_salt: default_admin_salt(),
            admin_login: default_admin_login(),
        }
    }
}

/// Checks the request token against the expected digest.
pub fn is_authenticated(request: &MethodRequest, config: &AuthConfig) -> bool {
    let expected = if request.is_admin(&config.admin_login) {
        admin_digest(&config.admin_salt)
    } else {
        user_digest(
            request.account.as_deref().unwrap_or(""),
            &request.login,
            &config.salt,
        )
    };
    constant_time_str_eq(&expected, &request.token)
}

/// Digest a normal user's credentials: `sha512(account + login + salt)`.
pub fn user_digest(account: &str, login: &str, salt: &str) -> String {
    sha512_hex(&format!("{}{}{}", account, login, salt))
}

/// Digest for the admin login, valid for the current clock hour:
/// `sha512(YYYYMMDDHH + admin_salt)`.
pub fn admin_digest(admin_salt: &str) -> String {
    let hour = Utc::now().format("%Y%m%d%H");
    sha512_hex(&format!("{}{}", hour, admin_salt))
}

fn sha512_hex(input: &str) -> String {
    let digest = Sha512::digest(input.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Constant-time comparison of two strings.
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
