//! Scoring functions over validated requests.
//!
//! Both functions treat the store as a best-effort collaborator:
//! `get_score` falls back to recomputation when the cache is unreachable,
//! and `get_interests` degrades to an empty list. A store outage never
//! turns a valid request into a failed response.

use std::time::Duration;

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::schema::Gender;
use crate::store::Store;

/// How long a computed score stays cached.
const SCORE_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache key namespace for scores.
const SCORE_KEY_PREFIX: &str = "uid:";

/// Persistent key namespace for interest lists.
const INTERESTS_KEY_PREFIX: &str = "i:";

/// The validated fields a score is computed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreQuery<'a> {
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

impl ScoreQuery<'_> {
    /// Cache key: a fingerprint of the normalized identity fields.
    fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.first_name.unwrap_or_default().as_bytes());
        hasher.update(self.last_name.unwrap_or_default().as_bytes());
        hasher.update(self.phone.unwrap_or_default().as_bytes());
        if let Some(birthday) = self.birthday {
            hasher.update(birthday.format("%Y%m%d").to_string().as_bytes());
        }
        let digest = hasher.finalize();
        let mut key = String::with_capacity(SCORE_KEY_PREFIX.len() + digest.len() * 2);
        key.push_str(SCORE_KEY_PREFIX);
        for byte in digest {
            key.push_str(&format!("{:02x}", byte));
        }
        key
    }

    /// The documented weighted sum.
    fn weigh(&self) -> f64 {
        let mut score = 0.0;
        if self.phone.is_some() {
            score += 1.5;
        }
        if self.email.is_some() {
            score += 1.5;
        }
        if self.birthday.is_some() && self.gender.is_some() {
            score += 1.5;
        }
        if self.first_name.is_some() && self.last_name.is_some() {
            score += 0.5;
        }
        score
    }
}

/// Computes the score for a validated online-score request.
///
/// Tries the cache first; on a hit the cached value is returned unchanged.
/// On a miss or store failure the score is recomputed and written back
/// best-effort; a failing write never blocks the result.
pub fn get_score(store: &dyn Store, query: &ScoreQuery<'_>) -> f64 {
    let key = query.cache_key();

    if let Ok(Some(cached)) = store.cache_get(&key) {
        if let Ok(score) = cached.parse::<f64>() {
            return score;
        }
    }

    let score = query.weigh();
    let _ = store.cache_set(&key, &score.to_string(), SCORE_CACHE_TTL);
    score
}

/// Reads the interest tags recorded for a client id.
///
/// Missing, unreadable, or store-failing entries all degrade to an empty
/// list rather than a request error.
pub fn get_interests(store: &dyn Store, client_id: u64) -> Vec<String> {
    let key = format!("{}{}", INTERESTS_KEY_PREFIX, client_id);
    let raw = match store.get(&key) {
        Ok(Some(value)) => value,
        _ => return Vec::new(),
    };
    serde_json::from_str(&raw).unwrap_or_default()
}
