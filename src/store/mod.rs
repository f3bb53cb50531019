//! Key/value store capability used by the scoring functions.
//!
//! The store is a narrow interface (cache reads/writes with a TTL plus a
//! persistent read) handed to callers as a parameter, never reached as
//! global state. Store failures are a degraded-result condition for the
//! scoring functions, not a request error.

pub mod errors;
pub mod memory;

use std::time::Duration;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;

/// Store capability consumed by the scoring functions.
///
/// Implementations are expected to bound each operation with their own
/// timeout and surface failures as [`StoreError`].
pub trait Store: Send + Sync {
    /// Read a cached value; `None` when the key is absent or expired.
    fn cache_get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a cached value with the given time-to-live.
    fn cache_set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Persistent (non-cache) read; `None` when the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
}
