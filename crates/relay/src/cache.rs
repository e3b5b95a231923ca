//! Short-lived process-wide result cache (spec §4.8).
//!
//! A single `HashMap` behind a lock, TTL-only eviction, no LRU. Good enough
//! for a cache whose job is absorbing repeat reads within a request burst,
//! not bounding memory under adversarial key churn.

use parking_lot::Mutex;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

struct Entry {
    value: Value,
    expires_at_ms: i64,
}

#[derive(Clone)]
pub struct Cache {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

impl Cache {
    pub fn new() -> Self {
        Cache { inner: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Returns the cached value for `key` if present and not expired.
    /// Expired entries are evicted on the access that discovers them.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = now_ms();
        let mut inner = self.inner.lock();
        match inner.get(key) {
            Some(entry) if entry.expires_at_ms > now => Some(entry.value.clone()),
            Some(_) => {
                inner.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, value: Value, ttl_ms: i64) {
        let expires_at_ms = now_ms() + ttl_ms;
        self.inner.lock().insert(key.into(), Entry { value, expires_at_ms });
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_millis() as i64
}
