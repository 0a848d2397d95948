use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use crate::client::error::ClientError;

/// Cache keys, named after the resource path they hold
pub mod keys {
    pub const ACADEMIC_YEARS: &str = "/api/academic-years";
    pub const SUBJECTS: &str = "/api/admin/subjects";
    pub const LEVELS: &str = "/api/admin/levels";
    pub const LESSONS: &str = "/api/admin/lessons";
    pub const NOTIFICATIONS: &str = "/api/notifications";
    pub const NOTIFICATION_COUNT: &str = "/api/notifications/count";
}

/// Proof that a fetch was started for a key at a given generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    key: String,
    generation: u64,
}

impl QueryTicket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Default)]
struct Entry {
    generation: u64,
    value: Option<Value>,
}

/// Response cache keyed by resource path
///
/// Every `begin` bumps the key's generation. A response is stored only if
/// its ticket still carries the latest generation, so a slow response to a
/// superseded request never overwrites a newer one. Invalidation also bumps
/// the generation, which discards responses that were in flight.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn begin(&self, key: &str) -> QueryTicket {
        let mut entries = self.lock();
        let entry = entries.entry(key.to_string()).or_default();
        entry.generation += 1;

        QueryTicket {
            key: key.to_string(),
            generation: entry.generation,
        }
    }

    /// Store `value` if `ticket` is still current; returns whether it was stored
    pub fn complete<T: Serialize>(&self, ticket: &QueryTicket, value: &T) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %ticket.key, error = %e, "Response could not be cached");
                return false;
            }
        };

        let mut entries = self.lock();
        match entries.get_mut(&ticket.key) {
            Some(entry) if entry.generation == ticket.generation => {
                entry.value = Some(value);
                true
            }
            _ => {
                tracing::debug!(key = %ticket.key, "Discarding stale response");
                false
            }
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.lock();
        let value = entries.get(key)?.value.clone()?;
        serde_json::from_value(value).ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().get(key).is_some_and(|e| e.value.is_some())
    }

    pub fn invalidate(&self, key: &str) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.generation += 1;
            entry.value = None;
        }
    }

    /// Invalidate every key starting with `prefix`, e.g. all year-scoped variants
    pub fn invalidate_prefix(&self, prefix: &str) {
        for (key, entry) in self.lock().iter_mut() {
            if key.starts_with(prefix) {
                entry.generation += 1;
                entry.value = None;
            }
        }
    }

    pub fn invalidate_all(&self) {
        for entry in self.lock().values_mut() {
            entry.generation += 1;
            entry.value = None;
        }
    }

    /// Return the cached value, or load it and cache the result
    pub async fn fetch<T, F, Fut>(&self, key: &str, load: F) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }
        self.refetch(key, load).await
    }

    /// Load and cache regardless of what is cached
    pub async fn refetch<T, F, Fut>(&self, key: &str, load: F) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let ticket = self.begin(key);
        let value = load().await?;
        self.complete(&ticket, &value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_response_is_discarded() {
        let cache = QueryCache::new();
        let first = cache.begin(keys::LESSONS);
        let second = cache.begin(keys::LESSONS);

        assert!(cache.complete(&second, &vec!["new"]));
        assert!(!cache.complete(&first, &vec!["old"]));
        assert_eq!(cache.get::<Vec<String>>(keys::LESSONS), Some(vec!["new".to_string()]));
    }

    #[test]
    fn test_invalidate_drops_value_and_in_flight_responses() {
        let cache = QueryCache::new();
        let ticket = cache.begin(keys::NOTIFICATION_COUNT);
        cache.complete(&ticket, &3u64);

        let in_flight = cache.begin(keys::NOTIFICATION_COUNT);
        cache.invalidate(keys::NOTIFICATION_COUNT);

        assert!(!cache.contains(keys::NOTIFICATION_COUNT));
        assert!(!cache.complete(&in_flight, &4u64));
    }

    #[test]
    fn test_invalidate_all_and_prefix() {
        let cache = QueryCache::new();
        for key in [
            keys::SUBJECTS,
            "/api/admin/levels?academicYear=2023-2024",
            "/api/admin/levels?academicYear=2024-2025",
        ] {
            let ticket = cache.begin(key);
            cache.complete(&ticket, &1u8);
        }

        cache.invalidate_prefix(keys::LEVELS);
        assert!(cache.contains(keys::SUBJECTS));
        assert!(!cache.contains("/api/admin/levels?academicYear=2023-2024"));

        cache.invalidate_all();
        assert!(!cache.contains(keys::SUBJECTS));
    }

    #[tokio::test]
    async fn test_fetch_uses_cached_value() {
        let cache = QueryCache::new();
        let mut calls = 0;

        let first: u64 = cache
            .fetch(keys::NOTIFICATION_COUNT, || {
                calls += 1;
                async { Ok(7) }
            })
            .await
            .unwrap();
        let second: u64 = cache
            .fetch(keys::NOTIFICATION_COUNT, || {
                calls += 1;
                async { Ok(8) }
            })
            .await
            .unwrap();

        assert_eq!((first, second, calls), (7, 7, 1));
    }

    #[tokio::test]
    async fn test_failed_fetch_caches_nothing() {
        let cache = QueryCache::new();
        let result: Result<u64, ClientError> = cache
            .fetch(keys::NOTIFICATION_COUNT, || async {
                Err(ClientError::Transport("offline".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(!cache.contains(keys::NOTIFICATION_COUNT));
    }
}
