//! Key/value cache abstraction used to keep messaging admin tokens.
//!
//! Any store that can hold strings with a time-to-live can back the token
//! manager: implement [`Cache`] for it and hand it to
//! [`openim::Client::new`](crate::openim::Client::new). [`MemoryCache`] is an
//! in-process implementation suitable for single-process deployments and
//! tests.
//!
//! Backends report their own failures as
//! [`SdkError::Cache`](crate::SdkError::Cache); the token
//! manager passes them through unchanged.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A string key/value store with per-entry TTL.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a value. Expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value. `ttl_seconds == 0` means no expiry.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Remove a value. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;

    /// Whether a live entry exists.
    async fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Fetch several values.
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<String>>> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            values.insert((*key).to_string(), self.get(key).await?);
        }
        Ok(values)
    }

    /// Store several values with the same TTL.
    async fn set_many(&self, entries: &[(&str, &str)], ttl_seconds: u64) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value, ttl_seconds).await?;
        }
        Ok(())
    }

    /// Remove several values.
    async fn delete_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key).await?;
        }
        Ok(())
    }
}

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-memory [`Cache`] implementation.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    /// Whether the cache holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let now = Instant::now();
        let expires_at = (ttl_seconds > 0).then(|| now + Duration::from_secs(ttl_seconds));
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("k").await.unwrap(), None);

        cache.set("k", "v", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.has("k").await.unwrap());

        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert!(!cache.has("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible() {
        let cache = MemoryCache::new();
        cache.entries.write().await.insert(
            "old".to_string(),
            Entry {
                value: "stale".to_string(),
                expires_at: Some(Instant::now() - Duration::from_secs(1)),
            },
        );
        assert_eq!(cache.get("old").await.unwrap(), None);
        assert!(cache.is_empty().await);
        assert!(cache.entries.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_sweeps_expired_entries() {
        let cache = MemoryCache::new();
        for i in 0..3 {
            cache.entries.write().await.insert(
                format!("old-{i}"),
                Entry {
                    value: "stale".to_string(),
                    expires_at: Some(Instant::now() - Duration::from_secs(1)),
                },
            );
        }
        cache.set("fresh", "v", 60).await.unwrap();

        let entries = cache.entries.read().await;
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("fresh"));
    }

    #[tokio::test]
    async fn test_zero_ttl_never_expires() {
        let cache = MemoryCache::new();
        cache.set("k", "v", 0).await.unwrap();
        assert!(cache.entries.read().await["k"].expires_at.is_none());
    }

    #[tokio::test]
    async fn test_batch_operations() {
        let cache = MemoryCache::new();
        cache.set_many(&[("a", "1"), ("b", "2")], 60).await.unwrap();
        assert_eq!(cache.len().await, 2);

        let values = cache.get_many(&["a", "b", "c"]).await.unwrap();
        assert_eq!(values["a"].as_deref(), Some("1"));
        assert_eq!(values["b"].as_deref(), Some("2"));
        assert_eq!(values["c"], None);

        cache.delete_many(&["a"]).await.unwrap();
        assert!(!cache.has("a").await.unwrap());

        cache.clear().await.unwrap();
        assert!(cache.is_empty().await);
    }
}
