use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-memory cache for fetched collections.
///
/// Holds the listing and seeker collections between store fetches. It
/// lives in the application state, fills lazily on first fetch, expires
/// on TTL and is invalidated on every write.
pub struct CollectionCache {
    cache: moka::future::Cache<String, Vec<u8>>,
}

impl CollectionCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.cache.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.cache.insert(key.to_string(), bytes).await;
        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
        tracing::trace!("Cache invalidated: {}", key);
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the full listing collection
    pub fn listings() -> String {
        "listings:all".to_string()
    }

    /// Key for the full seeker collection
    pub fn seekers() -> String {
        "seekers:all".to_string()
    }

    /// Key for a user profile
    pub fn profile(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_invalidate_roundtrip() {
        let cache = CollectionCache::new(100, 60);

        cache.set("k", &vec!["a".to_string()]).await.unwrap();
        let value: Vec<String> = cache.get("k").await.unwrap();
        assert_eq!(value, vec!["a".to_string()]);

        cache.invalidate("k").await;
        assert!(cache.get::<Vec<String>>("k").await.is_err());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::listings(), "listings:all");
        assert_eq!(CacheKey::seekers(), "seekers:all");
        assert_eq!(CacheKey::profile("user123"), "profile:user123");
    }
}
