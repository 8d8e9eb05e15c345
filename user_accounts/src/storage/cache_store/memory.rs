use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, InMemoryCacheStore};

const CACHE_PREFIX: &str = "cache";

impl InMemoryCacheStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Creating new in-memory generic cache store");
        Self {
            entry: HashMap::new(),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }

    fn remove_expired(&mut self, now: Instant) {
        let before = self.entry.len();
        self.entry.retain(|_, (_, expires_at)| *expires_at > now);
        let removed = before - self.entry.len();
        if removed > 0 {
            tracing::debug!("Removed {} expired cache entries", removed);
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError> {
        let now = Instant::now();
        self.remove_expired(now);

        let key = Self::make_key(prefix, key);
        let expires_at = now + Duration::from_secs(ttl as u64);
        self.entry.insert(key, (value, expires_at));
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        Ok(self
            .entry
            .get(&key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entry.remove(&key);
        Ok(())
    }
}
