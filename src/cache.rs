use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use crate::clock::Clock;
use crate::error::WorkerError;

// Cache entry with its expiry
#[derive(Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Duration,
}

// TTL cache keyed by request fingerprint, expiry checked lazily on read
pub struct ExpiringCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, self.clock.now())
    }

    pub fn get_at(&self, key: &str, now: Duration) -> Option<V> {
        // remove_if holds the shard lock, so a fresh overwrite racing us is kept
        let expired = self
            .entries
            .remove_if(key, |_, entry| now > entry.expires_at)
            .is_some();
        if expired {
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn put(&self, key: &str, value: V, ttl: Duration) -> Result<(), WorkerError> {
        self.put_at(key, value, ttl, self.clock.now())
    }

    pub fn put_at(&self, key: &str, value: V, ttl: Duration, now: Duration) -> Result<(), WorkerError> {
        validate_ttl(ttl)?;
        let expires_at = now.checked_add(ttl).ok_or_else(|| {
            WorkerError::InvalidArgument(format!("cache ttl {:?} overflows the clock", ttl))
        })?;
        self.entries.insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    // Producer errors pass through untouched and are never cached.
    // No lock is held across the producer, so concurrent misses may both run it.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, ttl: Duration, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: From<WorkerError>,
    {
        validate_ttl(ttl)?;

        if let Some(value) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return Ok(value);
        }
        tracing::debug!(key, "cache miss, running producer");

        let value = producer().await?;
        self.put(key, value.clone(), ttl)?;
        Ok(value)
    }

    // Remove every entry that has passed its expiry
    pub fn sweep_expired(&self, now: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.expires_at);
        before.saturating_sub(self.entries.len())
    }

    // Includes expired entries that nobody has read or swept yet
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_ttl(ttl: Duration) -> Result<(), WorkerError> {
    if ttl.is_zero() {
        return Err(WorkerError::InvalidArgument(
            "cache ttl must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
