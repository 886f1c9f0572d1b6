//! Short-TTL response cache for the catalog read path.
//!
//! The cache stores fully serialized responses so a hit returns the exact
//! payload a miss produced. It is never authoritative: every entry can be
//! rebuilt from the backing store, the TTL only trades staleness for
//! latency. Writes are best-effort; a failed put must not fail the request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

/// Default entry lifetime. Matches the catalog refresh cadence the store
/// managers work with (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

const MAX_ENTRIES: u64 = 1_000;

/// Injected get/put capability over serialized responses.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<serde_json::Value>;
    async fn put(&self, key: String, value: serde_json::Value);
}

/// `moka`-backed in-process cache with a fixed time-to-live.
#[derive(Clone)]
pub struct MokaCache {
    cache: Cache<String, Arc<serde_json::Value>>,
}

impl MokaCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl ResponseCache for MokaCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.cache.get(key).await.map(|v| (*v).clone())
    }

    async fn put(&self, key: String, value: serde_json::Value) {
        self.cache.insert(key, Arc::new(value)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_returns_what_put_stored() {
        let cache = MokaCache::new(Duration::from_secs(60));
        cache
            .put("categories:santafe".to_string(), json!({"Frutos": 3}))
            .await;
        assert_eq!(
            cache.get("categories:santafe").await,
            Some(json!({"Frutos": 3}))
        );
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = MokaCache::new(Duration::from_millis(20));
        cache.put("k".to_string(), json!(1)).await;
        assert!(cache.get("k").await.is_some());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn distinct_keys_do_not_collide() {
        let cache = MokaCache::default();
        cache.put("search:santafe:miel".to_string(), json!([1])).await;
        assert!(cache.get("search:santafe:nuez").await.is_none());
    }
}
