//! Time-based freshness and uniform retry for provider-backed queries.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

pub const SEARCH_STALE: Duration = Duration::from_secs(5 * 60);
pub const PAGE_STALE: Duration = Duration::from_secs(10 * 60);
pub const FAVORITES_STALE: Duration = Duration::from_secs(5 * 60);
pub const RETRY_COUNT: usize = 2;

/// Results keyed by the exact query that produced them.
#[derive(Clone, Debug)]
pub struct QueryCache<V> {
    ttl: Duration,
    entries: HashMap<String, (V, Instant)>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get_fresh(&self, key: &str, now: Instant) -> Option<V> {
        let (value, fetched_at) = self.entries.get(key)?;
        if now.saturating_duration_since(*fetched_at) < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V, now: Instant) {
        self.entries.insert(key.into(), (value, now));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache key for an ordered list of names.
pub fn list_key(names: &[String]) -> String {
    serde_json::to_string(names).unwrap_or_else(|_| names.join("\u{1f}"))
}

/// Runs `op`, repeating it up to `retries` more times while it fails.
pub async fn with_retry<T, E, F, Fut>(retries: usize, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < retries => {
                attempt += 1;
                tracing::debug!(attempt, error = %err, "retrying query");
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cache_freshness_window() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert("pika", vec![1, 2], start);

        assert_eq!(cache.get_fresh("pika", start), Some(vec![1, 2]));
        assert_eq!(
            cache.get_fresh("pika", start + Duration::from_secs(59)),
            Some(vec![1, 2])
        );
        assert_eq!(cache.get_fresh("pika", start + Duration::from_secs(60)), None);
        assert_eq!(cache.get_fresh("char", start), None);
    }

    #[test]
    fn test_list_key_depends_on_order() {
        let a = list_key(&["pikachu".into(), "charizard".into()]);
        let b = list_key(&["charizard".into(), "pikachu".into()]);
        assert_ne!(a, b);
        assert_eq!(a, list_key(&["pikachu".into(), "charizard".into()]));
    }

    #[tokio::test]
    async fn test_retry_stops_after_success() {
        let calls = AtomicUsize::new(0);
        let result: Result<u8, String> = with_retry(RETRY_COUNT, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err("flaky".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let calls = AtomicUsize::new(0);
        let result: Result<u8, String> = with_retry(RETRY_COUNT, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        })
        .await;

        assert_eq!(result, Err("down".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), RETRY_COUNT + 1);
    }
}
