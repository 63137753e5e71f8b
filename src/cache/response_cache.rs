//! In-memory AI response cache with per-key TTL expiry.
//!
//! Maps an opaque caller-supplied session key to the last [`Completion`]
//! received for that key. Each entry lives for a fixed TTL measured from
//! insertion; a `put` under an existing key replaces the entry and re-arms
//! its expiry from the time of the overwrite.
//!
//! Expired entries are dropped lazily on lookup and by a background sweep
//! task rather than one timer per entry. Eviction always compares the
//! deadline stored in the entry itself, so a sweep scheduled while an old
//! entry was live can never evict a newer entry that replaced it under the
//! same key.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::providers::Completion;

struct CacheEntry {
    completion: Completion,
    expires_at: Instant,
}

/// Shared response cache. Cheap to clone; all clones see the same entries.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    sweeper: CancellationToken,
}

impl ResponseCache {
    /// Create a cache whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            sweeper: CancellationToken::new(),
        }
    }

    /// Look up a completion. Absent and expired keys are indistinguishable:
    /// both report a miss. Never blocks on anything but the map shard lock.
    pub fn get(&self, key: &str) -> Option<Completion> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.completion.clone());
            }
            drop(entry);
            debug!(key = %truncate_key(key), "cache entry expired, removing");
            // Re-check the deadline under the write lock: a concurrent put
            // may have replaced the entry since we released the read guard.
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= now);
        }
        None
    }

    /// Store a completion under `key`, replacing any prior entry and
    /// re-arming expiry from now.
    pub fn put(&self, key: &str, completion: Completion) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                completion,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every entry whose deadline has passed.
    pub fn sweep_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Spawn the background sweep task.
    ///
    /// Runs until [`shutdown`](Self::shutdown) is called. Lookups already
    /// treat expired entries as absent; the sweep only bounds the memory held
    /// by keys that are never read again.
    pub fn spawn_sweeper(&self, interval: Duration) {
        let cache = self.clone();
        let token = self.sweeper.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("response cache sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => cache.sweep_expired(),
                }
            }
        });
    }

    /// Cancel the sweep task. Entries already stored stay readable until
    /// their own deadline passes.
    pub fn shutdown(&self) {
        self.sweeper.cancel();
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keep session keys out of logs; the prefix is enough to correlate.
/// Keys are caller-supplied and may be multi-byte, so cut on a char boundary.
fn truncate_key(key: &str) -> &str {
    key.char_indices().nth(8).map_or(key, |(i, _)| &key[..i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Choice, ChoiceMessage};

    fn completion(text: &str) -> Completion {
        Completion {
            model: "gpt-4-turbo-preview".into(),
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: text.into(),
                },
            }],
            usage: None,
        }
    }

    #[tokio::test]
    async fn test_get_miss_on_unknown_key() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        assert!(cache.get("sess-1").is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_within_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("sess-1", completion("hello"));
        let hit = cache.get("sess-1").expect("entry within TTL");
        assert_eq!(hit.text(), Some("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("sess-1", completion("hello"));
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get("sess-1").is_none());
        // The lazy check also removed the dead entry.
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_just_before_deadline_still_hits() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("sess-1", completion("hello"));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("sess-1").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_rearms_expiry() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("sess-1", completion("first"));
        tokio::time::advance(Duration::from_secs(40)).await;
        cache.put("sess-1", completion("second"));
        // 70s after the first put, 30s after the second. The first entry's
        // deadline has passed; the replacement must survive.
        tokio::time::advance(Duration::from_secs(30)).await;
        let hit = cache.get("sess-1").expect("re-armed entry");
        assert_eq!(hit.text(), Some("second"));
    }

    #[tokio::test]
    async fn test_put_replaces_value_for_same_key() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("sess-1", completion("first"));
        cache.put("sess-1", completion("second"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("sess-1").unwrap().text(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_drops_expired_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.spawn_sweeper(Duration::from_secs(15));
        cache.put("sess-1", completion("hello"));
        cache.put("sess-2", completion("world"));
        assert_eq!(cache.len(), 2);
        tokio::time::advance(Duration::from_secs(90)).await;
        // Let the sweep task observe the tick.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.is_empty());
        cache.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_sweeper() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.spawn_sweeper(Duration::from_secs(15));
        cache.shutdown();
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.put("sess-1", completion("hello"));
        tokio::time::advance(Duration::from_secs(90)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        // Sweeper is gone, so the dead entry lingers...
        assert_eq!(cache.len(), 1);
        // ...but lookups still treat it as absent.
        assert!(cache.get("sess-1").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_multibyte_key_expires_without_panicking() {
        // Keys arrive verbatim from callers; the expired-entry log path must
        // not assume ASCII.
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("日本語キー", completion("hello"));
        tokio::time::advance(Duration::from_secs(61)).await;
        // Force the debug-level key logging to actually evaluate.
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(cache.get("日本語キー").is_none());
        });
        assert!(cache.is_empty());
    }

    #[test]
    fn test_truncate_key_respects_char_boundaries() {
        assert_eq!(truncate_key("abcdefghij"), "abcdefgh");
        assert_eq!(truncate_key("short"), "short");
        // 5 chars, 15 bytes: shorter than the prefix, returned whole.
        assert_eq!(truncate_key("日本語キー"), "日本語キー");
        // 10 chars: cut after 8 chars, not 8 bytes.
        assert_eq!(truncate_key("あいうえおかきくけこ"), "あいうえおかきく");
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let clone = cache.clone();
        cache.put("sess-1", completion("shared"));
        assert_eq!(clone.get("sess-1").unwrap().text(), Some("shared"));
    }
}
