//! Time-bounded cache in front of the metadata providers.
//!
//! This is the only place provider errors are handled: every failure is
//! logged and replaced by the sentinel record (details) or `None`
//! (trailers), and that replacement is cached like a real answer.
//!
//! ## Locking
//! Each title gets its own async slot. A lookup holds the slot's lock while
//! it fetches, so a second request for the same title waits for the first
//! one instead of calling the provider again. Different titles never wait on
//! each other; the outer map lock is only held to find or create a slot.
//!
//! Slots are kept after their entry expires, so the maps hold one slot per
//! title ever looked up. Long-running callers bound them with
//! [`MetadataCache::evict_expired`].

use crate::provider::{MetadataProvider, TrailerProvider};
use crate::types::{MetadataRecord, TrailerRef};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How long a fetched value is served before the next lookup refetches it
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A cached value and when it was fetched
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() <= ttl
    }
}

type Slot<T> = Arc<Mutex<Option<CacheEntry<T>>>>;
type SlotMap<T> = Mutex<HashMap<String, Slot<T>>>;

/// Title-keyed cache of display metadata and trailers
pub struct MetadataCache {
    details: Arc<dyn MetadataProvider>,
    trailers: Arc<dyn TrailerProvider>,
    ttl: Duration,
    records: SlotMap<MetadataRecord>,
    trailer_refs: SlotMap<Option<TrailerRef>>,
}

impl MetadataCache {
    /// Create a cache with the default 24 hour window
    pub fn new(details: Arc<dyn MetadataProvider>, trailers: Arc<dyn TrailerProvider>) -> Self {
        Self::with_ttl(details, trailers, DEFAULT_TTL)
    }

    pub fn with_ttl(
        details: Arc<dyn MetadataProvider>,
        trailers: Arc<dyn TrailerProvider>,
        ttl: Duration,
    ) -> Self {
        Self {
            details,
            trailers,
            ttl,
            records: Mutex::new(HashMap::new()),
            trailer_refs: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Metadata for `title`. Never fails; provider errors give the sentinel record.
    pub async fn get(&self, title: &str) -> MetadataRecord {
        let slot = Self::slot(&self.records, title).await;
        self.cached(slot, title, async {
            match self.details.fetch_details(title).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        provider = self.details.name(),
                        error = %e,
                        "Details fetch failed for '{}', using placeholder",
                        title
                    );
                    MetadataRecord::unavailable()
                }
            }
        })
        .await
    }

    /// Trailer for `title`, or `None` on failure or no result
    pub async fn get_trailer(&self, title: &str) -> Option<TrailerRef> {
        let slot = Self::slot(&self.trailer_refs, title).await;
        self.cached(slot, title, async {
            match self.trailers.search_trailer(title).await {
                Ok(trailer) => trailer,
                Err(e) => {
                    warn!(
                        provider = self.trailers.name(),
                        error = %e,
                        "Trailer search failed for '{}'",
                        title
                    );
                    None
                }
            }
        })
        .await
    }

    /// True if `title` has a real poster (neither placeholder nor "N/A")
    pub async fn is_valid_poster(&self, title: &str) -> bool {
        self.get(title).await.has_poster()
    }

    /// Number of titles with a details slot
    pub async fn cached_titles(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Drop every slot whose entry has expired and which no lookup is using.
    /// Returns the number of slots removed across details and trailers.
    pub async fn evict_expired(&self) -> usize {
        let removed =
            Self::evict(&self.records, self.ttl).await + Self::evict(&self.trailer_refs, self.ttl).await;
        if removed > 0 {
            debug!("Evicted {} expired cache slots", removed);
        }
        removed
    }

    async fn evict<T>(map: &SlotMap<T>, ttl: Duration) -> usize {
        let mut map = map.lock().await;
        let before = map.len();
        map.retain(|_, slot| {
            // Someone holds the slot between lookup and lock
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(entry) => entry.as_ref().is_some_and(|e| e.is_fresh(ttl)),
                Err(_) => true,
            }
        });
        before - map.len()
    }

    /// Find or create the slot for `title`
    async fn slot<T>(map: &SlotMap<T>, title: &str) -> Slot<T> {
        let mut map = map.lock().await;
        Arc::clone(map.entry(title.to_string()).or_default())
    }

    /// Serve the slot's value if fresh, otherwise run `fetch` and store the result
    async fn cached<T, F>(&self, slot: Slot<T>, title: &str, fetch: F) -> T
    where
        T: Clone,
        F: Future<Output = T>,
    {
        let mut entry = slot.lock().await;
        if let Some(cached) = entry.as_ref().filter(|e| e.is_fresh(self.ttl)) {
            debug!("Cache hit for '{}'", title);
            return cached.value.clone();
        }

        debug!("Cache miss for '{}'", title);
        let value = fetch.await;
        *entry = Some(CacheEntry::new(value.clone()));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, ProviderResult};
    use crate::types::PLACEHOLDER_POSTER;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ============================================================================
    // Mock Providers
    // ============================================================================

    /// Returns a fixed record and counts calls
    #[derive(Default)]
    struct MockDetails {
        calls: AtomicUsize,
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait::async_trait]
    impl MetadataProvider for MockDetails {
        async fn fetch_details(&self, title: &str) -> ProviderResult<MetadataRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ProviderError::Status {
                    provider: "mock",
                    status: 503,
                });
            }
            let mut record = MetadataRecord::unavailable();
            record.poster = format!("https://img.example/{}.jpg", title);
            record.plot = format!("Plot of {}", title);
            Ok(record)
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    #[derive(Default)]
    struct MockTrailers {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TrailerProvider for MockTrailers {
        async fn search_trailer(&self, title: &str) -> ProviderResult<Option<TrailerRef>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::InvalidResponse {
                    provider: "mock",
                    reason: "garbage".to_string(),
                });
            }
            if title == "No Trailer" {
                return Ok(None);
            }
            Ok(Some(TrailerRef::new(format!("vid-{}", title.len()))))
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn build_cache(details: MockDetails, trailers: MockTrailers) -> (MetadataCache, Arc<MockDetails>, Arc<MockTrailers>) {
        let details = Arc::new(details);
        let trailers = Arc::new(trailers);
        let cache = MetadataCache::new(details.clone(), trailers.clone());
        (cache, details, trailers)
    }

    const HOUR: Duration = Duration::from_secs(60 * 60);

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_get_returns_provider_record() {
        let (cache, _, _) = build_cache(MockDetails::default(), MockTrailers::default());

        let record = cache.get("Up").await;
        assert_eq!(record.poster, "https://img.example/Up.jpg");
        assert_eq!(record.plot, "Plot of Up");
        assert!(cache.is_valid_poster("Up").await);
    }

    #[tokio::test]
    async fn test_failing_provider_gives_sentinel() {
        let details = MockDetails {
            fail: true,
            ..Default::default()
        };
        let (cache, _, _) = build_cache(details, MockTrailers::default());

        let record = cache.get("Up").await;
        assert!(record.is_unavailable());
        assert_eq!(record.poster, PLACEHOLDER_POSTER);
        assert!(!cache.is_valid_poster("Up").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_reuse_and_refetch() {
        let (cache, details, _) = build_cache(MockDetails::default(), MockTrailers::default());

        cache.get("Heat").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(23 * HOUR).await;
        cache.get("Heat").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 1, "23h old entry must be reused");

        tokio::time::advance(2 * HOUR).await;
        cache.get("Heat").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 2, "25h old entry must be refetched");
    }

    #[tokio::test]
    async fn test_failures_are_cached_too() {
        let details = MockDetails {
            fail: true,
            ..Default::default()
        };
        let (cache, details, _) = build_cache(details, MockTrailers::default());

        cache.get("Up").await;
        cache.is_valid_poster("Up").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_titles_are_cached_separately() {
        let (cache, details, _) = build_cache(MockDetails::default(), MockTrailers::default());

        cache.get("Up").await;
        cache.get("Heat").await;
        cache.get("Up").await;

        assert_eq!(details.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.cached_titles().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_fetch() {
        let details = MockDetails {
            delay: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        let (cache, details, _) = build_cache(details, MockTrailers::default());

        let (a, b, c) = tokio::join!(cache.get("Up"), cache.get("Up"), cache.get("Up"));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(details.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_trailer() {
        let (cache, _, trailers) = build_cache(MockDetails::default(), MockTrailers::default());

        assert_eq!(cache.get_trailer("Up").await, Some(TrailerRef::new("vid-2")));
        assert_eq!(cache.get_trailer("No Trailer").await, None);
        // Both answers cached, "no result" included
        cache.get_trailer("Up").await;
        cache.get_trailer("No Trailer").await;
        assert_eq!(trailers.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failing_trailer_provider_gives_none() {
        let trailers = MockTrailers {
            fail: true,
            ..Default::default()
        };
        let (cache, _, _) = build_cache(MockDetails::default(), trailers);
        assert_eq!(cache.get_trailer("Up").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_ttl() {
        let details = Arc::new(MockDetails::default());
        let cache = MetadataCache::with_ttl(
            details.clone(),
            Arc::new(MockTrailers::default()),
            Duration::from_secs(60),
        );
        assert_eq!(cache.ttl(), Duration::from_secs(60));

        cache.get("Up").await;
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.get("Up").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_expired_drops_only_stale_slots() {
        let (cache, details, trailers) = build_cache(MockDetails::default(), MockTrailers::default());

        cache.get("Up").await;
        cache.get_trailer("Up").await;
        tokio::time::advance(25 * HOUR).await;
        cache.get("Heat").await;

        // Up's details and trailer slots are stale, Heat is fresh
        assert_eq!(cache.evict_expired().await, 2);
        assert_eq!(cache.cached_titles().await, 1);
        assert_eq!(cache.evict_expired().await, 0);

        cache.get("Heat").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 2);
        cache.get("Up").await;
        cache.get_trailer("Up").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 3);
        assert_eq!(trailers.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_expired_keeps_slot_being_fetched() {
        let details = MockDetails {
            delay: Some(Duration::from_secs(10)),
            ..Default::default()
        };
        let (cache, details, _) = build_cache(details, MockTrailers::default());

        let (record, removed) = tokio::join!(cache.get("Up"), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cache.evict_expired().await
        });

        assert_eq!(removed, 0);
        assert!(record.has_poster());
        assert_eq!(cache.cached_titles().await, 1);
        cache.get("Up").await;
        assert_eq!(details.calls.load(Ordering::SeqCst), 1);
    }
}
