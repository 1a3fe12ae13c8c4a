//! Time-bounded cache of fetched posts
//!
//! Each slug holds the last post fetched for it and when it was fetched. A
//! request inside the revalidation window is served from the entry. The first
//! request after the window is still served the stale entry, and a single
//! background re-fetch replaces it (or evicts it when the post is gone). A
//! failed re-fetch keeps the stale entry so the next request tries again.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::fetch::{fetch_post, PageOutcome};
use crate::client::{ClientError, ContentStore};
use crate::content::Post;

/// A cached post and its fetch time
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub post: Post,
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// Whether the entry may still be served at `now`
    pub fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < window
    }
}

#[derive(Debug)]
struct Shared {
    window: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Slugs with a background re-fetch in flight
    revalidating: Mutex<HashSet<String>>,
}

/// Per-slug post cache with a fixed revalidation window
///
/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone)]
pub struct PostCache {
    shared: Arc<Shared>,
}

impl PostCache {
    pub fn new(window: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                window,
                entries: RwLock::new(HashMap::new()),
                revalidating: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Serve `slug` from the cache, fetching when missing
    pub async fn get_or_fetch(
        &self,
        store: &Arc<dyn ContentStore>,
        slug: &str,
    ) -> Result<PageOutcome, ClientError> {
        self.get_or_fetch_at(store, slug, Instant::now()).await
    }

    /// Same as [`get_or_fetch`](Self::get_or_fetch) with an explicit clock
    ///
    /// A stale entry is returned immediately and revalidated in a spawned
    /// task, so this must run inside a tokio runtime.
    pub async fn get_or_fetch_at(
        &self,
        store: &Arc<dyn ContentStore>,
        slug: &str,
        now: Instant,
    ) -> Result<PageOutcome, ClientError> {
        let stale = {
            let entries = self.shared.entries.read().await;
            match entries.get(slug) {
                Some(entry) if entry.is_fresh(now, self.shared.window) => {
                    return Ok(PageOutcome::Found(entry.post.clone()));
                }
                Some(entry) => Some(entry.post.clone()),
                None => None,
            }
        };

        if let Some(post) = stale {
            self.spawn_revalidate(store, slug, now);
            return Ok(PageOutcome::Found(post));
        }

        let outcome = fetch_post(store.as_ref(), slug).await?;
        if let PageOutcome::Found(post) = &outcome {
            self.insert(slug, post.clone(), now).await;
        }
        Ok(outcome)
    }

    /// Whether a background re-fetch of `slug` is still running
    pub fn is_revalidating(&self, slug: &str) -> bool {
        self.in_flight().contains(slug)
    }

    fn in_flight(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.shared
            .revalidating
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start one re-fetch of `slug` unless one is already running
    fn spawn_revalidate(&self, store: &Arc<dyn ContentStore>, slug: &str, now: Instant) {
        if !self.in_flight().insert(slug.to_string()) {
            tracing::debug!("Revalidation of {:?} already in flight", slug);
            return;
        }

        let cache = self.clone();
        let store = Arc::clone(store);
        let slug = slug.to_string();
        tokio::spawn(async move {
            cache.revalidate(store.as_ref(), &slug, now).await;
            cache.in_flight().remove(&slug);
        });
    }

    async fn revalidate(&self, store: &dyn ContentStore, slug: &str, now: Instant) {
        match fetch_post(store, slug).await {
            Ok(PageOutcome::Found(post)) => {
                tracing::debug!("Revalidated {:?}", slug);
                self.insert(slug, post, now).await;
            }
            Ok(PageOutcome::NotFound) => {
                if self.shared.entries.write().await.remove(slug).is_some() {
                    tracing::info!("Post {:?} no longer exists, evicted", slug);
                }
            }
            Err(e) => {
                tracing::warn!("Revalidating {:?} failed, keeping stale post: {}", slug, e);
            }
        }
    }

    /// Store a post fetched at `now`
    pub async fn insert(&self, slug: &str, post: Post, now: Instant) {
        self.shared.entries.write().await.insert(
            slug.to_string(),
            CacheEntry {
                post,
                fetched_at: now,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.shared.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryStore;

    const WINDOW: Duration = Duration::from_secs(60);

    fn stores(posts: &[(&str, &str, &str)]) -> (Arc<MemoryStore>, Arc<dyn ContentStore>) {
        let store = Arc::new(MemoryStore::with_posts(posts));
        let shared: Arc<dyn ContentStore> = store.clone();
        (store, shared)
    }

    async fn settle(cache: &PostCache, slug: &str) {
        while cache.is_revalidating(slug) {
            tokio::task::yield_now().await;
        }
    }

    fn title(outcome: PageOutcome) -> String {
        match outcome {
            PageOutcome::Found(post) => post.title,
            PageOutcome::NotFound => panic!("expected post"),
        }
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_fetch() {
        let (store, shared) = stores(&[("p1", "hello", "Hello")]);
        let cache = PostCache::new(WINDOW);
        let start = Instant::now();

        cache.get_or_fetch_at(&shared, "hello", start).await.unwrap();
        store.set_title("p1", "Edited");
        let outcome = cache
            .get_or_fetch_at(&shared, "hello", start + Duration::from_secs(59))
            .await
            .unwrap();

        assert_eq!(title(outcome), "Hello");
        assert_eq!(store.fetch_count(), 1);
        assert!(!cache.is_revalidating("hello"));
    }

    #[tokio::test]
    async fn test_stale_entry_is_served_then_replaced() {
        let (store, shared) = stores(&[("p1", "hello", "Hello")]);
        let cache = PostCache::new(WINDOW);
        let start = Instant::now();

        cache.get_or_fetch_at(&shared, "hello", start).await.unwrap();
        store.set_title("p1", "Edited");

        let stale = cache
            .get_or_fetch_at(&shared, "hello", start + WINDOW)
            .await
            .unwrap();
        assert_eq!(title(stale), "Hello");

        settle(&cache, "hello").await;
        let fresh = cache
            .get_or_fetch_at(&shared, "hello", start + WINDOW + Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(title(fresh), "Edited");
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_one_revalidation_per_slug() {
        let (store, shared) = stores(&[("p1", "hello", "Hello")]);
        let cache = PostCache::new(WINDOW);
        let start = Instant::now();

        cache.get_or_fetch_at(&shared, "hello", start).await.unwrap();
        for _ in 0..3 {
            let outcome = cache
                .get_or_fetch_at(&shared, "hello", start + WINDOW)
                .await
                .unwrap();
            assert_eq!(title(outcome), "Hello");
        }

        settle(&cache, "hello").await;
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_entry_survives_read_failure() {
        let (store, shared) = stores(&[("p1", "hello", "Hello")]);
        let cache = PostCache::new(WINDOW);
        let start = Instant::now();

        cache.get_or_fetch_at(&shared, "hello", start).await.unwrap();
        store.fail_reads(true);
        let later = start + Duration::from_secs(120);
        assert_eq!(
            title(cache.get_or_fetch_at(&shared, "hello", later).await.unwrap()),
            "Hello"
        );

        settle(&cache, "hello").await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(
            title(cache.get_or_fetch_at(&shared, "hello", later).await.unwrap()),
            "Hello"
        );
    }

    #[tokio::test]
    async fn test_read_failure_without_entry_is_an_error() {
        let (store, shared) = stores(&[("p1", "hello", "Hello")]);
        store.fail_reads(true);
        let cache = PostCache::new(WINDOW);
        assert!(cache.get_or_fetch(&shared, "hello").await.is_err());
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let (store, shared) = stores(&[("p1", "hello", "Hello")]);
        let cache = PostCache::new(WINDOW);

        assert!(!cache.get_or_fetch(&shared, "nope").await.unwrap().is_found());
        assert!(!cache.get_or_fetch(&shared, "nope").await.unwrap().is_found());
        assert_eq!(store.fetch_count(), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_deleted_post_is_evicted() {
        let (store, shared) = stores(&[("p1", "hello", "Hello")]);
        let cache = PostCache::new(WINDOW);
        let start = Instant::now();

        cache.get_or_fetch_at(&shared, "hello", start).await.unwrap();
        assert_eq!(cache.len().await, 1);

        store.remove("p1");
        let stale = cache
            .get_or_fetch_at(&shared, "hello", start + WINDOW)
            .await
            .unwrap();
        assert!(stale.is_found());

        settle(&cache, "hello").await;
        assert!(cache.is_empty().await);
        let gone = cache
            .get_or_fetch_at(&shared, "hello", start + WINDOW)
            .await
            .unwrap();
        assert!(!gone.is_found());
    }

    #[test]
    fn test_entry_freshness() {
        let store_post: Post = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "_createdAt": "2022-03-01T10:00:00Z"
        }))
        .unwrap();
        let start = Instant::now();
        let entry = CacheEntry {
            post: store_post,
            fetched_at: start,
        };
        assert!(entry.is_fresh(start, WINDOW));
        assert!(entry.is_fresh(start + Duration::from_secs(59), WINDOW));
        assert!(!entry.is_fresh(start + WINDOW, WINDOW));
    }
}
