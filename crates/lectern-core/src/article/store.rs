use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use super::client::ArticleSource;
use super::models::{Article, ArticleSummary};
use crate::storage::{CacheRepository, Database};
use crate::{Error, Result};

struct SummaryCache {
    summaries: Vec<ArticleSummary>,
    refreshed_at: DateTime<Utc>,
}

/// Cached access layer over an [`ArticleSource`].
///
/// The most recent successful summary list is kept in memory and mirrored to
/// the database so a restart starts warm. A list call within the staleness
/// window is served from the cache without touching the source; `force_refresh`
/// bypasses the window. Fetch failures are surfaced as errors, never silently
/// mapped to an empty list — callers decide whether to fall back to
/// [`cached_summaries`](Self::cached_summaries).
pub struct ArticleStore {
    source: Box<dyn ArticleSource>,
    db: Arc<Database>,
    staleness: Duration,
    cache: RwLock<Option<SummaryCache>>,
    // Serializes refreshes so overlapping bypass requests collapse to one fetch
    refresh_lock: Mutex<()>,
}

impl ArticleStore {
    /// Create the store, warming the in-memory cache from the database.
    /// A corrupt or unreadable persisted cache degrades to a cold start.
    pub async fn open(
        source: Box<dyn ArticleSource>,
        db: Arc<Database>,
        staleness: Duration,
    ) -> Self {
        let store = Self {
            source,
            db,
            staleness,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        };

        match CacheRepository::new(&store.db).load().await {
            Ok(Some((summaries, refreshed_at))) => {
                tracing::debug!(
                    "Warm start: {} cached summaries, refreshed {}",
                    summaries.len(),
                    refreshed_at
                );
                *store.cache.write().await = Some(SummaryCache {
                    summaries,
                    refreshed_at,
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to load persisted summary cache: {}", e);
            }
        }

        store
    }

    /// Return article summaries, hitting the source only when the cache is
    /// absent, stale, or explicitly bypassed.
    pub async fn list_summaries(&self, force_refresh: bool) -> Result<Vec<ArticleSummary>> {
        if !force_refresh {
            if let Some(summaries) = self.fresh_cached().await {
                return Ok(summaries);
            }
        }

        let entered = Utc::now();
        let _guard = self.refresh_lock.lock().await;

        // Another caller may have completed a refresh while we waited for the
        // lock; their result is as fresh as ours would be
        {
            let cache = self.cache.read().await;
            if let Some(cache) = cache.as_ref() {
                if cache.refreshed_at >= entered {
                    return Ok(cache.summaries.clone());
                }
                if !force_refresh && self.is_fresh(cache.refreshed_at) {
                    return Ok(cache.summaries.clone());
                }
            }
        }

        let summaries = self.source.fetch_summaries().await?;
        warn_on_duplicate_ids(&summaries);

        let refreshed_at = Utc::now();
        if let Err(e) = CacheRepository::new(&self.db)
            .replace(&summaries, refreshed_at)
            .await
        {
            tracing::warn!("Failed to persist summary cache: {}", e);
        }

        *self.cache.write().await = Some(SummaryCache {
            summaries: summaries.clone(),
            refreshed_at,
        });

        Ok(summaries)
    }

    /// Fetch a single article. `Ok(None)` means the id does not exist;
    /// transport and parse failures are errors.
    pub async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        match self.source.fetch_article(id).await {
            Ok(article) => Ok(Some(article)),
            Err(Error::ArticleNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The last successfully fetched list, regardless of staleness
    pub async fn cached_summaries(&self) -> Option<Vec<ArticleSummary>> {
        let cache = self.cache.read().await;
        cache.as_ref().map(|c| c.summaries.clone())
    }

    /// When the cache was last refreshed
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        let cache = self.cache.read().await;
        cache.as_ref().map(|c| c.refreshed_at)
    }

    async fn fresh_cached(&self) -> Option<Vec<ArticleSummary>> {
        let cache = self.cache.read().await;
        let cache = cache.as_ref()?;
        if self.is_fresh(cache.refreshed_at) {
            Some(cache.summaries.clone())
        } else {
            None
        }
    }

    fn is_fresh(&self, refreshed_at: DateTime<Utc>) -> bool {
        match (Utc::now() - refreshed_at).to_std() {
            Ok(age) => age < self.staleness,
            // refreshed_at is in the future (clock adjustment); treat as fresh
            Err(_) => true,
        }
    }
}

/// Identifiers are unique within one fetch result; the source is trusted but
/// a violation is worth a trace
fn warn_on_duplicate_ids(summaries: &[ArticleSummary]) {
    let mut seen = HashSet::new();
    for summary in summaries {
        if !seen.insert(summary.id.as_str()) {
            tracing::warn!("Duplicate article id in list response: {}", summary.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::reading_time;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct MockSource {
        list_calls: AtomicUsize,
        article_calls: AtomicUsize,
        summaries: Vec<ArticleSummary>,
        fail_lists: AtomicBool,
        fetch_delay: Option<Duration>,
    }

    impl MockSource {
        fn new(summaries: Vec<ArticleSummary>) -> Self {
            Self {
                list_calls: AtomicUsize::new(0),
                article_calls: AtomicUsize::new(0),
                summaries,
                fail_lists: AtomicBool::new(false),
                fetch_delay: None,
            }
        }

        fn failing() -> Self {
            let source = Self::new(Vec::new());
            source.fail_lists.store(true, Ordering::SeqCst);
            source
        }
    }

    #[async_trait]
    impl ArticleSource for Arc<MockSource> {
        async fn fetch_summaries(&self) -> Result<Vec<ArticleSummary>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.fetch_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(Error::Api("HTTP 500 for URL: /articles".to_string()));
            }
            Ok(self.summaries.clone())
        }

        async fn fetch_article(&self, id: &str) -> Result<Article> {
            self.article_calls.fetch_add(1, Ordering::SeqCst);
            match id {
                "hello-world" => Ok(Article {
                    id: id.to_string(),
                    title: "Hello, World".to_string(),
                    content: "some body text".to_string(),
                    date: Utc::now(),
                    read_time: reading_time("some body text"),
                }),
                _ => Err(Error::ArticleNotFound(id.to_string())),
            }
        }
    }

    fn summaries() -> Vec<ArticleSummary> {
        vec![
            ArticleSummary {
                id: "hello-world".to_string(),
                title: "Hello, World".to_string(),
                date: Utc::now(),
            },
            ArticleSummary {
                id: "second-post".to_string(),
                title: "Second Post".to_string(),
                date: Utc::now(),
            },
        ]
    }

    async fn store_with(
        source: Arc<MockSource>,
        staleness: Duration,
    ) -> (ArticleStore, Arc<Database>) {
        let db = Arc::new(Database::new_in_memory().await.unwrap());
        let store = ArticleStore::open(Box::new(source), db.clone(), staleness).await;
        (store, db)
    }

    #[tokio::test]
    async fn test_fresh_cache_suppresses_second_fetch() {
        let source = Arc::new(MockSource::new(summaries()));
        let (store, _db) = store_with(source.clone(), Duration::from_secs(300)).await;

        let first = store.list_summaries(false).await.unwrap();
        let second = store.list_summaries(false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_fresh_cache() {
        let source = Arc::new(MockSource::new(summaries()));
        let (store, _db) = store_with(source.clone(), Duration::from_secs(300)).await;

        store.list_summaries(false).await.unwrap();
        store.list_summaries(true).await.unwrap();

        assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_cache_refetches() {
        let source = Arc::new(MockSource::new(summaries()));
        let (store, _db) = store_with(source.clone(), Duration::ZERO).await;

        store.list_summaries(false).await.unwrap();
        store.list_summaries(false).await.unwrap();

        assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persisted_cache_survives_restart() {
        let source = Arc::new(MockSource::new(summaries()));
        let db = Arc::new(Database::new_in_memory().await.unwrap());

        let store =
            ArticleStore::open(Box::new(source), db.clone(), Duration::from_secs(300)).await;
        let fetched = store.list_summaries(false).await.unwrap();
        drop(store);

        // A fresh store over the same database must serve the persisted list
        // without consulting its (broken) source
        let offline = Arc::new(MockSource::failing());
        let store =
            ArticleStore::open(Box::new(offline.clone()), db, Duration::from_secs(300)).await;

        let warm = store.list_summaries(false).await.unwrap();
        assert_eq!(warm, fetched);
        assert_eq!(offline.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error_not_an_empty_list() {
        let source = Arc::new(MockSource::failing());
        let (store, _db) = store_with(source, Duration::from_secs(300)).await;

        assert!(matches!(
            store.list_summaries(false).await,
            Err(Error::Api(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_cached_list_available() {
        let source = Arc::new(MockSource::new(summaries()));
        let (store, _db) = store_with(source.clone(), Duration::from_secs(300)).await;

        store.list_summaries(false).await.unwrap();

        source.fail_lists.store(true, Ordering::SeqCst);
        assert!(store.list_summaries(true).await.is_err());

        // The previous list stays available for the UI to fall back on
        let cached = store.cached_summaries().await.unwrap();
        assert_eq!(cached.len(), 2);
        assert!(store.last_refreshed().await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_force_refreshes_collapse_to_one_fetch() {
        let mut mock = MockSource::new(summaries());
        mock.fetch_delay = Some(Duration::from_millis(50));
        let source = Arc::new(mock);
        let (store, _db) = store_with(source.clone(), Duration::from_secs(300)).await;

        let (a, b) = tokio::join!(store.list_summaries(true), store.list_summaries(true));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_article_distinguishes_absent_from_found() {
        let source = Arc::new(MockSource::new(summaries()));
        let (store, _db) = store_with(source, Duration::from_secs(300)).await;

        let found = store.get_article("hello-world").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().read_time, 1);

        let missing = store.get_article("no-such-post").await.unwrap();
        assert!(missing.is_none());
    }
}
