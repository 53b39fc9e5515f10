use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::article::ArticleStore;
use crate::Result;

/// Events emitted by the refresh service to notify the UI of changes
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// The summary cache was refreshed; UI should reload its list
    SummariesRefreshed { count: usize },
    /// A background refresh failed; the cached list is unchanged
    RefreshFailed { message: String },
}

/// Periodic bypass-refresh of the summary cache.
///
/// Runs until the shutdown signal flips; the interval timer lives inside
/// [`run`](Self::run) and cannot outlive it.
pub struct RefreshService {
    store: Arc<ArticleStore>,
    interval: Duration,
    event_tx: Option<mpsc::UnboundedSender<RefreshEvent>>,
}

impl RefreshService {
    pub fn new(store: Arc<ArticleStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            event_tx: None,
        }
    }

    /// Set the event sender for UI notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<RefreshEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn send_event(&self, event: RefreshEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send refresh event: receiver dropped");
            }
        }
    }

    /// Run periodic refreshes until the shutdown signal
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if self.interval.is_zero() {
            info!("Background refresh disabled (refresh_interval_secs = 0)");
            let _ = shutdown.changed().await;
            return;
        }

        info!("Background refresh started: every {:?}", self.interval);

        let mut interval = tokio::time::interval(self.interval);
        // Skip the first tick (fires immediately)
        interval.tick().await;

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_ok() && *shutdown.borrow() {
                        info!("Refresh service received shutdown signal");
                        break;
                    }
                }

                _ = interval.tick() => {
                    debug!("Running scheduled summary refresh");
                    match self.refresh_now().await {
                        Ok(count) => {
                            debug!("Scheduled refresh: {} summaries", count);
                        }
                        Err(e) => {
                            warn!("Scheduled refresh failed: {}", e);
                        }
                    }
                }
            }
        }

        info!("Refresh service stopped");
    }

    /// Run a single bypass refresh immediately
    pub async fn refresh_now(&self) -> Result<usize> {
        match self.store.list_summaries(true).await {
            Ok(summaries) => {
                let count = summaries.len();
                self.send_event(RefreshEvent::SummariesRefreshed { count });
                Ok(count)
            }
            Err(e) => {
                self.send_event(RefreshEvent::RefreshFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{Article, ArticleSource, ArticleSummary};
    use crate::storage::Database;
    use crate::Error;
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::time::timeout;

    struct SingleArticleSource;

    #[async_trait]
    impl ArticleSource for SingleArticleSource {
        async fn fetch_summaries(&self) -> crate::Result<Vec<ArticleSummary>> {
            Ok(vec![ArticleSummary {
                id: "only-post".to_string(),
                title: "Only Post".to_string(),
                date: Utc::now(),
            }])
        }

        async fn fetch_article(&self, id: &str) -> crate::Result<Article> {
            Err(Error::ArticleNotFound(id.to_string()))
        }
    }

    async fn test_store() -> Arc<ArticleStore> {
        let db = Arc::new(Database::new_in_memory().await.unwrap());
        Arc::new(
            ArticleStore::open(
                Box::new(SingleArticleSource),
                db,
                Duration::from_secs(300),
            )
            .await,
        )
    }

    #[tokio::test]
    async fn test_disabled_service_exits_on_shutdown() {
        let store = test_store().await;
        let service = RefreshService::new(store, Duration::ZERO);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        shutdown_tx.send(true).unwrap();

        timeout(Duration::from_secs(1), service.run(shutdown_rx))
            .await
            .expect("service did not exit on shutdown");
    }

    #[tokio::test]
    async fn test_refresh_now_reports_over_the_event_channel() {
        let store = test_store().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service =
            RefreshService::new(store, Duration::from_secs(300)).with_event_sender(tx);

        let count = service.refresh_now().await.unwrap();
        assert_eq!(count, 1);

        match rx.recv().await.unwrap() {
            RefreshEvent::SummariesRefreshed { count } => assert_eq!(count, 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
