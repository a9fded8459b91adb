// ── Snapshot cache ──
//
// Serves the last reconciled snapshot within its freshness window and
// runs a full synchronous refresh once it expires. The mutex is held
// across the whole check/refresh/store sequence: at most one refresh
// is ever in flight, and concurrent scrapes observe a fully settled
// outcome, never a half-updated snapshot.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::collect::Aggregator;
use crate::error::CoreError;
use crate::model::{RepoMetrics, RepoName};
use crate::source::RepoSource;

/// What one scrape gets back: the snapshot to expose (possibly stale,
/// possibly empty before the first successful refresh) and the refresh
/// error when the cycle behind this scrape failed.
#[derive(Debug)]
pub struct Scrape {
    pub stats: Arc<Vec<RepoMetrics>>,
    pub error: Option<CoreError>,
}

/// "Never populated" and "populated but maybe stale" are distinct
/// states; freshness is derived from `fetched_at`, never from a
/// sentinel timestamp.
enum CacheState {
    Empty,
    Populated {
        stats: Arc<Vec<RepoMetrics>>,
        fetched_at: Instant,
    },
}

/// Time-bounded cache over the aggregator, so a high-frequency scrape
/// never turns into a refetch storm. One explicitly owned instance per
/// exporter; there is no global state.
pub struct StatsCache<S> {
    aggregator: Aggregator<S>,
    lifetime: Duration,
    state: Mutex<CacheState>,
}

impl<S: RepoSource> StatsCache<S> {
    pub fn new(aggregator: Aggregator<S>, lifetime: Duration) -> Self {
        Self {
            aggregator,
            lifetime,
            state: Mutex::new(CacheState::Empty),
        }
    }

    /// Serve the cached snapshot, refreshing first if it has expired.
    ///
    /// A failed refresh leaves the cached data and its expiry
    /// untouched: the previous snapshot is returned alongside the
    /// error, and every subsequent call keeps retrying until a refresh
    /// succeeds.
    pub async fn get(&self) -> Scrape {
        let mut state = self.state.lock().await;

        if let CacheState::Populated { stats, fetched_at } = &*state {
            // The expiry instant itself is already stale.
            if fetched_at.elapsed() < self.lifetime {
                return Scrape {
                    stats: Arc::clone(stats),
                    error: None,
                };
            }
            debug!("snapshot expired; refreshing");
        }

        match self.aggregator.collect().await {
            Ok(metrics) => {
                let stats = Arc::new(dedup_by_name(metrics));
                debug!(count = stats.len(), "snapshot refreshed");
                *state = CacheState::Populated {
                    stats: Arc::clone(&stats),
                    fetched_at: Instant::now(),
                };
                Scrape { stats, error: None }
            }
            Err(error) => {
                warn!(%error, "refresh failed; serving previous snapshot");
                let stats = match &*state {
                    CacheState::Populated { stats, .. } => Arc::clone(stats),
                    CacheState::Empty => Arc::new(Vec::new()),
                };
                Scrape {
                    stats,
                    error: Some(error),
                }
            }
        }
    }
}

/// Defensive re-dedup before storing: upstream enumeration can surface
/// the same repository through two accounts within one cycle. First
/// occurrence wins.
fn dedup_by_name(metrics: Vec<RepoMetrics>) -> Vec<RepoMetrics> {
    let mut seen: HashSet<RepoName> = HashSet::with_capacity(metrics.len());
    metrics
        .into_iter()
        .filter(|m| seen.insert(m.name.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use tokio::time::advance;

    use super::*;
    use crate::model::RepoStats;
    use crate::model::reconcile;
    use crate::source::mock::MockSource;

    const LIFETIME: Duration = Duration::from_secs(300);

    fn cached(source: Arc<MockSource>, lifetime: Duration) -> StatsCache<Arc<MockSource>> {
        let aggregator = Aggregator::new(source, vec!["acct1".to_owned()], vec![], false);
        StatsCache::new(aggregator, lifetime)
    }

    fn source_with_one_repo() -> Arc<MockSource> {
        Arc::new(
            MockSource::new()
                .with_user("acct1", ["acct1/x"])
                .with_repo("acct1/x", 20, false, 5),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_snapshot_is_served_without_upstream_calls() {
        let source = source_with_one_repo();
        let cache = cached(Arc::clone(&source), LIFETIME);

        let first = cache.get().await;
        assert!(first.error.is_none());
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);

        advance(LIFETIME - Duration::from_secs(1)).await;

        let second = cache.get().await;
        assert!(Arc::ptr_eq(&first.stats, &second.stats));
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_instant_is_stale() {
        let source = source_with_one_repo();
        let cache = cached(Arc::clone(&source), LIFETIME);

        cache.get().await;
        advance(LIFETIME).await;
        cache.get().await;

        assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_stale_gets_trigger_one_refresh() {
        let source = Arc::new(
            MockSource::new()
                .with_user("acct1", ["acct1/x"])
                .with_repo("acct1/x", 20, false, 5)
                .with_delay(Duration::from_millis(50)),
        );
        let cache = Arc::new(cached(Arc::clone(&source), LIFETIME));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get().await })
            })
            .collect();

        for handle in handles {
            let scrape = handle.await.unwrap();
            assert!(scrape.error.is_none());
            assert_eq!(scrape.stats.len(), 1);
        }

        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_serves_previous_snapshot_and_keeps_retrying() {
        let source = source_with_one_repo();
        let cache = cached(Arc::clone(&source), LIFETIME);

        let first = cache.get().await;
        assert!(first.error.is_none());

        source.fail_pulls.store(true, Ordering::SeqCst);
        advance(LIFETIME).await;

        let failed = cache.get().await;
        assert!(failed.error.is_some());
        assert!(Arc::ptr_eq(&first.stats, &failed.stats));

        // Expiry was not reset: the very next call retries immediately.
        let failed_again = cache.get().await;
        assert!(failed_again.error.is_some());
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 3);

        source.fail_pulls.store(false, Ordering::SeqCst);
        let recovered = cache.get().await;
        assert!(recovered.error.is_none());
        assert!(!Arc::ptr_eq(&first.stats, &recovered.stats));
    }

    #[tokio::test(start_paused = true)]
    async fn first_run_failure_yields_empty_snapshot_with_error() {
        let source = source_with_one_repo();
        source.fail_users.store(true, Ordering::SeqCst);
        let cache = cached(Arc::clone(&source), LIFETIME);

        let scrape = cache.get().await;
        assert!(scrape.error.is_some());
        assert!(scrape.stats.is_empty());
    }

    #[test]
    fn dedup_by_name_keeps_first_occurrence() {
        let make = |full_name: &str, stars: u64| {
            reconcile(
                RepoStats {
                    name: full_name.parse().unwrap(),
                    stars,
                    forks: 0,
                    open_issues: 0,
                    archived: false,
                },
                0,
            )
        };

        let deduped = dedup_by_name(vec![
            make("acct1/x", 1),
            make("acct1/x", 2),
            make("other/z", 3),
        ]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].stars, 1);
    }
}
