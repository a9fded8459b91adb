// ── Aggregator ──
//
// The refresh pipeline: resolve unique names, fan out the primary
// stats lookups, drop archived repositories before the pull-request
// fetch, fan out the PR counts, reconcile. Any failure is terminal for
// the cycle; the cache keeps serving the previous snapshot instead.

mod dedup;
mod parallel;

use tracing::debug;

use crate::error::CoreError;
use crate::model::{RepoMetrics, reconcile};
use crate::source::RepoSource;

/// Orchestrates one refresh cycle end to end. Sole entry point invoked
/// by the snapshot cache.
pub struct Aggregator<S> {
    source: S,
    users: Vec<String>,
    repos: Vec<String>,
    include_archived: bool,
}

impl<S: RepoSource> Aggregator<S> {
    pub fn new(source: S, users: Vec<String>, repos: Vec<String>, include_archived: bool) -> Self {
        Self {
            source,
            users,
            repos,
            include_archived,
        }
    }

    /// Run one full refresh cycle, returning reconciled statistics for
    /// every surviving repository.
    pub async fn collect(&self) -> Result<Vec<RepoMetrics>, CoreError> {
        let names = dedup::unique_repo_names(&self.source, &self.users, &self.repos).await?;
        debug!(count = names.len(), "resolved unique repositories");

        let raw = parallel::run_all(names.into_iter().map(|name| {
            let source = &self.source;
            async move {
                source
                    .repo_stats(&name)
                    .await
                    .map_err(|err| CoreError::RepoStats {
                        repo: name.to_string(),
                        source: err,
                    })
            }
        }))
        .await?;

        // Archived repositories drop out before the PR fetch so no
        // secondary calls are spent on them.
        let survivors = raw
            .into_iter()
            .filter(|stats| self.include_archived || !stats.archived);

        let metrics = parallel::run_all(survivors.map(|stats| {
            let source = &self.source;
            async move {
                let pulls =
                    source
                        .pull_request_count(&stats.name)
                        .await
                        .map_err(|err| CoreError::PullRequests {
                            repo: stats.name.to_string(),
                            source: err,
                        })?;
                Ok(reconcile(stats, pulls))
            }
        }))
        .await?;

        Ok(metrics)
    }
}
