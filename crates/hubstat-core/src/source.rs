// ── Upstream capability ──
//
// `RepoSource` is the seam between the engine and the wire client.
// Each operation resolves pagination internally and returns a complete
// result in one logical call. Outbound concurrency limiting is the
// transport's concern (the reqwest connection pool); the engine fans
// out one logical task per repository and nothing more.

use std::future::Future;
use std::sync::Arc;

use hubstat_api::{Error as ApiError, GitHubClient};

use crate::model::{RepoName, RepoStats};

/// Source of truth for repository statistics.
pub trait RepoSource: Send + Sync {
    /// Full list of repositories owned by `user`, across all pages.
    fn user_repos(
        &self,
        user: &str,
    ) -> impl Future<Output = Result<Vec<RepoName>, ApiError>> + Send;

    /// Primary statistics for a single repository.
    fn repo_stats(
        &self,
        name: &RepoName,
    ) -> impl Future<Output = Result<RepoStats, ApiError>> + Send;

    /// Open pull requests for a repository, totalled across all pages.
    fn pull_request_count(
        &self,
        name: &RepoName,
    ) -> impl Future<Output = Result<u64, ApiError>> + Send;
}

impl RepoSource for GitHubClient {
    async fn user_repos(&self, user: &str) -> Result<Vec<RepoName>, ApiError> {
        let repos = self.list_user_repos(user).await?;
        repos
            .into_iter()
            .map(|repo| parse_full_name(&repo.full_name))
            .collect()
    }

    async fn repo_stats(&self, name: &RepoName) -> Result<RepoStats, ApiError> {
        let repo = self.get_repo(name.owner(), name.name()).await?;
        Ok(RepoStats {
            name: name.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            archived: repo.archived,
        })
    }

    async fn pull_request_count(&self, name: &RepoName) -> Result<u64, ApiError> {
        self.open_pull_request_count(name.owner(), name.name())
            .await
    }
}

// Shared sources (tests, the server) hand out Arc clones.
impl<S: RepoSource> RepoSource for Arc<S> {
    async fn user_repos(&self, user: &str) -> Result<Vec<RepoName>, ApiError> {
        self.as_ref().user_repos(user).await
    }

    async fn repo_stats(&self, name: &RepoName) -> Result<RepoStats, ApiError> {
        self.as_ref().repo_stats(name).await
    }

    async fn pull_request_count(&self, name: &RepoName) -> Result<u64, ApiError> {
        self.as_ref().pull_request_count(name).await
    }
}

/// A full name straight off the wire that doesn't split cleanly is a
/// payload problem, not a configuration error.
fn parse_full_name(full_name: &str) -> Result<RepoName, ApiError> {
    full_name.parse().map_err(|_| ApiError::Deserialization {
        message: format!("unexpected repository full_name {full_name:?}"),
        body: String::new(),
    })
}
