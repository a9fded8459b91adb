// Wire types for the subset of the GitHub REST API hubstat consumes.

use serde::Deserialize;

/// A repository as returned by `GET /repos/{owner}/{repo}` and
/// `GET /users/{user}/repos`. Only the statistics hubstat exports
/// are deserialized; everything else in the payload is ignored.
///
/// `open_issues_count` is GitHub's combined counter: it includes open
/// pull requests. The core subtracts the PR count during reconciliation.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: i64,
    #[serde(default)]
    pub archived: bool,
}

/// A pull request from `GET /repos/{owner}/{repo}/pulls`.
///
/// Only the number is kept -- the client just counts entries per page.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
}

/// GitHub's error response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
