use super::RepoName;

/// Primary per-repository statistics from one upstream lookup.
///
/// `open_issues` is still GitHub's combined counter at this point: it
/// includes open pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStats {
    pub name: RepoName,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: i64,
    pub archived: bool,
}

/// Reconciled statistics, ready for exposition. `open_issues` has had
/// the pull-request count subtracted out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMetrics {
    pub name: RepoName,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: i64,
    pub open_pull_requests: u64,
    pub archived: bool,
}

/// Merge the primary stats with the open pull-request count.
///
/// Eventually-consistent upstream data can push the corrected count
/// negative (more open PRs than the combined counter admits); that is
/// passed through as-is rather than clamped or rejected.
pub fn reconcile(raw: RepoStats, open_pull_requests: u64) -> RepoMetrics {
    let pulls = i64::try_from(open_pull_requests).unwrap_or(i64::MAX);
    RepoMetrics {
        name: raw.name,
        stars: raw.stars,
        forks: raw.forks,
        open_issues: raw.open_issues.saturating_sub(pulls),
        open_pull_requests,
        archived: raw.archived,
    }
}
