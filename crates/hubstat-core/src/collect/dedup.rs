// Account expansion and deduplication. Explicitly named repositories
// and those enumerated from users merge into one set keyed by full
// name, so a repository reachable both ways is fetched exactly once.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::CoreError;
use crate::model::RepoName;
use crate::source::RepoSource;

/// Resolve the configured users and explicit repository names into the
/// unique set of repositories to fetch this cycle.
///
/// Explicit names are parsed first -- a malformed name aborts the
/// cycle. Users are then enumerated one at a time, failing fast on the
/// first enumeration error; no partial result is returned for this
/// stage.
pub(crate) async fn unique_repo_names<S: RepoSource>(
    source: &S,
    users: &[String],
    explicit: &[String],
) -> Result<BTreeSet<RepoName>, CoreError> {
    let mut unique = BTreeSet::new();

    for raw in explicit {
        unique.insert(raw.parse::<RepoName>()?);
    }

    for user in users {
        let repos = source
            .user_repos(user)
            .await
            .map_err(|err| CoreError::UserRepos {
                user: user.clone(),
                source: err,
            })?;
        debug!(user = %user, count = repos.len(), "enumerated user repositories");
        unique.extend(repos);
    }

    Ok(unique)
}
