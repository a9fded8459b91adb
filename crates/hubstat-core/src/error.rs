// ── Core error types ──
//
// Every refresh-cycle failure surfaces through `CoreError`. Transport
// failures from hubstat-api are wrapped with the repository or user
// they were fetched for; fan-out failures are joined into a single
// `AggregateError` carrying every error the cycle observed. There are
// no retries anywhere in this crate -- the scrape cadence itself,
// bounded by the cache lifetime, is the retry mechanism.

use std::fmt;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A repository name did not split into exactly `<owner>/<name>`.
    /// Permanent: retrying cannot fix configuration.
    #[error("invalid repository name {name:?}: expected <owner>/<name>")]
    MalformedName { name: String },

    /// Enumerating a user's repositories failed.
    #[error("list repositories for '{user}': {source}")]
    UserRepos {
        user: String,
        #[source]
        source: hubstat_api::Error,
    },

    /// The primary stats lookup for one repository failed.
    #[error("fetch stats for '{repo}': {source}")]
    RepoStats {
        repo: String,
        #[source]
        source: hubstat_api::Error,
    },

    /// The open pull-request count for one repository failed.
    #[error("count pull requests for '{repo}': {source}")]
    PullRequests {
        repo: String,
        #[source]
        source: hubstat_api::Error,
    },

    /// Join of every error observed by one fan-out invocation.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// All errors collected during one parallel fan-out.
///
/// Sibling tasks are never cancelled on failure, so a single cycle can
/// observe several independent errors; they are all retained here.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<CoreError>,
}

impl AggregateError {
    pub(crate) fn new(errors: Vec<CoreError>) -> Self {
        Self { errors }
    }

    /// Every individual error, in completion order.
    pub fn errors(&self) -> &[CoreError] {
        &self.errors
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fetches failed: ", self.errors.len())?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.errors
            .first()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_display_joins_all_errors() {
        let err = AggregateError::new(vec![
            CoreError::MalformedName { name: "bad".into() },
            CoreError::MalformedName {
                name: "worse".into(),
            },
        ]);

        let rendered = err.to_string();
        assert!(rendered.starts_with("2 fetches failed: "));
        assert!(rendered.contains("\"bad\""));
        assert!(rendered.contains("\"worse\""));
    }

    #[test]
    fn aggregate_source_is_first_error() {
        let err = AggregateError::new(vec![CoreError::MalformedName { name: "bad".into() }]);
        assert!(std::error::Error::source(&err).is_some());
    }
}
