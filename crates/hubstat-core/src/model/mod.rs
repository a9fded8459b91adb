// Domain model: repository identity and per-repository statistics.

mod repo;
mod stats;

pub use repo::RepoName;
pub use stats::{RepoMetrics, RepoStats, reconcile};
