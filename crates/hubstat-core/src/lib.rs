// hubstat-core: stats aggregation and caching engine for the hubstat exporter.

pub mod cache;
pub mod collect;
pub mod error;
pub mod model;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{Scrape, StatsCache};
pub use collect::Aggregator;
pub use error::{AggregateError, CoreError};
pub use model::{RepoMetrics, RepoName, RepoStats, reconcile};
pub use source::RepoSource;
