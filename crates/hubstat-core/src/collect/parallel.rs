// ── Parallel fetcher ──
//
// Fan-out over independent fetch futures. Every task runs to
// completion -- a sibling failure never cancels the rest -- and all
// errors observed in one invocation are joined into one
// `AggregateError`. Any error fails the whole invocation: the partial
// successes are discarded, because an incomplete snapshot
// under-reports in a way a consumer cannot distinguish from zero.
//
// No concurrency cap here: one logical task per repository, with
// actual outbound parallelism bounded by the transport's connection
// pool.

use std::future::Future;

use futures_util::future::join_all;

use crate::error::{AggregateError, CoreError};

pub(crate) async fn run_all<T, F, I>(tasks: I) -> Result<Vec<T>, CoreError>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, CoreError>>,
{
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for result in join_all(tasks).await {
        match result {
            Ok(value) => values.push(value),
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(AggregateError::new(errors).into())
    }
}
