//! Ordered "first success wins" combinator.

use std::future::Future;

/// Every candidate failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Number of candidates tried.
    pub attempts: usize,
    /// Failure of the last candidate, `None` when there were no candidates.
    pub last: Option<E>,
}

/// Try `attempt` on each candidate in order, strictly sequentially, and
/// return the first success. Later candidates are never touched once one
/// succeeds.
pub async fn first_success<I, F, Fut, T, E>(
    candidates: I,
    mut attempt: F,
) -> Result<T, Exhausted<E>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;
    let mut last = None;
    for candidate in candidates {
        attempts += 1;
        match attempt(candidate).await {
            Ok(value) => return Ok(value),
            Err(e) => last = Some(e),
        }
    }
    Err(Exhausted { attempts, last })
}
