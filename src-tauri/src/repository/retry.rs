//! Compare-and-swap Retry
//!
//! Read-modify-write over any `DocumentStore` that only offers conditional
//! writes. Losers of a race back off with capped exponential delay plus jitter
//! before reading again.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};
use super::traits::{CountStep, DocumentStore};

/// Attempts before a contended update gives up
pub const MAX_CAS_ATTEMPTS: usize = 8;

const INITIAL_BACKOFF_MS: u64 = 10;
const MAX_BACKOFF_MS: u64 = 200;

/// Delay before retry number `retry_index` (1-based)
pub(crate) fn backoff_ms(retry_index: usize) -> u64 {
    let shift = retry_index.saturating_sub(1).min(20) as u32;
    let ceiling = INITIAL_BACKOFF_MS
        .saturating_mul(1u64.checked_shl(shift).unwrap_or(u64::MAX))
        .min(MAX_BACKOFF_MS);
    // Half fixed, half random
    let half = ceiling / 2;
    half + jitter(retry_index) % (ceiling - half + 1)
}

fn jitter(seed: usize) -> u64 {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_usize(seed);
    hasher.finish()
}

/// Apply `step` to the document's count with conditional writes.
///
/// Returns the count now stored, `None` if the document is absent afterwards.
pub async fn cas_update<S>(store: &S, id: &str, step: &CountStep) -> DomainResult<Option<i64>>
where
    S: DocumentStore + ?Sized,
{
    for attempt in 0..MAX_CAS_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(Duration::from_millis(backoff_ms(attempt))).await;
        }

        let current = store.get(id).await?;
        let next = step(current.as_ref().map(|doc| doc.count));
        if current.is_none() && next.is_none() {
            return Ok(None);
        }

        if store
            .compare_and_swap(id, current.as_ref().map(|doc| &doc.revision), next)
            .await?
        {
            return Ok(next);
        }
        log::debug!("update '{}' lost race (attempt {})", id, attempt + 1);
    }

    Err(DomainError::Conflict(format!(
        "'{}' was modified concurrently {} times in a row, try again",
        id, MAX_CAS_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_stays_within_bounds() {
        for retry in 1..=MAX_CAS_ATTEMPTS {
            let ceiling = (INITIAL_BACKOFF_MS << (retry - 1)).min(MAX_BACKOFF_MS);
            for _ in 0..50 {
                let ms = backoff_ms(retry);
                assert!(ms >= ceiling / 2 && ms <= ceiling, "retry {} -> {}ms", retry, ms);
            }
        }
    }

    #[test]
    fn test_backoff_is_capped() {
        assert!(backoff_ms(usize::MAX) <= MAX_BACKOFF_MS);
    }
}
