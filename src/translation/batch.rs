/*!
 * Batched concurrent execution.
 *
 * This module contains the generic fan-out executor used by every pipeline
 * stage: items run in fixed-size concurrency batches, each batch settles
 * before the next starts, and an optional pacing delay separates batches.
 */

use std::future::Future;
use std::time::Duration;
use futures::future::join_all;
use log::debug;
use tokio::time::sleep;

/// Fixed-size batch executor with ordered results.
///
/// The batch size bounds the number of operations in flight at once, which is
/// the sole admission control against rate-limited backends; the inter-batch
/// delay adds deliberate pacing on top. A batch size of 1 degenerates to
/// strict sequential processing.
pub struct BatchRunner {
    /// Maximum number of operations in flight at once
    batch_size: usize,

    /// Pause between consecutive batches
    inter_batch_delay: Duration,
}

impl BatchRunner {
    /// Create a new runner
    pub fn new(batch_size: usize, inter_batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            inter_batch_delay,
        }
    }

    /// Run `operation` over every item, at most `batch_size` concurrently.
    ///
    /// The output vector is index-aligned with the input: results are
    /// collected per batch in launch order, never in completion order, so
    /// the i-th result always belongs to the i-th item. Every item gets its
    /// own `Result`, leaving failure isolation to the caller.
    pub async fn run<T, R, E, F, Fut>(&self, items: Vec<T>, operation: F) -> Vec<Result<R, E>>
    where
        F: Fn(usize, T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let total = items.len();
        let total_batches = total.div_ceil(self.batch_size);
        let mut results = Vec::with_capacity(total);

        let mut iter = items.into_iter().enumerate();
        let mut batch_index = 0;

        loop {
            let batch: Vec<(usize, T)> = iter.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            batch_index += 1;

            debug!("Processing batch {} of {}", batch_index, total_batches);

            // join_all yields results in the order the futures were given,
            // regardless of completion order
            let batch_results = join_all(
                batch.into_iter().map(|(index, item)| operation(index, item)),
            )
            .await;
            results.extend(batch_results);

            if results.len() < total && !self.inter_batch_delay.is_zero() {
                sleep(self.inter_batch_delay).await;
            }
        }

        results
    }
}
