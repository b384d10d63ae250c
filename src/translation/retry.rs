/*!
 * Bounded retry with fixed delay.
 *
 * Wraps the translation-call boundary only; chunking and path validation are
 * deterministic and never retried.
 */

use std::future::Future;
use std::time::Duration;
use log::{error, warn};
use tokio::time::sleep;

use crate::errors::TranslationError;

/// Run `operation` up to `max_attempts` times in total, waiting `delay`
/// between attempts. Each failed attempt is logged with its index; after the
/// final attempt the last error is returned tagged with the attempt count.
pub async fn with_retry<T, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    delay: Duration,
    label: &str,
) -> Result<T, TranslationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TranslationError>>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "{}: attempt {}/{} failed: {}. Retrying in {:?}...",
                    label, attempt, max_attempts, e, delay
                );
                sleep(delay).await;
            },
            Err(e) => {
                error!("{}: failed after {} attempts: {}", label, max_attempts, e);
                return Err(TranslationError::Exhausted {
                    attempts: max_attempts,
                    last_error: Box::new(e),
                });
            }
        }
    }

    unreachable!()
}
