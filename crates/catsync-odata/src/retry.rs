//! Retry with exponential back-off and jitter for OData requests.

use std::future::Future;
use std::time::Duration;

use crate::error::ODataError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** 429, 5xx, network timeouts and connection failures.
///
/// **Not retriable:** auth failures, unknown entity sets, other 4xx, bodies
/// that do not parse, and the pagination guard.
pub(crate) fn is_retriable(err: &ODataError) -> bool {
    match err {
        ODataError::Http(e) => e.is_timeout() || e.is_connect(),
        ODataError::RateLimited { .. } => true,
        ODataError::UnexpectedStatus { status, .. } => *status >= 500,
        ODataError::Deserialize { .. }
        | ODataError::Unauthorized { .. }
        | ODataError::NotFound { .. }
        | ODataError::PaginationLimit { .. }
        | ODataError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// The wait before retry `n` is `backoff_base_secs * 2^(n-1)` seconds
/// ± 25 % jitter, capped at 60 s. A 429 with a longer `Retry-After` waits
/// for that instead.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ODataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ODataError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_secs
                    .saturating_mul(1000)
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let delay_ms = match &err {
                    ODataError::RateLimited { retry_after_secs } => {
                        jittered.max(retry_after_secs.saturating_mul(1000).min(MAX_DELAY_MS))
                    }
                    _ => jittered,
                };
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "OData transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn server_error() -> ODataError {
        ODataError::UnexpectedStatus {
            status: 503,
            url: "http://erp.test/odata".to_owned(),
        }
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&server_error()));
        assert!(is_retriable(&ODataError::RateLimited {
            retry_after_secs: 0
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&ODataError::UnexpectedStatus {
            status: 400,
            url: "http://erp.test".to_owned(),
        }));
        assert!(!is_retriable(&ODataError::Unauthorized {
            url: "http://erp.test".to_owned(),
        }));
        assert!(!is_retriable(&ODataError::NotFound {
            entity_set: "Catalog_X".to_owned(),
        }));
    }

    #[tokio::test]
    async fn retries_transient_error_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(server_error())
                } else {
                    Ok::<u32, ODataError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ODataError>(server_error())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ODataError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_unauthorized() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ODataError>(ODataError::Unauthorized {
                    url: "http://erp.test".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ODataError::Unauthorized { .. })));
    }
}
