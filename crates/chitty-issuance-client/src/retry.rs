//! Retry with exponential backoff for issuance HTTP calls.
//!
//! Only connection failures are retried: the request never reached the
//! service, so resending it cannot issue a second identifier. Timeouts and
//! errors after the request was written are returned on the first failure,
//! as are non-2xx responses.

use std::time::Duration;

/// Maximum number of retry attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Send an HTTP request, retrying connection failures with backoff.
///
/// `f` is called up to `MAX_RETRIES + 1` times, and only again when the
/// previous attempt failed to connect.
pub(crate) async fn retry_send<F, Fut>(f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if e.is_connect() => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "issuance service unreachable, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
    f().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn retry_exhausts_all_attempts_on_connect_failure() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = call_count.clone();

        let result = retry_send(|| {
            let cc = cc.clone();
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                reqwest::Client::builder()
                    .timeout(Duration::from_millis(50))
                    .build()
                    .unwrap()
                    .get("http://127.0.0.1:1/")
                    .send()
                    .await
            }
        })
        .await;

        assert!(result.is_err(), "request to closed port must fail");
        assert_eq!(call_count.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn retry_gives_up_immediately_on_non_connect_failure() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = call_count.clone();

        // An unparseable URL fails in the builder, never at connect time.
        let result = retry_send(|| {
            let cc = cc.clone();
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                reqwest::Client::new().get("http://[::1").send().await
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
