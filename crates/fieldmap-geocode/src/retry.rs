//! Retry policy for geocoding requests.
//!
//! Only transient provider failures are retried. A geocode that still fails
//! after the last attempt is reported to the caller, which treats it as
//! "no match".

use std::future::Future;
use std::time::Duration;

use crate::error::GeocodeError;

const MAX_DELAY: Duration = Duration::from_secs(5);

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 5xx and HTTP 429.
///
/// **Not retriable:** other 4xx statuses, malformed bodies, out-of-range
/// coordinates and configuration errors.
pub(crate) fn is_retriable(err: &GeocodeError) -> bool {
    match err {
        GeocodeError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status().is_some_and(|s| {
                    s.is_server_error() || s == reqwest::StatusCode::TOO_MANY_REQUESTS
                })
        }
        GeocodeError::Deserialize { .. }
        | GeocodeError::InvalidBaseUrl { .. }
        | GeocodeError::InvalidCoordinate(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Extra attempts after the first request.
    pub(crate) max_retries: u32,
    pub(crate) backoff_base: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base: Duration::from_millis(backoff_base_ms),
        }
    }

    /// Nominal wait before retry number `retry` (1-based): the base doubled
    /// per earlier retry, capped at 5 s. Jitter is applied on top.
    pub(crate) fn nominal_delay(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(10);
        self.backoff_base.saturating_mul(factor).min(MAX_DELAY)
    }

    fn jittered_delay(&self, retry: u32) -> Duration {
        self.nominal_delay(retry).mul_f64(rand::random_range(0.75..=1.25))
    }

    /// Runs `request` for `query` until it succeeds, fails permanently, or
    /// the retries are spent.
    pub(crate) async fn run<T, F, Fut>(
        &self,
        query: &str,
        mut request: F,
    ) -> Result<T, GeocodeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeocodeError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retry >= self.max_retries || !is_retriable(&err) {
                return Err(err);
            }
            retry += 1;
            let delay = self.jittered_delay(retry);
            let status = match &err {
                GeocodeError::Http(e) => e.status().as_ref().map(reqwest::StatusCode::as_u16),
                _ => None,
            };
            tracing::warn!(
                query,
                retry,
                max_retries = self.max_retries,
                ?status,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "geocoding provider unavailable, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
