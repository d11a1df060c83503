//! Retry logic for upstream API calls.
//!
//! # Responsibilities
//! - Decide whether a failed upstream call may be repeated
//! - Execute retries with exponential backoff + jitter
//! - Honor `Retry-After` on rate limiting
//!
//! # Design Decisions
//! - Rate limiting (429) and connection failures are always retryable: the
//!   upstream never processed the request
//! - 5xx and timeouts are retried only for idempotent calls, so a page is
//!   never created twice
//! - Malformed model output is not a transport failure and is never retried

use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Instant;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::{calculate_backoff, retry_after};

/// How a request failed before any response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Timeout,
    Other,
}

impl TransportFailure {
    fn of(error: &reqwest::Error) -> Self {
        if error.is_connect() {
            Self::Connect
        } else if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Other
        }
    }
}

/// Whether an outcome may be retried.
pub fn is_retryable(
    idempotent: bool,
    status: Option<StatusCode>,
    failure: Option<TransportFailure>,
) -> bool {
    match (status, failure) {
        (_, Some(TransportFailure::Connect)) => true,
        (_, Some(TransportFailure::Timeout)) => idempotent,
        (_, Some(TransportFailure::Other)) => false,
        (Some(StatusCode::TOO_MANY_REQUESTS), None) => true,
        (Some(status), None) => {
            idempotent
                && matches!(
                    status,
                    StatusCode::INTERNAL_SERVER_ERROR
                        | StatusCode::BAD_GATEWAY
                        | StatusCode::SERVICE_UNAVAILABLE
                        | StatusCode::GATEWAY_TIMEOUT
                )
        }
        (None, None) => false,
    }
}

/// Send a request, rebuilding and resending it while the outcome is
/// retryable and attempts remain.
///
/// The final response is returned whatever its status; callers decode
/// upstream errors themselves.
pub async fn send_with_retry<F>(
    config: &RetryConfig,
    upstream: &'static str,
    idempotent: bool,
    mut build: F,
) -> Result<Response, reqwest::Error>
where
    F: FnMut() -> RequestBuilder,
{
    let max_attempts = if config.enabled {
        config.max_attempts.max(1)
    } else {
        1
    };
    let mut attempt = 0;

    loop {
        attempt += 1;
        let start = Instant::now();

        match build().send().await {
            Ok(response) => {
                let status = response.status();
                metrics::record_upstream(upstream, status.as_u16(), start);

                if attempt < max_attempts && is_retryable(idempotent, Some(status), None) {
                    let delay = retry_after(response.headers(), config.max_delay_ms).unwrap_or_else(
                        || calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms),
                    );
                    tracing::info!(upstream, attempt, delay = ?delay, status = %status, "Retrying upstream request");
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Ok(response);
            }
            Err(e) => {
                metrics::record_upstream(upstream, 0, start);
                let failure = TransportFailure::of(&e);
                tracing::warn!(upstream, attempt, error = %e, "Upstream request failed");

                if attempt < max_attempts && is_retryable(idempotent, None, Some(failure)) {
                    let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                    tracing::info!(upstream, attempt, delay = ?delay, "Retrying after network error");
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(e);
            }
        }
    }
}
