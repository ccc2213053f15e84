//! Retry policy: transient-failure classification plus exponential
//! backoff with jitter
//!
//! The classifier is a pure predicate over the error and the attempt
//! count; the backoff strategy and the attempt cap are configured
//! separately through [`RetryConfig`].

use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::{Error, Result};

/// Service error codes reported for throttling responses. Newer services
/// report throttling as a 400-class error, so status alone is not enough.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottled",
    "RequestThrottledException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "ProvisionedThroughputExceededException",
    "BandwidthLimitExceeded",
    "SlowDown",
];

/// Service error codes caused by a client/server clock mismatch. The
/// transport recomputes its timestamp on the next attempt, so these are
/// worth retrying.
const CLOCK_SKEW_CODES: &[&str] = &[
    "RequestTimeTooSkewed",
    "RequestExpired",
    "RequestInTheFuture",
    "InvalidSignatureException",
];

/// Decide whether a failed request should be retried.
///
/// Checked in order, first match wins:
/// 1. transport faults (connection reset, timeout, dispatch failure)
/// 2. transient service errors (5xx)
/// 3. throttling responses
/// 4. clock-skew rejections
/// 5. everything else is terminal (4xx client errors, not-found,
///    configuration problems)
///
/// The attempt cap is enforced by [`retry_with_backoff`], not here.
pub fn should_retry(operation: &str, error: &Error, attempt: u32) -> bool {
    let retry = match error {
        Error::Transport(_) => true,
        Error::Service { status, code, .. } => {
            let code = code.as_deref().unwrap_or_default();
            if (500..600).contains(status) {
                true
            } else if *status == 429 || THROTTLING_CODES.contains(&code) {
                true
            } else {
                CLOCK_SKEW_CODES.contains(&code)
            }
        }
        Error::Config(_) | Error::Connection(_) | Error::NotFound(_) | Error::Io(_) => false,
    };

    tracing::info!(operation, attempt, error = %error, retry, "retry decision");
    retry
}

/// Retry a fallible async operation with exponential backoff
///
/// # Arguments
/// * `config` - Retry configuration (attempt cap, backoff bounds)
/// * `operation` - Async closure that returns `Result<T>`
/// * `is_retryable` - Predicate over the error and the attempt count
///
/// # Example
/// ```ignore
/// let result = retry_with_backoff(
///     &config,
///     || async { store.send_head_bucket(bucket).await },
///     |e, attempt| should_retry("HeadBucket", e, attempt),
/// ).await;
/// ```
pub async fn retry_with_backoff<T, F, Fut, R>(
    config: &RetryConfig,
    mut operation: F,
    is_retryable: R,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
    R: Fn(&Error, u32) -> bool,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= config.max_attempts || !is_retryable(&e, attempt) {
                    return Err(e);
                }

                let backoff = calculate_backoff(config, attempt);
                tracing::debug!(
                    attempt = attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "backing off before next attempt"
                );

                tokio::time::sleep(backoff).await;
            }
        }
    }
}

/// Calculate backoff duration with jitter
fn calculate_backoff(config: &RetryConfig, attempt: u32) -> Duration {
    // Exponential backoff: initial * 2^(attempt-1)
    let base_ms = config.initial_backoff_ms * (1u64 << (attempt - 1).min(10));
    let capped_ms = base_ms.min(config.max_backoff_ms);

    // Add jitter: random value between 0 and backoff
    let jitter_ms = rand_jitter(capped_ms);
    Duration::from_millis(capped_ms + jitter_ms)
}

/// Generate pseudo-random jitter without external RNG dependency
fn rand_jitter(max: u64) -> u64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    nanos % max.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_error(status: u16, code: Option<&str>) -> Error {
        Error::Service {
            status,
            code: code.map(str::to_string),
            request_id: Some("req-1".to_string()),
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_transport_faults_are_retryable() {
        assert!(should_retry(
            "GetObject",
            &Error::Transport("connection reset by peer".to_string()),
            1
        ));
        assert!(should_retry(
            "PutObject",
            &Error::Transport("request timed out".to_string()),
            2
        ));
    }

    #[test]
    fn test_transient_service_errors_are_retryable() {
        assert!(should_retry(
            "ListObjectsV2",
            &service_error(500, Some("InternalError")),
            1
        ));
        assert!(should_retry("ListObjectsV2", &service_error(503, None), 1));
    }

    #[test]
    fn test_throttling_is_retryable() {
        assert!(should_retry("PutObject", &service_error(503, Some("SlowDown")), 1));
        assert!(should_retry("PutObject", &service_error(400, Some("Throttling")), 1));
        assert!(should_retry("PutObject", &service_error(429, None), 1));
    }

    #[test]
    fn test_clock_skew_is_retryable() {
        assert!(should_retry(
            "CreateBucket",
            &service_error(403, Some("RequestTimeTooSkewed")),
            1
        ));
        assert!(should_retry(
            "CreateBucket",
            &service_error(400, Some("RequestExpired")),
            1
        ));
    }

    #[test]
    fn test_client_errors_are_terminal() {
        assert!(!should_retry("GetObject", &service_error(403, Some("AccessDenied")), 1));
        assert!(!should_retry(
            "GetObject",
            &service_error(400, Some("InvalidArgument")),
            1
        ));
        assert!(!should_retry(
            "GetObject",
            &Error::NotFound("bucket demo".to_string()),
            1
        ));
        assert!(!should_retry(
            "Connect",
            &Error::Config("empty access key".to_string()),
            1
        ));
        assert!(!should_retry(
            "Connect",
            &Error::Connection("bad endpoint".to_string()),
            1
        ));
        assert!(!should_retry(
            "Export",
            &Error::Io(std::io::Error::other("disk full")),
            1
        ));
    }

    #[test]
    fn test_calculate_backoff() {
        let config = RetryConfig {
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
        };

        // First attempt should have base backoff
        let b1 = calculate_backoff(&config, 1);
        assert!(b1.as_millis() >= 100 && b1.as_millis() < 200);

        // Second attempt doubles
        let b2 = calculate_backoff(&config, 2);
        assert!(b2.as_millis() >= 200 && b2.as_millis() < 400);

        // Third attempt quadruples
        let b3 = calculate_backoff(&config, 3);
        assert!(b3.as_millis() >= 400 && b3.as_millis() < 800);
    }

    #[test]
    fn test_backoff_cap() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_backoff_ms: 1000,
            max_backoff_ms: 5000,
        };

        // Even with many attempts, should not exceed max + jitter
        let b = calculate_backoff(&config, 10);
        assert!(b.as_millis() <= 10000);
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let config = RetryConfig::default();
        let mut calls = 0;

        let result = retry_with_backoff(
            &config,
            || {
                calls += 1;
                async { Ok::<_, Error>(42) }
            },
            |_, _| true,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_failure() {
        let config = RetryConfig {
            max_attempts: 3,
            initial_backoff_ms: 1, // Fast for tests
            max_backoff_ms: 10,
        };
        let call_count = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let call_count_clone = call_count.clone();

        let result = retry_with_backoff(
            &config,
            || {
                let cc = call_count_clone.clone();
                async move {
                    let count = cc.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    if count < 2 {
                        Err(Error::Transport("timeout".to_string()))
                    } else {
                        Ok(42)
                    }
                }
            },
            |e, attempt| should_retry("TestOp", e, attempt),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausted() {
        let config = RetryConfig {
            max_attempts: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 10,
        };
        let mut calls = 0;

        let result: Result<()> = retry_with_backoff(
            &config,
            || {
                calls += 1;
                async { Err(Error::Transport("always fails".to_string())) }
            },
            |_, _| true,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_retry_non_retryable() {
        let config = RetryConfig {
            max_attempts: 3,
            initial_backoff_ms: 1,
            max_backoff_ms: 10,
        };
        let mut calls = 0;

        let result: Result<()> = retry_with_backoff(
            &config,
            || {
                calls += 1;
                async { Err(Error::NotFound("not found".to_string())) }
            },
            |e, attempt| should_retry("TestOp", e, attempt),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1); // Should not retry
    }
}
