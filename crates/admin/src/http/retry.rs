//! Fixed-delay retry for individual API calls.
//!
//! Used by actions an operator expects to "just work" on a flaky connection,
//! order confirmation first among them. Terminal failures are classified so
//! the caller can tell the operator whether to check their connection or try
//! again later.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::ApiError;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` means a single attempt.
    pub retries: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_RETRIES: u32 = 1;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    #[must_use]
    pub const fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Same delay, different retry count.
    #[must_use]
    pub const fn with_retries(self, retries: u32) -> Self {
        Self { retries, ..self }
    }

    /// Total attempts this policy allows.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RETRIES, Self::DEFAULT_DELAY)
    }
}

/// Run `op` until it succeeds, fails permanently, or the policy's retries are
/// spent.
///
/// `op` receives the zero-based attempt number. Only transient failures
/// (network and 5xx) are retried; anything else is returned at once.
///
/// # Errors
///
/// Returns the first permanent error, or the error from the final attempt.
pub async fn with_retries<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err)
                if attempt < policy.retries && ErrorCategory::classify(&err).is_transient() =>
            {
                attempt += 1;
                warn!(
                    attempt,
                    retries = policy.retries,
                    error = %err,
                    "request failed, retrying"
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
            Err(err) => return Err(err),
        }
    }
}

/// Coarse classification of a terminal failure, for operator-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The API could not be reached.
    Network,
    /// The API answered with a 5xx.
    Server,
    /// Anything else: validation, not found, decoding.
    Other,
}

impl ErrorCategory {
    #[must_use]
    pub fn classify(err: &ApiError) -> Self {
        if err.is_network() {
            Self::Network
        } else if err.is_server_error() {
            Self::Server
        } else {
            Self::Other
        }
    }

    /// Whether another attempt could succeed.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Network => "Network error",
            Self::Server => "Server error",
            Self::Other => "Request error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
