//! HTTP layer: the session-guarded client, its error type and retry helper.

mod client;
mod error;
pub mod retry;

pub use client::{ApiClient, ApiRequest, ClientSettings, DEFAULT_TIMEOUT, REFRESH_PATH};
pub use error::ApiError;
pub use retry::{ErrorCategory, RetryPolicy, with_retries};
