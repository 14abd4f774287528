//! DryKlin admin library.
//!
//! Session-guarded access to the DryKlin REST API for the operator
//! dashboard: order handling, account administration, the service catalog,
//! analytics and notifications.
//!
//! # Security
//!
//! Access and refresh tokens are encrypted at rest (AES-256-GCM) and only
//! ever held as [`secrecy::SecretString`] in memory. A session that cannot be
//! refreshed is wiped completely.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod http;
pub mod navigation;
pub mod session;
pub mod state;

pub use board::OrderBoard;
pub use config::{AdminConfig, ConfigError};
pub use error::AdminError;
pub use http::{ApiClient, ApiError, ApiRequest, ClientSettings, ErrorCategory, RetryPolicy};
pub use navigation::{MemoryNavigator, Navigator};
pub use session::{CredentialPair, SessionVault};
pub use state::AppState;
