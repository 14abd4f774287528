//! DryKlin Core - Shared types library.
//!
//! This crate provides the domain types shared by all DryKlin admin components:
//! - `admin` - Session-guarded REST client and view-models
//! - `cli` - Command-line front end for operators
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Records mirror the JSON returned by the DryKlin REST API
//! (camelCase fields, string identifiers).
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, price, statuses and API records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
