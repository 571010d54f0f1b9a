//! Client configuration.
//!
//! This module contains the cross-cutting settings consumed by an HTTP
//! execution layer:
//! - [`ClientConfiguration`]: Connection, proxy and retry settings
//! - [`RetryPolicy`]: When to retry and how long to back off

mod client;
mod retry;

pub use client::{ClientConfiguration, Protocol, defaults as client_defaults};
pub use retry::{RetryPolicy, defaults, retry, retry_with_policy};
