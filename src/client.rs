//! Shared outbound HTTP client
//!
//! One `reqwest` client wrapped with a transient-retry middleware: server-side
//! 5xx responses and transport errors are retried with exponential backoff up
//! to a fixed ceiling. The client is injected into every component rather than
//! living in a global.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::AmapConfig;

/// Build the shared HTTP client from provider settings.
pub fn build_http_client(config: &AmapConfig) -> Result<ClientWithMiddleware> {
    http_client(
        Duration::from_secs(config.timeout_seconds.into()),
        config.max_retries,
    )
}

/// Build an HTTP client with an explicit timeout and retry ceiling.
///
/// The demo binaries use this directly with their own bounds.
pub fn http_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("daytrip/", env!("CARGO_PKG_VERSION")))
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
