// ABOUTME: Process-wide HTTP client reused by every stream fetch
// ABOUTME: Timeouts are fixed once at startup; credentials are never stored on the client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::debug;

/// Request and connect timeouts for upstream calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientSettings {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

static CLIENT_SETTINGS: OnceLock<HttpClientSettings> = OnceLock::new();

static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Record timeouts for the shared client
///
/// Only the first call has an effect, and only if it happens before the first
/// call to [`shared_client`].
pub fn initialize_shared_client(settings: HttpClientSettings) {
    if CLIENT_SETTINGS.set(settings).is_err() {
        debug!("Shared HTTP client settings already initialized");
    }
}

/// Build a client with the given timeouts
#[must_use]
pub fn build_client(settings: HttpClientSettings) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .user_agent(concat!("pierre-streams/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Connection-pooled client shared by all providers
///
/// Bearer tokens are attached per request, so concurrent bulk fetches for
/// different credentials can share it safely.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let settings = CLIENT_SETTINGS.get().copied().unwrap_or_default();
        build_client(settings)
    })
}
