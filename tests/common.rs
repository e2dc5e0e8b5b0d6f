// ABOUTME: Shared test utilities and stream builders for integration tests
// ABOUTME: Provides quiet logging setup, synthetic activity channels, and a scripted provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `pierre_streams`

use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use pierre_streams::config::ServerConfig;
use pierre_streams::core::{LatLng, StreamChannel, StreamData, StreamKind, StreamSet};
use pierre_streams::providers::{
    AccessToken, ProviderError, ProviderResult, StreamProvider, StreamQuery,
};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A scalar channel of the given kind
pub fn scalar_channel(kind: StreamKind, values: Vec<f64>) -> StreamChannel {
    let data = StreamData::from_scalars(kind, values).expect("scalar stream kind");
    StreamChannel::new(data)
}

/// A set holding one scalar channel
pub fn single_channel_set(kind: StreamKind, values: Vec<f64>) -> StreamSet {
    StreamSet::new().with_channel(scalar_channel(kind, values))
}

/// One-hertz ride of `n` samples with time, distance, heart rate, power, position, and moving flags
pub fn synthetic_ride(n: usize) -> StreamSet {
    let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let distance: Vec<f64> = (0..n).map(|i| i as f64 * 8.5).collect();
    let heart_rate: Vec<f64> = (0..n).map(|i| 120.0 + (i % 40) as f64).collect();
    let power: Vec<f64> = (0..n).map(|i| 180.0 + ((i * 7) % 90) as f64).collect();
    let position: Vec<LatLng> = (0..n)
        .map(|i| LatLng::new(45.501_234 + i as f64 * 1e-5, -73.567_891 + i as f64 * 1e-5))
        .collect();
    let moving: Vec<bool> = (0..n).map(|i| i % 50 != 0).collect();

    StreamSet::new()
        .with_channel(scalar_channel(StreamKind::Time, time))
        .with_channel(scalar_channel(StreamKind::Distance, distance))
        .with_channel(scalar_channel(StreamKind::HeartRate, heart_rate))
        .with_channel(scalar_channel(StreamKind::Power, power))
        .with_channel(StreamChannel::new(StreamData::Position(position)))
        .with_channel(StreamChannel::new(StreamData::MovingFlag(moving)))
}

/// Configuration with a token and library defaults everywhere else
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.strava.access_token = Some("test-token".to_owned());
    config
}

/// Provider serving canned stream sets by activity id
///
/// Unknown ids fail with a 404 API error.
#[derive(Default)]
pub struct ScriptedProvider {
    activities: HashMap<String, StreamSet>,
    failures: HashMap<String, ProviderError>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activity(mut self, activity_id: &str, streams: StreamSet) -> Self {
        self.activities.insert(activity_id.to_owned(), streams);
        self
    }

    pub fn with_failure(mut self, activity_id: &str, error: ProviderError) -> Self {
        self.failures.insert(activity_id.to_owned(), error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl StreamProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_streams(
        &self,
        activity_id: &str,
        query: &StreamQuery,
        _token: &AccessToken,
    ) -> ProviderResult<StreamSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.get(activity_id) {
            return Err(error.clone());
        }
        self.activities.get(activity_id).map_or_else(
            || {
                Err(ProviderError::Api {
                    provider: "scripted",
                    status: 404,
                    message: "Record Not Found".to_owned(),
                })
            },
            |streams| Ok(streams.clone().retain_kinds(query.effective_kinds())),
        )
    }
}
