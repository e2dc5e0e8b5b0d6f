// ABOUTME: Activity stream providers for the Pierre stream delivery pipeline
// ABOUTME: Provider trait, Strava streams client, shared HTTP client, and bulk fetching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fetch collaborators for activity streams.
//!
//! Providers hand the delivery pipeline a validated `StreamSet`; everything
//! network-related stays in this crate.

/// Concurrent multi-activity fetching
pub mod bulk;
/// Provider trait and request types
pub mod core;
/// Provider error types
pub mod errors;
/// Shared HTTP client for provider API calls
pub mod http_client;
/// Strava streams API client
pub mod strava;

pub use bulk::{fetch_bulk_streams, BulkFetchResult};
pub use core::{AccessToken, StreamProvider, StreamQuery};
pub use errors::{ProviderError, ProviderResult};
pub use http_client::{build_client, initialize_shared_client, shared_client, HttpClientSettings};
pub use strava::{is_numeric_id, parse_streams_response, StravaStreamProvider};
