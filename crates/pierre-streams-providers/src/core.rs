// ABOUTME: Provider trait for fetching activity streams and its request types
// ABOUTME: Credentials travel with each call so providers hold no per-user state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stream Provider Contract
//!
//! A provider turns an activity identifier into a [`StreamSet`]. The delivery
//! pipeline never talks to the network itself; it consumes whatever the
//! provider hands back.
//!
//! The bearer credential is an argument of every fetch rather than state on the
//! provider, so one provider instance can serve concurrent requests on behalf
//! of different athletes without cross-request interference.

use std::fmt;

use async_trait::async_trait;
use pierre_streams_core::{Resolution, SeriesType, StreamKind, StreamSet};

use crate::errors::ProviderResult;

/// Bearer credential for one request
///
/// `Debug` output is redacted so tokens never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token text for the `Authorization` header
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Which channels to fetch and how the upstream should index them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamQuery {
    /// Requested channel kinds (empty means every kind)
    pub kinds: Vec<StreamKind>,
    /// Base axis requested from the upstream
    pub series_type: SeriesType,
    /// Density requested from the upstream
    pub resolution: Resolution,
}

impl StreamQuery {
    /// Query for the given kinds at full resolution over time
    #[must_use]
    pub fn new(kinds: Vec<StreamKind>) -> Self {
        Self {
            kinds,
            series_type: SeriesType::default(),
            resolution: Resolution::default(),
        }
    }

    /// Set the base axis
    #[must_use]
    pub const fn with_series_type(mut self, series_type: SeriesType) -> Self {
        self.series_type = series_type;
        self
    }

    /// Set the requested density
    #[must_use]
    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Requested kinds, expanding an empty list to every kind
    #[must_use]
    pub fn effective_kinds(&self) -> &[StreamKind] {
        if self.kinds.is_empty() {
            &StreamKind::ALL
        } else {
            &self.kinds
        }
    }
}

/// Source of activity stream data
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Provider name for logs and error messages
    fn name(&self) -> &'static str;

    /// Fetch the requested channels of one activity
    ///
    /// An activity without telemetry yields an empty set rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the upstream rejects the request, cannot
    /// be reached, or answers with an unreadable body.
    async fn fetch_streams(
        &self,
        activity_id: &str,
        query: &StreamQuery,
        token: &AccessToken,
    ) -> ProviderResult<StreamSet>;
}
