// ABOUTME: Environment configuration for the stream delivery service
// ABOUTME: Parses upstream credentials, HTTP timeouts, chunk budgets, and downsampling tunables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::error::Error;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use pierre_streams_analysis::DownsampleConfig;
use pierre_streams_core::constants::analysis::{DEFAULT_EXTREMA_THRESHOLD, DEFAULT_EXTREMA_WINDOW};
use pierre_streams_core::constants::delivery;
use pierre_streams_core::constants::service_names::STRAVA_API_BASE_URL;
use pierre_streams_providers::{AccessToken, HttpClientSettings};
use tracing::info;

/// Strava API access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StravaConfig {
    /// Bearer token; absence only fails requests that need it
    pub access_token: Option<String>,
    /// API base URL
    pub api_base_url: String,
    /// Upstream HTTP timeouts
    pub http: HttpClientSettings,
}

impl Default for StravaConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base_url: STRAVA_API_BASE_URL.to_owned(),
            http: HttpClientSettings::default(),
        }
    }
}

impl StravaConfig {
    /// Credential for a request, if one is configured
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .map(AccessToken::new)
    }
}

/// Message budgets and paging defaults for stream delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDeliveryConfig {
    /// Target encoded size of one message in bytes
    pub chunk_byte_target: usize,
    /// Bytes reserved for envelope structure in every message
    pub structural_overhead_bytes: usize,
    /// Smallest chunk size ever chosen
    pub min_chunk_size: usize,
    /// Largest chunk size in compact format
    pub max_chunk_size_compact: usize,
    /// Largest chunk size in verbose format
    pub max_chunk_size_verbose: usize,
    /// Assumed bytes per sample per channel, compact format
    pub compact_bytes_per_sample: usize,
    /// Assumed bytes per sample per channel, verbose format
    pub verbose_bytes_per_sample: usize,
    /// Samples encoded to measure real bytes per sample (0 disables measuring)
    pub calibration_sample_points: usize,
    /// Page size when the caller does not give one
    pub default_points_per_page: usize,
    /// Concurrent upstream fetches in bulk mode
    pub bulk_concurrency: usize,
}

impl Default for StreamDeliveryConfig {
    fn default() -> Self {
        Self {
            chunk_byte_target: delivery::DEFAULT_CHUNK_BYTE_TARGET,
            structural_overhead_bytes: delivery::DEFAULT_STRUCTURAL_OVERHEAD_BYTES,
            min_chunk_size: delivery::DEFAULT_MIN_CHUNK_SIZE,
            max_chunk_size_compact: delivery::DEFAULT_MAX_CHUNK_SIZE_COMPACT,
            max_chunk_size_verbose: delivery::DEFAULT_MAX_CHUNK_SIZE_VERBOSE,
            compact_bytes_per_sample: delivery::DEFAULT_COMPACT_BYTES_PER_SAMPLE,
            verbose_bytes_per_sample: delivery::DEFAULT_VERBOSE_BYTES_PER_SAMPLE,
            calibration_sample_points: delivery::DEFAULT_CALIBRATION_SAMPLE_POINTS,
            default_points_per_page: delivery::DEFAULT_POINTS_PER_PAGE,
            bulk_concurrency: delivery::DEFAULT_BULK_CONCURRENCY,
        }
    }
}

impl StreamDeliveryConfig {
    /// Check relationships between budget values
    ///
    /// # Errors
    ///
    /// Returns an error if the byte target is zero, the overhead does not fit
    /// inside it, the minimum chunk size exceeds a maximum, or a page size or
    /// bytes-per-sample figure is zero
    pub fn validate(&self) -> Result<()> {
        if self.chunk_byte_target == 0 {
            return Err(anyhow!("STREAMS_CHUNK_BYTE_TARGET must be greater than zero"));
        }
        if self.structural_overhead_bytes >= self.chunk_byte_target {
            return Err(anyhow!(
                "STREAMS_STRUCTURAL_OVERHEAD_BYTES ({}) must be below STREAMS_CHUNK_BYTE_TARGET ({})",
                self.structural_overhead_bytes,
                self.chunk_byte_target
            ));
        }
        if self.min_chunk_size == 0 {
            return Err(anyhow!("STREAMS_MIN_CHUNK_SIZE must be greater than zero"));
        }
        if self.min_chunk_size > self.max_chunk_size_compact
            || self.min_chunk_size > self.max_chunk_size_verbose
        {
            return Err(anyhow!(
                "STREAMS_MIN_CHUNK_SIZE ({}) exceeds a maximum chunk size (compact {}, verbose {})",
                self.min_chunk_size,
                self.max_chunk_size_compact,
                self.max_chunk_size_verbose
            ));
        }
        if self.compact_bytes_per_sample == 0 || self.verbose_bytes_per_sample == 0 {
            return Err(anyhow!("Bytes-per-sample figures must be greater than zero"));
        }
        if self.default_points_per_page == 0 {
            return Err(anyhow!("STREAMS_DEFAULT_POINTS_PER_PAGE must be greater than zero"));
        }
        Ok(())
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerConfig {
    /// Upstream access
    pub strava: StravaConfig,
    /// Message budgets and paging
    pub delivery: StreamDeliveryConfig,
    /// Extrema retention tunables
    pub downsample: DownsampleConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparseable value or the
    /// resulting configuration fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            strava: StravaConfig {
                access_token: env::var("STRAVA_ACCESS_TOKEN").ok(),
                api_base_url: env_var_or("STRAVA_API_BASE_URL", STRAVA_API_BASE_URL),
                http: HttpClientSettings {
                    timeout_secs: parse_env("HTTP_CLIENT_TIMEOUT_SECS", 30)?,
                    connect_timeout_secs: parse_env("HTTP_CLIENT_CONNECT_TIMEOUT_SECS", 10)?,
                },
            },
            delivery: StreamDeliveryConfig {
                chunk_byte_target: parse_env(
                    "STREAMS_CHUNK_BYTE_TARGET",
                    delivery::DEFAULT_CHUNK_BYTE_TARGET,
                )?,
                structural_overhead_bytes: parse_env(
                    "STREAMS_STRUCTURAL_OVERHEAD_BYTES",
                    delivery::DEFAULT_STRUCTURAL_OVERHEAD_BYTES,
                )?,
                min_chunk_size: parse_env("STREAMS_MIN_CHUNK_SIZE", delivery::DEFAULT_MIN_CHUNK_SIZE)?,
                max_chunk_size_compact: parse_env(
                    "STREAMS_MAX_CHUNK_SIZE_COMPACT",
                    delivery::DEFAULT_MAX_CHUNK_SIZE_COMPACT,
                )?,
                max_chunk_size_verbose: parse_env(
                    "STREAMS_MAX_CHUNK_SIZE_VERBOSE",
                    delivery::DEFAULT_MAX_CHUNK_SIZE_VERBOSE,
                )?,
                compact_bytes_per_sample: parse_env(
                    "STREAMS_COMPACT_BYTES_PER_SAMPLE",
                    delivery::DEFAULT_COMPACT_BYTES_PER_SAMPLE,
                )?,
                verbose_bytes_per_sample: parse_env(
                    "STREAMS_VERBOSE_BYTES_PER_SAMPLE",
                    delivery::DEFAULT_VERBOSE_BYTES_PER_SAMPLE,
                )?,
                calibration_sample_points: parse_env(
                    "STREAMS_CALIBRATION_SAMPLE_POINTS",
                    delivery::DEFAULT_CALIBRATION_SAMPLE_POINTS,
                )?,
                default_points_per_page: parse_env(
                    "STREAMS_DEFAULT_POINTS_PER_PAGE",
                    delivery::DEFAULT_POINTS_PER_PAGE,
                )?,
                bulk_concurrency: parse_env(
                    "STREAMS_BULK_CONCURRENCY",
                    delivery::DEFAULT_BULK_CONCURRENCY,
                )?,
            },
            downsample: DownsampleConfig {
                extrema_window: parse_env("STREAMS_EXTREMA_WINDOW", DEFAULT_EXTREMA_WINDOW)?,
                extrema_threshold: parse_env(
                    "STREAMS_EXTREMA_THRESHOLD",
                    DEFAULT_EXTREMA_THRESHOLD,
                )?,
            },
        };

        config.validate()?;
        info!("{}", config.summary());
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        self.delivery.validate()?;
        if !self.downsample.extrema_threshold.is_finite() || self.downsample.extrema_threshold < 0.0 {
            return Err(anyhow!(
                "STREAMS_EXTREMA_THRESHOLD must be a non-negative number, got {}",
                self.downsample.extrema_threshold
            ));
        }
        if self.strava.api_base_url.trim().is_empty() {
            return Err(anyhow!("STRAVA_API_BASE_URL must not be empty"));
        }
        Ok(())
    }

    /// Configuration summary for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pierre Streams Configuration:\n\
             - Strava API: {}\n\
             - Strava token: {}\n\
             - Chunk byte target: {} (overhead {})\n\
             - Chunk size bounds: {}..{} compact, {}..{} verbose\n\
             - Calibration sample: {} points\n\
             - Extrema window/threshold: {} / {}",
            self.strava.api_base_url,
            if self.strava.token().is_some() {
                "Configured"
            } else {
                "Missing"
            },
            self.delivery.chunk_byte_target,
            self.delivery.structural_overhead_bytes,
            self.delivery.min_chunk_size,
            self.delivery.max_chunk_size_compact,
            self.delivery.min_chunk_size,
            self.delivery.max_chunk_size_verbose,
            self.delivery.calibration_sample_points,
            self.downsample.extrema_window,
            self.downsample.extrema_threshold,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, using `default` when it is unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delivery_config_is_valid() {
        assert!(StreamDeliveryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overhead_must_fit_in_target() {
        let config = StreamDeliveryConfig {
            structural_overhead_bytes: 60_000,
            ..StreamDeliveryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_token_is_treated_as_missing() {
        let config = StravaConfig {
            access_token: Some("   ".to_owned()),
            ..StravaConfig::default()
        };
        assert!(config.token().is_none());
    }
}
