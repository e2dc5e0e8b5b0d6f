// ABOUTME: Chunk-size estimation keeping each chunked message near a byte target
// ABOUTME: Static bytes-per-sample assumptions, refined from real encoded output when available
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chunk-Size Estimation
//!
//! `chunk_size = (byte_target - structural_overhead) / (channels * bytes_per_sample)`,
//! clamped to `[min_chunk_size, max_chunk_size(format)]`.
//!
//! `bytes_per_sample` starts as a per-format assumption. When a calibration
//! sample is configured, the first few samples of the actual set are encoded
//! and the measured cost replaces the assumption, which covers payload traits
//! such as coordinate precision that a constant cannot anticipate.

use pierre_streams_core::StreamSet;
use serde_json::Value;
use tracing::debug;

use crate::config::StreamDeliveryConfig;
use crate::encoding::{encode_streams, SampleFormat};

/// Chosen chunk size and how it was derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkSizeEstimate {
    /// Samples per chunked message
    pub chunk_size: usize,
    /// Bytes per sample per channel used in the division
    pub bytes_per_sample: f64,
    /// Whether `bytes_per_sample` was measured from encoded output
    pub refined: bool,
}

/// Computes samples-per-message for chunked delivery
#[derive(Debug, Clone, Copy)]
pub struct ChunkSizeEstimator {
    config: StreamDeliveryConfig,
}

impl ChunkSizeEstimator {
    /// Estimator over the given budgets
    #[must_use]
    pub const fn new(config: StreamDeliveryConfig) -> Self {
        Self { config }
    }

    /// Inclusive `(floor, ceiling)` for the format; the ceiling never drops below the floor
    #[must_use]
    pub fn bounds(&self, format: SampleFormat) -> (usize, usize) {
        let floor = self.config.min_chunk_size.max(1);
        let ceiling = match format {
            SampleFormat::Compact => self.config.max_chunk_size_compact,
            SampleFormat::Verbose => self.config.max_chunk_size_verbose,
        };
        (floor, ceiling.max(floor))
    }

    /// Static bytes-per-sample-per-channel assumption for the format
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn assumed_bytes_per_sample(&self, format: SampleFormat) -> f64 {
        let bytes = match format {
            SampleFormat::Compact => self.config.compact_bytes_per_sample,
            SampleFormat::Verbose => self.config.verbose_bytes_per_sample,
        };
        bytes as f64
    }

    /// Apply the division and clamp
    ///
    /// Zero channels count as one; a non-finite or non-positive cost yields the floor.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn chunk_size_for(&self, channels: usize, bytes_per_sample: f64, format: SampleFormat) -> usize {
        let (floor, ceiling) = self.bounds(format);
        let budget = self
            .config
            .chunk_byte_target
            .saturating_sub(self.config.structural_overhead_bytes)
            .max(1) as f64;
        let per_sample = channels.max(1) as f64 * bytes_per_sample;
        if !per_sample.is_finite() || per_sample <= 0.0 {
            return floor;
        }

        let raw = (budget / per_sample).floor();
        if !raw.is_finite() {
            return floor;
        }
        (raw as usize).clamp(floor, ceiling)
    }

    /// Measure bytes per sample per channel by encoding the first `sample_points` samples
    ///
    /// Returns `None` for an empty set or a zero-length sample.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn measure_bytes_per_sample(
        streams: &StreamSet,
        format: SampleFormat,
        sample_points: usize,
    ) -> Option<f64> {
        let points = sample_points.min(streams.total_points());
        let channels = streams.channel_count();
        if points == 0 || channels == 0 {
            return None;
        }

        let sample = streams.slice(0..points);
        let encoded = Value::Object(encode_streams(&sample, format));
        let bytes = serde_json::to_vec(&encoded).ok()?.len();
        Some(bytes as f64 / (points * channels) as f64)
    }

    /// Estimate the chunk size for delivering `streams` in `format`
    #[must_use]
    pub fn estimate(&self, streams: &StreamSet, format: SampleFormat) -> ChunkSizeEstimate {
        let channels = streams.channel_count();
        let measured = if self.config.calibration_sample_points > 0 {
            Self::measure_bytes_per_sample(streams, format, self.config.calibration_sample_points)
                .filter(|bytes| bytes.is_finite() && *bytes > 0.0)
        } else {
            None
        };

        let (bytes_per_sample, refined) = measured.map_or_else(
            || (self.assumed_bytes_per_sample(format), false),
            |bytes| (bytes, true),
        );
        let chunk_size = self.chunk_size_for(channels, bytes_per_sample, format);

        debug!(
            channels,
            format = %format,
            bytes_per_sample,
            refined,
            chunk_size,
            "Estimated chunk size"
        );
        ChunkSizeEstimate {
            chunk_size,
            bytes_per_sample,
            refined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_formula() {
        let estimator = ChunkSizeEstimator::new(StreamDeliveryConfig::default());
        // (50_000 - 2_000) / (4 * 25) = 480
        assert_eq!(estimator.chunk_size_for(4, 25.0, SampleFormat::Compact), 480);
        // (50_000 - 2_000) / (4 * 120) = 100
        assert_eq!(estimator.chunk_size_for(4, 120.0, SampleFormat::Verbose), 100);
    }

    #[test]
    fn test_clamps_to_bounds() {
        let estimator = ChunkSizeEstimator::new(StreamDeliveryConfig::default());
        assert_eq!(estimator.chunk_size_for(1, 1.0, SampleFormat::Compact), 5_000);
        assert_eq!(estimator.chunk_size_for(1, 1.0, SampleFormat::Verbose), 1_000);
        assert_eq!(estimator.chunk_size_for(11, 500.0, SampleFormat::Verbose), 50);
    }

    #[test]
    fn test_degenerate_inputs_yield_floor() {
        let estimator = ChunkSizeEstimator::new(StreamDeliveryConfig::default());
        assert_eq!(estimator.chunk_size_for(0, 0.0, SampleFormat::Compact), 50);
        assert_eq!(estimator.chunk_size_for(3, f64::NAN, SampleFormat::Compact), 50);
    }
}
