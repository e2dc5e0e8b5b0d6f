// ABOUTME: Per-channel summary statistics for activity streams
// ABOUTME: Min/max/average for numeric kinds, normalized power for power, km/h for speed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stream Statistics
//!
//! Statistics are computed once per request from the (possibly downsampled)
//! channel set and carried unchanged into every message of the response. They
//! never depend on how the samples are later encoded.
//!
//! Coordinate and flag channels only report a sample count. Non-finite samples
//! are counted but excluded from numeric aggregates.

use std::collections::BTreeMap;

use pierre_streams_core::constants::analysis::{NORMALIZED_POWER_WINDOW, STATISTIC_DECIMALS};
use pierre_streams_core::constants::units::MPS_TO_KMH;
use pierre_streams_core::numeric::round_to;
use pierre_streams_core::{StreamChannel, StreamData, StreamKind, StreamSet};
use serde::Serialize;
use tracing::debug;

/// Summary values for one channel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamStatistics {
    /// Number of samples
    pub count: usize,
    /// Smallest finite sample
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Largest finite sample
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Arithmetic mean of finite samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    /// Normalized power (power channels only; 0 below the 30-sample window)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_power: Option<f64>,
    /// Minimum speed in km/h (speed channels only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_kmh: Option<f64>,
    /// Average speed in km/h (speed channels only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_kmh: Option<f64>,
    /// Maximum speed in km/h (speed channels only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_kmh: Option<f64>,
}

impl StreamStatistics {
    /// Statistics carrying only a sample count
    #[must_use]
    pub fn count_only(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Whether any numeric aggregate is present
    #[must_use]
    pub const fn has_numeric_fields(&self) -> bool {
        self.avg.is_some()
    }
}

/// Statistics for every channel of a set, keyed by kind
pub type StatisticsMap = BTreeMap<StreamKind, StreamStatistics>;

/// Capability: summarise a channel's samples
pub trait ComputeStatistics {
    /// Compute summary statistics
    fn statistics(&self) -> StreamStatistics;
}

impl ComputeStatistics for StreamData {
    fn statistics(&self) -> StreamStatistics {
        match self {
            Self::Power(values) => power_statistics(values),
            Self::Speed(values) => speed_statistics(values),
            Self::Time(values)
            | Self::Distance(values)
            | Self::Altitude(values)
            | Self::HeartRate(values)
            | Self::Cadence(values)
            | Self::Temperature(values)
            | Self::Grade(values) => scalar_statistics(values),
            Self::Position(values) => StreamStatistics::count_only(values.len()),
            Self::MovingFlag(values) => StreamStatistics::count_only(values.len()),
        }
    }
}

impl ComputeStatistics for StreamChannel {
    fn statistics(&self) -> StreamStatistics {
        self.data.statistics()
    }
}

/// Compute statistics for every channel in the set
#[must_use]
pub fn compute_statistics(streams: &StreamSet) -> StatisticsMap {
    let statistics: StatisticsMap = streams
        .channels()
        .map(|channel| (channel.kind(), channel.statistics()))
        .collect();
    debug!(
        channels = statistics.len(),
        total_points = streams.total_points(),
        "Computed stream statistics"
    );
    statistics
}

/// Min, max, and mean over finite samples
struct Aggregate {
    min: f64,
    max: f64,
    mean: f64,
}

#[allow(clippy::cast_precision_loss)]
fn aggregate(values: &[f64]) -> Option<Aggregate> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max, sum, n) = finite.fold((first, first, first, 1_usize), |(min, max, sum, n), v| {
        (min.min(v), max.max(v), sum + v, n + 1)
    });
    Some(Aggregate {
        min,
        max,
        mean: sum / n as f64,
    })
}

fn scalar_statistics(values: &[f64]) -> StreamStatistics {
    let mut stats = StreamStatistics::count_only(values.len());
    if let Some(agg) = aggregate(values) {
        stats.min = Some(round_to(agg.min, STATISTIC_DECIMALS));
        stats.max = Some(round_to(agg.max, STATISTIC_DECIMALS));
        stats.avg = Some(round_to(agg.mean, STATISTIC_DECIMALS));
    }
    stats
}

fn power_statistics(values: &[f64]) -> StreamStatistics {
    let mut stats = scalar_statistics(values);
    if stats.has_numeric_fields() {
        stats.normalized_power = Some(normalized_power(values).unwrap_or(0.0));
    }
    stats
}

fn speed_statistics(values: &[f64]) -> StreamStatistics {
    let mut stats = scalar_statistics(values);
    if let Some(agg) = aggregate(values) {
        stats.min_kmh = Some(round_to(agg.min * MPS_TO_KMH, STATISTIC_DECIMALS));
        stats.avg_kmh = Some(round_to(agg.mean * MPS_TO_KMH, STATISTIC_DECIMALS));
        stats.max_kmh = Some(round_to(agg.max * MPS_TO_KMH, STATISTIC_DECIMALS));
    }
    stats
}

/// Normalized power: 4th root of the mean of 30-sample rolling averages raised to the 4th power
///
/// Returns `None` when fewer than 30 finite samples are available.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalized_power(power: &[f64]) -> Option<f64> {
    let samples: Vec<f64> = power.iter().copied().filter(|p| p.is_finite()).collect();
    let window = NORMALIZED_POWER_WINDOW;
    if samples.len() < window {
        return None;
    }

    let mut window_sum: f64 = samples[..window].iter().sum();
    let mut fourth_power_sum = (window_sum / window as f64).powi(4);
    for i in window..samples.len() {
        window_sum += samples[i] - samples[i - window];
        fourth_power_sum += (window_sum / window as f64).powi(4);
    }

    let windows = samples.len() - window + 1;
    let mean_fourth_power = fourth_power_sum / windows as f64;
    Some(round_to(mean_fourth_power.powf(0.25), STATISTIC_DECIMALS))
}
