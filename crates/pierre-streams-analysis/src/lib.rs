// ABOUTME: Stream statistics and shape-preserving downsampling for activity telemetry
// ABOUTME: Extracted from the delivery crate so the algorithms stay free of I/O and formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! Analysis algorithms over `StreamSet` channels.
//!
//! Both operations are synchronous and allocation-bounded by the input size.
//! Neither fails on degenerate input: empty channels produce empty statistics
//! and already-small channels pass through downsampling untouched.

/// Shape-preserving downsampling with boundary and extrema retention
pub mod downsampling;
/// Per-channel summary statistics including normalized power
pub mod statistics;

pub use downsampling::{
    downsample_channel, downsample_streams, select_indices, DownsampleConfig, ReductionOutcome,
};
pub use statistics::{
    compute_statistics, normalized_power, ComputeStatistics, StatisticsMap, StreamStatistics,
};
