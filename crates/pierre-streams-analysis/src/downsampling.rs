// ABOUTME: Shape-preserving downsampling of activity streams to a sample ceiling
// ABOUTME: Uniform stride with forced endpoints plus retention of local peaks and valleys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Shape-Preserving Downsampling
//!
//! A pure uniform stride silently erases short power or heart-rate spikes. The
//! reducer here starts from a uniform stride (first and last sample always
//! included), then inspects a small neighborhood around every interior
//! candidate. When the local maximum or minimum deviates from the candidate by
//! more than a relative threshold, that extremum takes the candidate's slot.
//!
//! Guarantees, for a ceiling `c >= 2` and a channel longer than `c`:
//! - output length is at most `c`
//! - the first and last source samples are kept
//! - selected indices are strictly increasing
//!
//! Channels at or below the ceiling are returned unchanged. Coordinate and flag
//! channels have no meaningful extrema and use the uniform stride alone.
//!
//! When a whole set is reduced, one index plan is built from every numeric
//! channel and applied to all of them, so index `i` still refers to the same
//! instant in every channel afterwards.

use std::collections::{BTreeMap, BTreeSet};

use pierre_streams_core::constants::analysis::{
    DEFAULT_EXTREMA_THRESHOLD, DEFAULT_EXTREMA_WINDOW, MIN_DOWNSAMPLE_POINTS,
};
use pierre_streams_core::{StreamChannel, StreamSet};
use serde::Serialize;
use tracing::{debug, info};

/// Tunables for extrema retention
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownsampleConfig {
    /// Half-width (in samples) of the neighborhood inspected around each candidate
    pub extrema_window: usize,
    /// Relative deviation from the candidate above which an extremum is retained
    pub extrema_threshold: f64,
}

impl Default for DownsampleConfig {
    fn default() -> Self {
        Self {
            extrema_window: DEFAULT_EXTREMA_WINDOW,
            extrema_threshold: DEFAULT_EXTREMA_THRESHOLD,
        }
    }
}

/// What happened to the sample count during one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReductionOutcome {
    /// Whether any samples were dropped
    pub downsampled: bool,
    /// Sample count before reduction
    pub original_points: usize,
    /// Sample count after reduction
    pub reduced_points: usize,
}

impl ReductionOutcome {
    /// Outcome for a dataset that was left untouched
    #[must_use]
    pub const fn unchanged(points: usize) -> Self {
        Self {
            downsampled: false,
            original_points: points,
            reduced_points: points,
        }
    }
}

/// Neighborhood extremum found around a uniform candidate
struct Extremum {
    index: usize,
    deviation: f64,
    candidate: usize,
}

/// Uniformly spaced indices over `[0, len)` including both endpoints
///
/// Requires `len > target >= 2`; the spacing is then above one sample, so the
/// rounded indices are strictly increasing.
fn uniform_indices(len: usize, target: usize) -> Vec<usize> {
    let last = len - 1;
    let steps = target - 1;
    (0..target)
        .map(|k| (k * last + steps / 2) / steps)
        .collect()
}

fn find_extrema(
    values: &[f64],
    candidates: &[usize],
    config: &DownsampleConfig,
) -> Vec<Extremum> {
    let mut found = Vec::new();
    let Some(last) = values.len().checked_sub(1) else {
        return found;
    };

    for &candidate in candidates {
        let Some(&base) = values.get(candidate) else {
            continue;
        };
        if !base.is_finite() {
            continue;
        }
        let lo = candidate.saturating_sub(config.extrema_window);
        let hi = (candidate + config.extrema_window).min(last);

        let mut max_index = candidate;
        let mut min_index = candidate;
        for (index, &value) in values.iter().enumerate().take(hi + 1).skip(lo) {
            if !value.is_finite() {
                continue;
            }
            if value > values[max_index] {
                max_index = index;
            }
            if value < values[min_index] {
                min_index = index;
            }
        }

        let scale = base.abs().max(f64::EPSILON);
        for index in [max_index, min_index] {
            if index == candidate {
                continue;
            }
            let deviation = (values[index] - base).abs() / scale;
            if deviation > config.extrema_threshold {
                found.push(Extremum {
                    index,
                    deviation,
                    candidate,
                });
            }
        }
    }
    found
}

/// Build the ascending index plan for reducing `len` samples to at most `target`
///
/// `numeric_channels` supplies the values inspected for extrema; pass an empty
/// slice for a pure uniform stride. A plan covering every index is returned
/// when `len` is already within the ceiling.
#[must_use]
pub fn select_indices(
    len: usize,
    target: usize,
    numeric_channels: &[&[f64]],
    config: &DownsampleConfig,
) -> Vec<usize> {
    let target = target.max(MIN_DOWNSAMPLE_POINTS);
    if len <= target {
        return (0..len).collect();
    }

    let uniform = uniform_indices(len, target);
    let interior = &uniform[1..uniform.len() - 1];
    let uniform_set: BTreeSet<usize> = uniform.iter().copied().collect();

    // Extra index -> (largest deviation seen, candidates it can displace)
    let mut extras: BTreeMap<usize, (f64, BTreeSet<usize>)> = BTreeMap::new();
    for values in numeric_channels {
        for extremum in find_extrema(values, interior, config) {
            if uniform_set.contains(&extremum.index) {
                continue;
            }
            let entry = extras
                .entry(extremum.index)
                .or_insert_with(|| (0.0, BTreeSet::new()));
            entry.0 = entry.0.max(extremum.deviation);
            entry.1.insert(extremum.candidate);
        }
    }

    if extras.is_empty() {
        return uniform;
    }

    // Every retained extremum must displace one interior candidate to stay within budget.
    // Candidates whose neighborhood produced an extremum go first, strongest extremum first.
    let mut ranked: Vec<(usize, f64, BTreeSet<usize>)> = extras
        .into_iter()
        .map(|(index, (deviation, candidates))| (index, deviation, candidates))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut evicted: BTreeSet<usize> = BTreeSet::new();
    let mut kept: Vec<usize> = Vec::new();
    for (index, _, candidates) in &ranked {
        let slot = candidates
            .iter()
            .find(|candidate| !evicted.contains(candidate))
            .or_else(|| {
                ranked
                    .iter()
                    .flat_map(|(_, _, other)| other.iter())
                    .find(|candidate| !evicted.contains(candidate))
            })
            .copied();
        let Some(slot) = slot else {
            break;
        };
        evicted.insert(slot);
        kept.push(*index);
    }

    let plan: BTreeSet<usize> = uniform
        .into_iter()
        .filter(|index| !evicted.contains(index))
        .chain(kept)
        .collect();

    debug!(
        len,
        target,
        retained_extrema = evicted.len(),
        "Built downsampling index plan"
    );
    plan.into_iter().collect()
}

/// Reduce one channel to at most `target` samples
///
/// Returns the channel unchanged when it is already within the ceiling.
/// `original_size` is preserved for reporting.
#[must_use]
pub fn downsample_channel(
    channel: &StreamChannel,
    target: usize,
    config: &DownsampleConfig,
) -> StreamChannel {
    let len = channel.len();
    if len <= target.max(MIN_DOWNSAMPLE_POINTS) {
        return channel.clone();
    }
    let numeric: Vec<&[f64]> = channel.data.scalars().into_iter().collect();
    let plan = select_indices(len, target, &numeric, config);
    channel.with_data(channel.data.select(&plan))
}

/// Reduce every channel of a set with one shared index plan
///
/// Returns the set untouched (and an unchanged outcome) when its total is
/// already within the ceiling.
#[must_use]
pub fn downsample_streams(
    streams: StreamSet,
    target: usize,
    config: &DownsampleConfig,
) -> (StreamSet, ReductionOutcome) {
    let total = streams.total_points();
    if total <= target.max(MIN_DOWNSAMPLE_POINTS) {
        return (streams, ReductionOutcome::unchanged(total));
    }

    let numeric: Vec<&[f64]> = streams
        .channels()
        .filter_map(|channel| channel.data.scalars())
        .collect();
    let plan = select_indices(total, target, &numeric, config);
    let reduced = streams.select(&plan);
    let outcome = ReductionOutcome {
        downsampled: true,
        original_points: total,
        reduced_points: reduced.total_points(),
    };

    info!(
        original_points = outcome.original_points,
        reduced_points = outcome.reduced_points,
        channels = reduced.channel_count(),
        "Downsampled activity streams"
    );
    (reduced, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_indices_include_endpoints() {
        let indices = uniform_indices(1000, 100);
        assert_eq!(indices.len(), 100);
        assert_eq!(indices[0], 0);
        assert_eq!(indices[99], 999);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_uniform_indices_tight_spacing() {
        let indices = uniform_indices(11, 10);
        assert_eq!(indices.len(), 10);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(indices[9], 10);
    }

    #[test]
    fn test_flat_signal_has_no_extrema() {
        let values = vec![150.0; 50];
        let found = find_extrema(&values, &[10, 20, 30], &DownsampleConfig::default());
        assert!(found.is_empty());
    }

    #[test]
    fn test_spike_is_found_near_candidate() {
        let mut values = vec![100.0; 50];
        values[22] = 400.0;
        let found = find_extrema(&values, &[20], &DownsampleConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 22);
        assert_eq!(found[0].candidate, 20);
    }
}
