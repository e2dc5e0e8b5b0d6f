// ABOUTME: Integration tests for chunk-size estimation and page/chunk arithmetic
// ABOUTME: Covers byte-target division, clamping, calibration, coverage, and page bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{single_channel_set, synthetic_ride};
use pierre_streams::chunking::ChunkSizeEstimator;
use pierre_streams::config::StreamDeliveryConfig;
use pierre_streams::core::pagination::{chunk_ranges, total_pages, PageWindow};
use pierre_streams::core::{ErrorCode, StreamKind, StreamSet};
use pierre_streams::encoding::SampleFormat;

fn uncalibrated() -> StreamDeliveryConfig {
    StreamDeliveryConfig {
        calibration_sample_points: 0,
        ..StreamDeliveryConfig::default()
    }
}

#[test]
fn test_chunk_ranges_cover_every_point_once() {
    let time: Vec<f64> = (0..5_000).map(f64::from).collect();
    let set = single_channel_set(StreamKind::Time, time);
    let estimate = ChunkSizeEstimator::new(StreamDeliveryConfig::default())
        .estimate(&set, SampleFormat::Compact);
    let chunks = chunk_ranges(set.total_points(), estimate.chunk_size);

    assert_eq!(chunks.iter().map(|chunk| chunk.len()).sum::<usize>(), 5_000);
    assert_eq!(chunks.first().map(|chunk| chunk.start), Some(0));
    assert_eq!(chunks.last().map(|chunk| chunk.end), Some(5_000));
    assert!(chunks.windows(2).all(|pair| pair[0].end == pair[1].start));
}

#[test]
fn test_static_estimate_uses_assumptions() {
    let estimator = ChunkSizeEstimator::new(uncalibrated());
    let set = synthetic_ride(1_000);

    let compact = estimator.estimate(&set, SampleFormat::Compact);
    assert!(!compact.refined);
    // (50_000 - 2_000) / (6 * 25) = 320
    assert_eq!(compact.chunk_size, 320);

    let verbose = estimator.estimate(&set, SampleFormat::Verbose);
    // (50_000 - 2_000) / (6 * 120) = 66
    assert_eq!(verbose.chunk_size, 66);
}

#[test]
fn test_calibrated_estimate_stays_within_bounds() {
    let estimator = ChunkSizeEstimator::new(StreamDeliveryConfig::default());
    for format in [SampleFormat::Compact, SampleFormat::Verbose] {
        let estimate = estimator.estimate(&synthetic_ride(2_000), format);
        let (floor, ceiling) = estimator.bounds(format);

        assert!(estimate.refined);
        assert!(estimate.bytes_per_sample > 0.0);
        assert!((floor..=ceiling).contains(&estimate.chunk_size));
    }
}

#[test]
fn test_verbose_chunks_are_smaller_than_compact() {
    let estimator = ChunkSizeEstimator::new(StreamDeliveryConfig::default());
    let set = synthetic_ride(2_000);

    let compact = estimator.estimate(&set, SampleFormat::Compact);
    let verbose = estimator.estimate(&set, SampleFormat::Verbose);
    assert!(verbose.chunk_size < compact.chunk_size);
}

#[test]
fn test_measurement_needs_samples() {
    assert!(
        ChunkSizeEstimator::measure_bytes_per_sample(&StreamSet::new(), SampleFormat::Compact, 50)
            .is_none()
    );
    let set = single_channel_set(StreamKind::HeartRate, vec![100.0, 101.0]);
    let bytes = ChunkSizeEstimator::measure_bytes_per_sample(&set, SampleFormat::Compact, 0);
    assert!(bytes.is_none());
}

#[test]
fn test_empty_set_estimates_a_positive_chunk() {
    let estimate = ChunkSizeEstimator::new(StreamDeliveryConfig::default())
        .estimate(&StreamSet::new(), SampleFormat::Compact);
    assert!(estimate.chunk_size >= 1);
    assert!(!estimate.refined);
}

#[test]
fn test_page_six_of_five_is_rejected() {
    let error = PageWindow::resolve(6, 100, 500).unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidPage);
    assert!(error.message.contains("1-5"), "{}", error.message);
}

#[test]
fn test_page_zero_and_negative_are_rejected() {
    assert!(PageWindow::resolve(0, 100, 500).is_err());
    assert!(PageWindow::resolve(-3, 100, 500).is_err());
}

#[test]
fn test_last_partial_page() {
    let window = PageWindow::resolve(3, 100, 250).unwrap();

    assert_eq!(window.range(), 200..250);
    assert_eq!(window.total_pages, 3);
    assert!(!window.has_next());
    assert!(window.has_prev());
}

#[test]
fn test_empty_dataset_has_one_empty_page() {
    assert_eq!(total_pages(0, 100), 1);
    let window = PageWindow::resolve(1, 100, 0).unwrap();
    assert!(window.range().is_empty());
    assert!(chunk_ranges(0, 100).is_empty());
}

#[test]
fn test_chunk_headers_are_self_identifying() {
    let chunks = chunk_ranges(3_840, 1_920);
    assert_eq!(chunks[0].header(chunks.len()), "Chunk 1/2 (points 0-1919)");
    assert_eq!(chunks[1].header(chunks.len()), "Chunk 2/2 (points 1920-3839)");
}
