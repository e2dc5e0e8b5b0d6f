// ABOUTME: Integration tests for page and chunked response assembly
// ABOUTME: Covers envelope metadata, statistics reuse, downsampling composition, and error cases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{init_test_logging, single_channel_set, synthetic_ride};
use pierre_streams::analysis::DownsampleConfig;
use pierre_streams::assembler::{
    DeliveryPosition, PageRequest, ShapeOptions, StreamAssembler,
};
use pierre_streams::config::StreamDeliveryConfig;
use pierre_streams::core::formatters::OutputFormat;
use pierre_streams::core::{ErrorCode, StreamData, StreamChannel, StreamKind, StreamSet};
use pierre_streams::encoding::SampleFormat;
use serde_json::{json, Value};

fn assembler() -> StreamAssembler {
    StreamAssembler::new(StreamDeliveryConfig::default(), DownsampleConfig::default())
}

fn page(page: i64, points_per_page: usize) -> ShapeOptions {
    ShapeOptions {
        format: SampleFormat::Compact,
        max_points: None,
        paging: PageRequest::Page {
            page,
            points_per_page,
        },
    }
}

fn all(format: SampleFormat, max_points: Option<usize>) -> ShapeOptions {
    ShapeOptions {
        format,
        max_points,
        paging: PageRequest::All,
    }
}

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("message body is JSON")
}

#[test]
fn test_small_dataset_single_page() {
    init_test_logging();
    let set = single_channel_set(StreamKind::HeartRate, vec![120.0, 125.0, 130.0]);
    let response = assembler().assemble("42", set, &page(1, 100)).unwrap();

    assert_eq!(response.messages.len(), 1);
    let body = &response.messages[0].body;
    assert_eq!(body["data"]["heart_rate"], json!([120, 125, 130]));
    assert_eq!(body["metadata"]["activity_id"], "42");
    assert_eq!(body["metadata"]["total_points"], 3);
    assert_eq!(body["metadata"]["current_page"], 1);
    assert_eq!(body["metadata"]["total_pages"], 1);
    assert_eq!(body["metadata"]["has_more"], false);
    assert_eq!(body["metadata"]["has_previous"], false);
    assert_eq!(body["metadata"]["format"], "compact");
    assert_eq!(body["metadata"]["units"]["heart_rate"], "bpm");
    assert_eq!(body["statistics"]["heart_rate"]["avg"], 125.0);
    assert!(body["metadata"].get("downsampled").is_none());
}

#[test]
fn test_middle_page_slices_every_channel() {
    let response = assembler()
        .assemble("7", synthetic_ride(250), &page(2, 100))
        .unwrap();
    let body = &response.messages[0].body;

    assert_eq!(body["data"]["time"][0], 100);
    assert_eq!(body["data"]["time"].as_array().map(Vec::len), Some(100));
    assert_eq!(body["data"]["position"].as_array().map(Vec::len), Some(100));
    assert_eq!(body["metadata"]["has_more"], true);
    assert_eq!(
        response.metadata.position,
        DeliveryPosition::Page {
            current_page: 2,
            total_pages: 3,
            points_per_page: 100,
            has_more: true,
            has_previous: true,
        }
    );
}

#[test]
fn test_statistics_cover_whole_dataset_not_page() {
    let response = assembler()
        .assemble("7", synthetic_ride(250), &page(1, 10))
        .unwrap();
    assert_eq!(response.statistics[&StreamKind::Time].count, 250);
    assert_eq!(response.messages[0].body["statistics"]["time"]["max"], 249.0);
}

#[test]
fn test_statistics_do_not_depend_on_sample_format() {
    let grade = (0..600).map(|i| f64::from(i % 17) * 0.371_9 - 2.5).collect();
    let set = synthetic_ride(600).with_channel(StreamChannel::new(StreamData::Grade(grade)));
    let shapes: [fn(SampleFormat) -> ShapeOptions; 2] = [
        |format| ShapeOptions {
            format,
            ..page(2, 100)
        },
        |format| all(format, Some(450)),
    ];

    for options in shapes {
        let compact = assembler()
            .assemble("21", set.clone(), &options(SampleFormat::Compact))
            .unwrap();
        let verbose = assembler()
            .assemble("21", set.clone(), &options(SampleFormat::Verbose))
            .unwrap();

        assert_eq!(compact.statistics, verbose.statistics);
        assert_eq!(
            compact.messages[0].body["statistics"],
            verbose.messages[0].body["statistics"]
        );
        assert!(compact.messages[0].body["statistics"]["grade"].is_object());
    }
}

#[test]
fn test_out_of_range_page_names_valid_range() {
    let set = single_channel_set(StreamKind::Time, (0..500).map(f64::from).collect());
    let error = assembler().assemble("1", set, &page(6, 100)).unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidPage);
    assert!(error.message.contains("1-5"));
}

#[test]
fn test_chunked_delivery_metadata_first() {
    let set = single_channel_set(StreamKind::Time, (0..5_000).map(f64::from).collect());
    let response = assembler()
        .assemble("99", set, &all(SampleFormat::Compact, None))
        .unwrap();

    let total_chunks = response.chunks.len();
    assert!(total_chunks >= 1);
    assert_eq!(response.messages.len(), total_chunks + 1);

    let first = &response.messages[0];
    assert!(first.header.is_none());
    assert!(first.body.get("data").is_none());
    assert_eq!(first.body["metadata"]["total_chunks"], total_chunks);
    assert_eq!(first.body["statistics"]["time"]["count"], 5_000);

    let mut delivered = 0;
    for (chunk, message) in response.chunks.iter().zip(&response.messages[1..]) {
        let header = message.header.as_deref().expect("chunk header");
        assert!(header.starts_with(&format!("Chunk {}/{total_chunks}", chunk.ordinal())));
        let samples = message.body["data"]["time"].as_array().expect("time samples");
        assert_eq!(samples.len(), chunk.len());
        assert_eq!(samples[0], chunk.start);
        delivered += samples.len();
    }
    assert_eq!(delivered, 5_000);
}

#[test]
fn test_chunk_messages_respect_byte_target() {
    let delivery = StreamDeliveryConfig::default();
    let response = assembler()
        .assemble("5", synthetic_ride(6_000), &all(SampleFormat::Verbose, None))
        .unwrap();

    for message in &response.messages[1..] {
        let bytes = message.render(OutputFormat::Json).unwrap().len();
        assert!(
            bytes <= delivery.chunk_byte_target * 2,
            "chunk of {bytes} bytes is far above the target"
        );
    }
}

#[test]
fn test_downsampling_composes_with_paging() {
    let set = single_channel_set(StreamKind::HeartRate, (120..1120).map(f64::from).collect());
    let options = ShapeOptions {
        max_points: Some(100),
        ..page(1, 500)
    };
    let response = assembler().assemble("3", set, &options).unwrap();
    let body = &response.messages[0].body;
    let samples = body["data"]["heart_rate"].as_array().unwrap();

    assert!(samples.len() <= 100);
    assert_eq!(samples.first(), Some(&json!(120)));
    assert_eq!(samples.last(), Some(&json!(1119)));
    assert_eq!(body["metadata"]["downsampled"], true);
    assert_eq!(body["metadata"]["original_points"], 1000);
    assert_eq!(body["metadata"]["total_points"], samples.len());
}

#[test]
fn test_downsampling_composes_with_chunking() {
    let response = assembler()
        .assemble("3", synthetic_ride(10_000), &all(SampleFormat::Compact, Some(400)))
        .unwrap();

    assert!(response.outcome.downsampled);
    assert!(response.metadata.total_points <= 400);
    assert_eq!(
        response.chunks.iter().map(|c| c.len()).sum::<usize>(),
        response.metadata.total_points
    );
}

#[test]
fn test_empty_set_is_an_empty_result() {
    let error = assembler()
        .assemble("11", StreamSet::new(), &page(1, 100))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::EmptyResult);
}

#[test]
fn test_zero_max_points_is_invalid() {
    let options = ShapeOptions {
        max_points: Some(0),
        ..page(1, 100)
    };
    let error = assembler()
        .assemble("11", synthetic_ride(10), &options)
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[test]
fn test_zero_length_channels_are_degenerate_but_valid() {
    let set = StreamSet::new().with_channel(StreamChannel::new(StreamData::empty(StreamKind::Power)));

    let paged = assembler().assemble("0", set.clone(), &page(1, 100)).unwrap();
    assert_eq!(paged.metadata.total_points, 0);
    assert_eq!(paged.messages[0].body["data"]["power"], json!([]));

    let chunked = assembler()
        .assemble("0", set, &all(SampleFormat::Compact, None))
        .unwrap();
    assert!(chunked.chunks.is_empty());
    assert_eq!(chunked.messages.len(), 1);
}

#[test]
fn test_rendered_chunk_has_header_line() {
    let response = assembler()
        .assemble("8", synthetic_ride(100), &all(SampleFormat::Compact, None))
        .unwrap();
    let rendered = response.render(OutputFormat::Json).unwrap();

    let (header, body) = rendered[1].split_once('\n').expect("header line");
    assert_eq!(header, "Chunk 1/1 (points 0-99)");
    assert!(parse(body)["data"]["heart_rate"].is_array());
}

#[test]
fn test_page_request_sentinel() {
    assert_eq!(PageRequest::from_params(1, -1).unwrap(), PageRequest::All);
    assert!(PageRequest::from_params(1, 0).is_err());
    assert!(PageRequest::from_params(1, -5).is_err());
}
