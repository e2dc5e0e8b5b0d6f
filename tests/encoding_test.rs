// ABOUTME: Integration tests for compact and verbose sample encodings
// ABOUTME: Covers per-kind verbose records, bare scalar kinds, and relative payload size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{scalar_channel, single_channel_set, synthetic_ride};
use pierre_streams::core::{LatLng, StreamChannel, StreamData, StreamKind, StreamSet};
use pierre_streams::encoding::{clock_format, encode_streams, EncodeSamples, SampleFormat};
use serde_json::{json, Value};

#[test]
fn test_scalar_kinds_stay_bare_in_both_formats() {
    let set = single_channel_set(StreamKind::HeartRate, vec![120.0, 125.0, 130.0]);

    let compact = encode_streams(&set, SampleFormat::Compact);
    let verbose = encode_streams(&set, SampleFormat::Verbose);

    assert_eq!(compact["heart_rate"], json!([120, 125, 130]));
    assert_eq!(verbose["heart_rate"], json!([120, 125, 130]));
}

#[test]
fn test_verbose_time_records() {
    let data = StreamData::Time(vec![0.0, 3_725.0]);
    assert_eq!(
        data.encode(SampleFormat::Verbose),
        json!([
            { "elapsed_seconds": 0, "clock_formatted": "00:00:00" },
            { "elapsed_seconds": 3725, "clock_formatted": "01:02:05" },
        ])
    );
}

#[test]
fn test_verbose_distance_and_speed_records() {
    let distance = StreamData::Distance(vec![10_500.0]).encode(SampleFormat::Verbose);
    assert_eq!(distance, json!([{ "meters": 10500, "kilometers": 10.5 }]));

    let speed = StreamData::Speed(vec![4.5]).encode(SampleFormat::Verbose);
    assert_eq!(
        speed,
        json!([{ "meters_per_second": 4.5, "kilometers_per_hour": 16.2 }])
    );
}

#[test]
fn test_position_encodings() {
    let data = StreamData::Position(vec![LatLng::new(45.501_234_567, -73.567_891_234)]);

    assert_eq!(
        data.encode(SampleFormat::Compact),
        json!([[45.501_234_567, -73.567_891_234]])
    );
    assert_eq!(
        data.encode(SampleFormat::Verbose),
        json!([{ "latitude": 45.501_235, "longitude": -73.567_891 }])
    );
}

#[test]
fn test_grade_rounds_only_in_verbose() {
    let data = StreamData::Grade(vec![4.26789, -2.26]);
    assert_eq!(data.encode(SampleFormat::Compact), json!([4.26789, -2.26]));
    assert_eq!(data.encode(SampleFormat::Verbose), json!([4.3, -2.3]));
}

#[test]
fn test_moving_flags_are_booleans() {
    let data = StreamData::MovingFlag(vec![true, false]);
    assert_eq!(data.encode(SampleFormat::Compact), json!([true, false]));
    assert_eq!(data.encode(SampleFormat::Verbose), json!([true, false]));
}

#[test]
fn test_missing_samples_encode_as_null() {
    let set = StreamSet::new().with_channel(scalar_channel(
        StreamKind::Cadence,
        vec![80.0, f64::NAN, 82.0],
    ));
    let compact = encode_streams(&set, SampleFormat::Compact);
    assert_eq!(compact["cadence"], json!([80, null, 82]));
}

// Covers time, distance, heart rate, power, position and moving flags. Grade is
// excluded: verbose rounds it to one decimal while compact keeps raw values, so
// a high-precision grade channel can encode smaller in verbose.
#[test]
fn test_compact_is_never_larger_than_verbose() {
    let set = synthetic_ride(300);
    let compact = serde_json::to_vec(&Value::Object(encode_streams(&set, SampleFormat::Compact)))
        .unwrap()
        .len();
    let verbose = serde_json::to_vec(&Value::Object(encode_streams(&set, SampleFormat::Verbose)))
        .unwrap()
        .len();

    assert!(compact <= verbose, "compact {compact} > verbose {verbose}");
}

#[test]
fn test_encoding_keeps_every_channel() {
    let temperature = StreamChannel::new(StreamData::Temperature(vec![21.0; 5]));
    let set = synthetic_ride(5).with_channel(temperature);
    let encoded = encode_streams(&set, SampleFormat::Verbose);

    assert_eq!(encoded.len(), set.channel_count());
    for (name, samples) in &encoded {
        assert_eq!(samples.as_array().map(Vec::len), Some(5), "{name}");
    }
}

#[test]
fn test_clock_format_beyond_a_day() {
    assert_eq!(clock_format(90_061.0), "25:01:01");
}

#[test]
fn test_sample_format_serializes_lowercase() {
    assert_eq!(serde_json::to_value(SampleFormat::Verbose).unwrap(), json!("verbose"));
    assert_eq!(SampleFormat::default(), SampleFormat::Compact);
}
