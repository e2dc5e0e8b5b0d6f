// ABOUTME: Integration tests for JSON and TOON message serialization
// ABOUTME: Checks format selection and that tabular stream records shrink under TOON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_streams::core::formatters::{format_output, FormatError, OutputFormat};
use pierre_streams::core::{AppError, StreamData};
use pierre_streams::encoding::{EncodeSamples, SampleFormat};
use serde_json::json;

#[test]
fn test_output_format_from_str() {
    assert_eq!(OutputFormat::from_str_param("json"), OutputFormat::Json);
    assert_eq!(OutputFormat::from_str_param("TOON"), OutputFormat::Toon);
    // Unknown defaults to JSON
    assert_eq!(OutputFormat::from_str_param("xml"), OutputFormat::Json);
    assert_eq!(OutputFormat::default(), OutputFormat::Json);
}

#[test]
fn test_output_format_content_type() {
    assert_eq!(OutputFormat::Json.content_type(), "application/json");
    assert_eq!(OutputFormat::Toon.content_type(), "application/vnd.toon");
}

#[test]
fn test_format_json_is_compact() {
    let output = format_output(&json!({ "data": { "heart_rate": [120, 125] } }), OutputFormat::Json)
        .unwrap();
    assert_eq!(output.data, r#"{"data":{"heart_rate":[120,125]}}"#);
    assert_eq!(output.format, OutputFormat::Json);
}

#[test]
fn test_verbose_records_shrink_under_toon() {
    let time = StreamData::Time((0..200).map(f64::from).collect()).encode(SampleFormat::Verbose);
    let body = json!({ "data": { "time": time } });

    let json_output = format_output(&body, OutputFormat::Json).unwrap();
    let toon_output = format_output(&body, OutputFormat::Toon).unwrap();

    assert!(
        toon_output.data.len() < json_output.data.len(),
        "TOON ({} bytes) should be smaller than JSON ({} bytes) for uniform records",
        toon_output.data.len(),
        json_output.data.len()
    );
    assert!(toon_output.data.contains("clock_formatted"));
}

#[test]
fn test_format_error_becomes_serialization_error() {
    let error = FormatError {
        message: "boom".to_owned(),
        format: OutputFormat::Toon,
    };
    let app_error = AppError::from(error);
    assert!(app_error.message.contains("boom"));
}
