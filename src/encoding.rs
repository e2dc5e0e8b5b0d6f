// ABOUTME: Compact and verbose wire encodings of stream samples
// ABOUTME: Compact emits bare arrays; verbose wraps samples with derived human-facing units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sample Encoding
//!
//! Two encodings of the same samples:
//!
//! - **Compact** (default): the raw array. Numbers, `[lat, lng]` pairs, or booleans.
//! - **Verbose**: time, distance, speed, and position samples become small
//!   records carrying the raw value next to a derived one (`HH:MM:SS`, km, km/h,
//!   rounded degrees). Grade is rounded to one decimal. The remaining scalar
//!   kinds and moving flags stay bare.
//!
//! Encoding never touches statistics; those are computed from the channel
//! model before any encoding happens.

use std::fmt;

use pierre_streams_core::constants::precision::{
    COORDINATE_DECIMALS, GRADE_DECIMALS, KILOMETERS_DECIMALS, KMH_DECIMALS,
};
use pierre_streams_core::constants::units::{
    METERS_PER_KM, MPS_TO_KMH, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use pierre_streams_core::numeric::{json_number, round_to};
use pierre_streams_core::{AppError, AppResult, LatLng, StreamData, StreamSet};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Per-sample encoding selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Bare arrays, minimal size
    #[default]
    Compact,
    /// Structured records with derived units
    Verbose,
}

impl SampleFormat {
    /// Parse a request parameter (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for anything other than `compact` or `verbose`
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "verbose" => Ok(Self::Verbose),
            other => Err(AppError::invalid_input(format!(
                "Invalid format '{other}'. Valid formats: compact, verbose"
            ))),
        }
    }

    /// Get the format name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability: render a channel's samples in a wire format
pub trait EncodeSamples {
    /// Encode every sample as one JSON array
    fn encode(&self, format: SampleFormat) -> Value;
}

impl EncodeSamples for StreamData {
    fn encode(&self, format: SampleFormat) -> Value {
        match format {
            SampleFormat::Compact => encode_compact(self),
            SampleFormat::Verbose => encode_verbose(self),
        }
    }
}

fn encode_compact(data: &StreamData) -> Value {
    match data {
        StreamData::Position(points) => points
            .iter()
            .map(|p| json!([json_number(p.lat), json_number(p.lng)]))
            .collect(),
        StreamData::MovingFlag(flags) => flags.iter().copied().map(Value::Bool).collect(),
        StreamData::Time(values)
        | StreamData::Distance(values)
        | StreamData::Altitude(values)
        | StreamData::Speed(values)
        | StreamData::HeartRate(values)
        | StreamData::Cadence(values)
        | StreamData::Power(values)
        | StreamData::Temperature(values)
        | StreamData::Grade(values) => bare(values),
    }
}

fn encode_verbose(data: &StreamData) -> Value {
    match data {
        StreamData::Time(values) => values.iter().map(|&s| verbose_time(s)).collect(),
        StreamData::Distance(values) => values.iter().map(|&m| verbose_distance(m)).collect(),
        StreamData::Speed(values) => values.iter().map(|&v| verbose_speed(v)).collect(),
        StreamData::Position(points) => points.iter().map(verbose_position).collect(),
        StreamData::Grade(values) => values
            .iter()
            .map(|&g| json_number(round_to(g, GRADE_DECIMALS)))
            .collect(),
        StreamData::MovingFlag(flags) => flags.iter().copied().map(Value::Bool).collect(),
        StreamData::Altitude(values)
        | StreamData::HeartRate(values)
        | StreamData::Cadence(values)
        | StreamData::Power(values)
        | StreamData::Temperature(values) => bare(values),
    }
}

fn bare(values: &[f64]) -> Value {
    values.iter().copied().map(json_number).collect()
}

fn verbose_time(seconds: f64) -> Value {
    json!({
        "elapsed_seconds": json_number(seconds),
        "clock_formatted": clock_format(seconds),
    })
}

fn verbose_distance(meters: f64) -> Value {
    json!({
        "meters": json_number(meters),
        "kilometers": json_number(round_to(meters / METERS_PER_KM, KILOMETERS_DECIMALS)),
    })
}

fn verbose_speed(mps: f64) -> Value {
    json!({
        "meters_per_second": json_number(mps),
        "kilometers_per_hour": json_number(round_to(mps * MPS_TO_KMH, KMH_DECIMALS)),
    })
}

fn verbose_position(point: &LatLng) -> Value {
    json!({
        "latitude": json_number(round_to(point.lat, COORDINATE_DECIMALS)),
        "longitude": json_number(round_to(point.lng, COORDINATE_DECIMALS)),
    })
}

/// Elapsed seconds as `HH:MM:SS`; fractions are truncated and negatives clamp to zero
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clock_format(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Encode every channel of a set into a `{ kind: samples }` object
#[must_use]
pub fn encode_streams(streams: &StreamSet, format: SampleFormat) -> Map<String, Value> {
    streams
        .channels()
        .map(|channel| (channel.kind().as_str().to_owned(), channel.data.encode(format)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_format() {
        assert_eq!(clock_format(0.0), "00:00:00");
        assert_eq!(clock_format(59.9), "00:00:59");
        assert_eq!(clock_format(3_725.0), "01:02:05");
        assert_eq!(clock_format(-5.0), "00:00:00");
        assert_eq!(clock_format(f64::NAN), "00:00:00");
    }

    #[test]
    fn test_format_parse_rejects_unknown() {
        assert_eq!(SampleFormat::parse("VERBOSE").ok(), Some(SampleFormat::Verbose));
        assert!(SampleFormat::parse("tiny").is_err());
    }
}
