// ABOUTME: Channel data model for activity telemetry streams
// ABOUTME: One sum-type variant per channel kind, each carrying its own sample element type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Channel kinds recorded by fitness platforms
///
/// The canonical (serialized) name is used for request parameters and output
/// keys. Parsing also accepts the Strava stream keys (`heartrate`, `watts`,
/// `latlng`, `velocity_smooth`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Elapsed time in seconds
    Time,
    /// Cumulative distance in meters
    Distance,
    /// GPS coordinate pairs
    Position,
    /// Elevation in meters
    Altitude,
    /// Smoothed speed in meters per second
    Speed,
    /// Heart rate in beats per minute
    HeartRate,
    /// Cadence in revolutions or steps per minute
    Cadence,
    /// Power output in watts
    Power,
    /// Temperature in degrees Celsius
    Temperature,
    /// Whether the athlete was moving
    MovingFlag,
    /// Smoothed road grade in percent
    Grade,
}

/// Element type carried by a channel kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleShape {
    /// One floating-point number per sample
    Scalar,
    /// Latitude/longitude pair per sample
    Coordinate,
    /// Boolean per sample
    Flag,
}

impl StreamKind {
    /// Every kind, in canonical order
    pub const ALL: [Self; 11] = [
        Self::Time,
        Self::Distance,
        Self::Position,
        Self::Altitude,
        Self::Speed,
        Self::HeartRate,
        Self::Cadence,
        Self::Power,
        Self::Temperature,
        Self::MovingFlag,
        Self::Grade,
    ];

    /// Canonical name used in requests and output keys
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Distance => "distance",
            Self::Position => "position",
            Self::Altitude => "altitude",
            Self::Speed => "speed",
            Self::HeartRate => "heart_rate",
            Self::Cadence => "cadence",
            Self::Power => "power",
            Self::Temperature => "temperature",
            Self::MovingFlag => "moving_flag",
            Self::Grade => "grade",
        }
    }

    /// Key used by the Strava streams API
    #[must_use]
    pub const fn strava_key(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Distance => "distance",
            Self::Position => "latlng",
            Self::Altitude => "altitude",
            Self::Speed => "velocity_smooth",
            Self::HeartRate => "heartrate",
            Self::Cadence => "cadence",
            Self::Power => "watts",
            Self::Temperature => "temp",
            Self::MovingFlag => "moving",
            Self::Grade => "grade_smooth",
        }
    }

    /// Parse a canonical or Strava name (case-insensitive)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "time" => Some(Self::Time),
            "distance" => Some(Self::Distance),
            "position" | "latlng" => Some(Self::Position),
            "altitude" => Some(Self::Altitude),
            "speed" | "velocity_smooth" => Some(Self::Speed),
            "heart_rate" | "heartrate" => Some(Self::HeartRate),
            "cadence" => Some(Self::Cadence),
            "power" | "watts" => Some(Self::Power),
            "temperature" | "temp" => Some(Self::Temperature),
            "moving_flag" | "moving" => Some(Self::MovingFlag),
            "grade" | "grade_smooth" => Some(Self::Grade),
            _ => None,
        }
    }

    /// Unit of the raw sample values
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Time => "seconds",
            Self::Distance | Self::Altitude => "meters",
            Self::Position => "degrees [latitude, longitude]",
            Self::Speed => "meters_per_second",
            Self::HeartRate => "bpm",
            Self::Cadence => "rpm",
            Self::Power => "watts",
            Self::Temperature => "celsius",
            Self::MovingFlag => "boolean",
            Self::Grade => "percent",
        }
    }

    /// Short human-facing description of the channel
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Time => "Elapsed time since the activity started",
            Self::Distance => "Cumulative distance covered",
            Self::Position => "GPS latitude/longitude pairs",
            Self::Altitude => "Elevation above sea level",
            Self::Speed => "Smoothed instantaneous speed",
            Self::HeartRate => "Heart rate",
            Self::Cadence => "Pedal or step cadence",
            Self::Power => "Power output",
            Self::Temperature => "Ambient temperature reported by the device",
            Self::MovingFlag => "Whether the athlete was moving at this sample",
            Self::Grade => "Smoothed road grade",
        }
    }

    /// Element type of this kind's samples
    #[must_use]
    pub const fn sample_shape(&self) -> SampleShape {
        match self {
            Self::Position => SampleShape::Coordinate,
            Self::MovingFlag => SampleShape::Flag,
            Self::Time
            | Self::Distance
            | Self::Altitude
            | Self::Speed
            | Self::HeartRate
            | Self::Cadence
            | Self::Power
            | Self::Temperature
            | Self::Grade => SampleShape::Scalar,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(Self::as_str).collect();
            AppError::invalid_input(format!(
                "Unknown stream type '{s}'. Valid types: {}",
                valid.join(", ")
            ))
        })
    }
}

/// Axis a channel is naturally indexed by (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesType {
    /// Indexed by elapsed time
    #[default]
    Time,
    /// Indexed by cumulative distance
    Distance,
}

impl SeriesType {
    /// Parse from a request parameter, falling back to `Time`
    #[must_use]
    pub fn from_str_param(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "distance" => Self::Distance,
            _ => Self::Time,
        }
    }

    /// Get the name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Distance => "distance",
        }
    }
}

/// Coarse density classification of a channel (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Roughly 100 samples
    Low,
    /// Roughly 1000 samples
    Medium,
    /// Full recording density
    #[default]
    High,
}

impl Resolution {
    /// Parse from a request parameter or upstream tag
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Classify by sample count when upstream does not report a tag
    #[must_use]
    pub const fn classify(sample_count: usize) -> Self {
        if sample_count <= 100 {
            Self::Low
        } else if sample_count <= 1000 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Get the name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// GPS coordinate pair in degrees
///
/// Serializes as a bare `[latitude, longitude]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl LatLng {
    /// Create a coordinate pair
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(value: LatLng) -> Self {
        [value.lat, value.lng]
    }
}

/// Samples of one channel, tagged by kind
///
/// Each variant carries the element type its kind requires, so consumers can
/// match exhaustively instead of probing shapes at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamData {
    /// Elapsed seconds
    Time(Vec<f64>),
    /// Cumulative meters
    Distance(Vec<f64>),
    /// Coordinate pairs
    Position(Vec<LatLng>),
    /// Elevation meters
    Altitude(Vec<f64>),
    /// Meters per second
    Speed(Vec<f64>),
    /// Beats per minute
    HeartRate(Vec<f64>),
    /// Revolutions or steps per minute
    Cadence(Vec<f64>),
    /// Watts
    Power(Vec<f64>),
    /// Degrees Celsius
    Temperature(Vec<f64>),
    /// Moving flags
    MovingFlag(Vec<bool>),
    /// Percent grade
    Grade(Vec<f64>),
}

/// Apply an expression to the sample vector of any variant, rebuilding the same variant
macro_rules! map_samples {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            StreamData::Time($values) => StreamData::Time($body),
            StreamData::Distance($values) => StreamData::Distance($body),
            StreamData::Position($values) => StreamData::Position($body),
            StreamData::Altitude($values) => StreamData::Altitude($body),
            StreamData::Speed($values) => StreamData::Speed($body),
            StreamData::HeartRate($values) => StreamData::HeartRate($body),
            StreamData::Cadence($values) => StreamData::Cadence($body),
            StreamData::Power($values) => StreamData::Power($body),
            StreamData::Temperature($values) => StreamData::Temperature($body),
            StreamData::MovingFlag($values) => StreamData::MovingFlag($body),
            StreamData::Grade($values) => StreamData::Grade($body),
        }
    };
}

/// Evaluate an expression against the sample vector of any variant
macro_rules! with_samples {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            StreamData::Time($values)
            | StreamData::Distance($values)
            | StreamData::Altitude($values)
            | StreamData::Speed($values)
            | StreamData::HeartRate($values)
            | StreamData::Cadence($values)
            | StreamData::Power($values)
            | StreamData::Temperature($values)
            | StreamData::Grade($values) => $body,
            StreamData::Position($values) => $body,
            StreamData::MovingFlag($values) => $body,
        }
    };
}

impl StreamData {
    /// Build a scalar channel; returns `None` for coordinate and flag kinds
    #[must_use]
    pub fn from_scalars(kind: StreamKind, values: Vec<f64>) -> Option<Self> {
        let data = match kind {
            StreamKind::Time => Self::Time(values),
            StreamKind::Distance => Self::Distance(values),
            StreamKind::Altitude => Self::Altitude(values),
            StreamKind::Speed => Self::Speed(values),
            StreamKind::HeartRate => Self::HeartRate(values),
            StreamKind::Cadence => Self::Cadence(values),
            StreamKind::Power => Self::Power(values),
            StreamKind::Temperature => Self::Temperature(values),
            StreamKind::Grade => Self::Grade(values),
            StreamKind::Position | StreamKind::MovingFlag => return None,
        };
        Some(data)
    }

    /// An empty channel of the given kind
    #[must_use]
    pub fn empty(kind: StreamKind) -> Self {
        match kind {
            StreamKind::Position => Self::Position(Vec::new()),
            StreamKind::MovingFlag => Self::MovingFlag(Vec::new()),
            scalar => Self::from_scalars(scalar, Vec::new()).unwrap_or(Self::Time(Vec::new())),
        }
    }

    /// Kind tag of this channel
    #[must_use]
    pub const fn kind(&self) -> StreamKind {
        match self {
            Self::Time(_) => StreamKind::Time,
            Self::Distance(_) => StreamKind::Distance,
            Self::Position(_) => StreamKind::Position,
            Self::Altitude(_) => StreamKind::Altitude,
            Self::Speed(_) => StreamKind::Speed,
            Self::HeartRate(_) => StreamKind::HeartRate,
            Self::Cadence(_) => StreamKind::Cadence,
            Self::Power(_) => StreamKind::Power,
            Self::Temperature(_) => StreamKind::Temperature,
            Self::MovingFlag(_) => StreamKind::MovingFlag,
            Self::Grade(_) => StreamKind::Grade,
        }
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        with_samples!(self, values => values.len())
    }

    /// Whether the channel has no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric samples, for scalar kinds only
    #[must_use]
    pub fn scalars(&self) -> Option<&[f64]> {
        match self {
            Self::Time(values)
            | Self::Distance(values)
            | Self::Altitude(values)
            | Self::Speed(values)
            | Self::HeartRate(values)
            | Self::Cadence(values)
            | Self::Power(values)
            | Self::Temperature(values)
            | Self::Grade(values) => Some(values),
            Self::Position(_) | Self::MovingFlag(_) => None,
        }
    }

    /// Keep only the samples at `indices` (ascending); out-of-range indices are skipped
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        map_samples!(self, values => pick(values, indices))
    }

    /// Contiguous slice of samples, clamped to the channel length
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        map_samples!(self, values => clamp_slice(values, &range).to_vec())
    }
}

fn pick<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices
        .iter()
        .filter_map(|&index| values.get(index).copied())
        .collect()
}

fn clamp_slice<'a, T>(values: &'a [T], range: &Range<usize>) -> &'a [T] {
    let end = range.end.min(values.len());
    let start = range.start.min(end);
    &values[start..end]
}

/// One named time series with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct StreamChannel {
    /// Samples, tagged by kind
    pub data: StreamData,
    /// Axis the channel is naturally indexed by
    pub series_type: SeriesType,
    /// Sample count before any reduction
    pub original_size: usize,
    /// Density classification
    pub resolution: Resolution,
}

impl StreamChannel {
    /// Wrap samples, recording their count as the original size
    #[must_use]
    pub fn new(data: StreamData) -> Self {
        let original_size = data.len();
        Self {
            data,
            series_type: SeriesType::Time,
            original_size,
            resolution: Resolution::classify(original_size),
        }
    }

    /// Set the base axis
    #[must_use]
    pub const fn with_series_type(mut self, series_type: SeriesType) -> Self {
        self.series_type = series_type;
        self
    }

    /// Set the original (pre-reduction) size reported upstream
    #[must_use]
    pub const fn with_original_size(mut self, original_size: usize) -> Self {
        self.original_size = original_size;
        self
    }

    /// Set the resolution tag
    #[must_use]
    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Kind tag of this channel
    #[must_use]
    pub const fn kind(&self) -> StreamKind {
        self.data.kind()
    }

    /// Number of samples currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the channel holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Same provenance, different samples
    #[must_use]
    pub fn with_data(&self, data: StreamData) -> Self {
        Self {
            data,
            series_type: self.series_type,
            original_size: self.original_size,
            resolution: self.resolution,
        }
    }
}

/// The channels fetched for one activity, keyed and ordered by kind
///
/// Index `i` of every channel refers to the same instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamSet {
    channels: BTreeMap<StreamKind, StreamChannel>,
}

impl StreamSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a channel, replacing any existing channel of the same kind
    pub fn insert(&mut self, channel: StreamChannel) {
        self.channels.insert(channel.kind(), channel);
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_channel(mut self, channel: StreamChannel) -> Self {
        self.insert(channel);
        self
    }

    /// Channel of the given kind, if present
    #[must_use]
    pub fn get(&self, kind: StreamKind) -> Option<&StreamChannel> {
        self.channels.get(&kind)
    }

    /// Channels in canonical kind order
    pub fn channels(&self) -> impl Iterator<Item = &StreamChannel> {
        self.channels.values()
    }

    /// Kinds present, in canonical order
    #[must_use]
    pub fn kinds(&self) -> Vec<StreamKind> {
        self.channels.keys().copied().collect()
    }

    /// Number of channels
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Sample count shared by the channels (longest channel if upstream was unaligned)
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.channels.values().map(StreamChannel::len).max().unwrap_or(0)
    }

    /// Resolution tag of the set (first channel's)
    #[must_use]
    pub fn resolution(&self) -> Option<Resolution> {
        self.channels.values().next().map(|channel| channel.resolution)
    }

    /// Base axis of the set (first channel's)
    #[must_use]
    pub fn series_type(&self) -> Option<SeriesType> {
        self.channels.values().next().map(|channel| channel.series_type)
    }

    /// Keep only the requested kinds
    #[must_use]
    pub fn retain_kinds(mut self, kinds: &[StreamKind]) -> Self {
        self.channels.retain(|kind, _| kinds.contains(kind));
        self
    }

    /// Apply the same index selection to every channel
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        self.map_channels(|channel| channel.with_data(channel.data.select(indices)))
    }

    /// Slice every channel to the same index range
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        self.map_channels(|channel| channel.with_data(channel.data.slice(range.clone())))
    }

    fn map_channels(&self, f: impl Fn(&StreamChannel) -> StreamChannel) -> Self {
        Self {
            channels: self
                .channels
                .iter()
                .map(|(kind, channel)| (*kind, f(channel)))
                .collect(),
        }
    }
}

impl FromIterator<StreamChannel> for StreamSet {
    fn from_iter<I: IntoIterator<Item = StreamChannel>>(iter: I) -> Self {
        let mut set = Self::new();
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_accepts_strava_keys() {
        assert_eq!(StreamKind::parse("heartrate"), Some(StreamKind::HeartRate));
        assert_eq!(StreamKind::parse("WATTS"), Some(StreamKind::Power));
        assert_eq!(StreamKind::parse("latlng"), Some(StreamKind::Position));
        assert_eq!(StreamKind::parse("heart_rate"), Some(StreamKind::HeartRate));
        assert_eq!(StreamKind::parse("nope"), None);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in StreamKind::ALL {
            assert_eq!(StreamKind::parse(kind.as_str()), Some(kind));
            assert_eq!(StreamKind::parse(kind.strava_key()), Some(kind));
        }
    }

    #[test]
    fn test_select_skips_out_of_range() {
        let data = StreamData::HeartRate(vec![1.0, 2.0, 3.0]);
        assert_eq!(data.select(&[0, 2, 9]), StreamData::HeartRate(vec![1.0, 3.0]));
    }

    #[test]
    fn test_slice_clamps() {
        let data = StreamData::MovingFlag(vec![true, false, true]);
        assert_eq!(data.slice(1..10), StreamData::MovingFlag(vec![false, true]));
        assert!(data.slice(5..10).is_empty());
    }

    #[test]
    fn test_latlng_serializes_as_pair() {
        let json = serde_json::to_string(&LatLng::new(45.5, -122.25)).expect("serialize");
        assert_eq!(json, "[45.5,-122.25]");
    }
}
