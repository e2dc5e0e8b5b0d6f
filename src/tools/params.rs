// ABOUTME: Typed parameter parsing for the activity stream tools
// ABOUTME: Validates ids, stream types, sample format, paging, and output format from JSON arguments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_streams_core::formatters::OutputFormat;
use pierre_streams_core::{AppError, AppResult, Resolution, SeriesType, StreamKind};
use pierre_streams_providers::{is_numeric_id, StreamQuery};
use serde_json::Value;

use crate::assembler::{PageRequest, ShapeOptions};
use crate::encoding::SampleFormat;

/// Shaping parameters shared by the single and bulk tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapingParams {
    /// Requested channel kinds
    pub kinds: Vec<StreamKind>,
    /// Encoding, ceiling, and paging
    pub shape: ShapeOptions,
    /// Base axis forwarded upstream
    pub series_type: SeriesType,
    /// Density forwarded upstream
    pub resolution: Resolution,
    /// Message serialization
    pub output_format: OutputFormat,
}

impl ShapingParams {
    /// Parse shaping parameters from tool arguments
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for any malformed parameter
    pub fn from_args(args: &Value, default_points_per_page: usize) -> AppResult<Self> {
        let kinds = parse_stream_types(args.get("stream_types"))?;
        let format = optional_str(args, "format")?
            .map_or(Ok(SampleFormat::default()), SampleFormat::parse)?;
        let max_points = optional_int(args, "max_points")?
            .map(|n| {
                usize::try_from(n).ok().filter(|&n| n > 0).ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "max_points must be a positive integer, got {n}"
                    ))
                })
            })
            .transpose()?;
        let page = optional_int(args, "page")?.unwrap_or(1);
        let default_per_page = i64::try_from(default_points_per_page).unwrap_or(i64::MAX);
        let points_per_page = optional_int(args, "points_per_page")?.unwrap_or(default_per_page);
        let paging = PageRequest::from_params(page, points_per_page)?;

        let series_type = optional_str(args, "series_type")?
            .map(SeriesType::from_str_param)
            .unwrap_or_default();
        let resolution = optional_str(args, "resolution")?
            .map(|raw| {
                Resolution::parse(raw).ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "Invalid resolution '{raw}'. Valid values: low, medium, high"
                    ))
                })
            })
            .transpose()?
            .unwrap_or_default();
        let output_format = optional_str(args, "output_format")?
            .map(OutputFormat::from_str_param)
            .unwrap_or_default();

        Ok(Self {
            kinds,
            shape: ShapeOptions {
                format,
                max_points,
                paging,
            },
            series_type,
            resolution,
            output_format,
        })
    }

    /// Upstream query for these parameters
    #[must_use]
    pub fn query(&self) -> StreamQuery {
        StreamQuery::new(self.kinds.clone())
            .with_series_type(self.series_type)
            .with_resolution(self.resolution)
    }
}

/// Arguments of `get_activity_streams`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamToolParams {
    /// Activity to fetch
    pub activity_id: String,
    /// Shaping parameters
    pub shaping: ShapingParams,
}

impl StreamToolParams {
    /// Parse tool arguments
    ///
    /// # Errors
    ///
    /// Returns a missing-field error without `activity_id`, or an
    /// invalid-input error for any malformed parameter
    pub fn from_args(args: &Value, default_points_per_page: usize) -> AppResult<Self> {
        let activity_id = args
            .get("activity_id")
            .ok_or_else(|| AppError::missing_field("activity_id"))
            .and_then(|value| parse_activity_id(value, "activity_id"))?;
        Ok(Self {
            activity_id,
            shaping: ShapingParams::from_args(args, default_points_per_page)?,
        })
    }
}

/// Arguments of `get_bulk_activity_streams`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkStreamToolParams {
    /// Activities to fetch, in response order
    pub activity_ids: Vec<String>,
    /// Shaping parameters applied to every activity
    pub shaping: ShapingParams,
}

impl BulkStreamToolParams {
    /// Parse tool arguments
    ///
    /// # Errors
    ///
    /// Returns an error when `activity_ids` is missing or empty, when chunked
    /// delivery is requested, or for any malformed parameter
    pub fn from_args(args: &Value, default_points_per_page: usize) -> AppResult<Self> {
        let ids = args
            .get("activity_ids")
            .ok_or_else(|| AppError::missing_field("activity_ids"))?
            .as_array()
            .ok_or_else(|| AppError::invalid_input("activity_ids must be an array"))?;
        if ids.is_empty() {
            return Err(AppError::invalid_input("activity_ids must not be empty"));
        }
        let activity_ids = ids
            .iter()
            .map(|value| parse_activity_id(value, "activity_ids"))
            .collect::<AppResult<Vec<_>>>()?;

        let shaping = ShapingParams::from_args(args, default_points_per_page)?;
        if shaping.shape.paging == PageRequest::All {
            return Err(AppError::invalid_input(
                "points_per_page=-1 (all data) is not supported for bulk requests; \
                 request activities individually for chunked delivery",
            ));
        }
        Ok(Self {
            activity_ids,
            shaping,
        })
    }
}

fn parse_activity_id(value: &Value, field: &str) -> AppResult<String> {
    match value {
        Value::String(id) if is_numeric_id(id.trim()) => Ok(id.trim().to_owned()),
        Value::Number(id) if id.is_u64() => Ok(id.to_string()),
        other => Err(AppError::invalid_input(format!(
            "{field} must contain numeric activity IDs (digits only), got {other}"
        ))),
    }
}

fn parse_stream_types(value: Option<&Value>) -> AppResult<Vec<StreamKind>> {
    let names: Vec<&str> = match value {
        None | Some(Value::Null) => return Ok(StreamKind::ALL.to_vec()),
        Some(Value::String(list)) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| {
                    AppError::invalid_input(format!("stream_types entries must be strings, got {item}"))
                })
            })
            .collect::<AppResult<_>>()?,
        Some(other) => {
            return Err(AppError::invalid_input(format!(
                "stream_types must be an array or comma-separated string, got {other}"
            )))
        }
    };
    if names.is_empty() {
        return Err(AppError::invalid_input("stream_types must not be empty"));
    }

    let mut kinds = Vec::with_capacity(names.len());
    for name in names {
        let kind: StreamKind = name.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

fn optional_str<'a>(args: &'a Value, key: &str) -> AppResult<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(AppError::invalid_input(format!(
            "{key} must be a string, got {other}"
        ))),
    }
}

fn optional_int(args: &Value, key: &str) -> AppResult<Option<i64>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            AppError::invalid_input(format!("{key} must be an integer, got {value}"))
        }),
    }
}
