// ABOUTME: Response assembly for activity streams in single-page or chunked delivery
// ABOUTME: Applies downsampling, computes statistics once, and builds the metadata envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Response Assembly
//!
//! Per request: `fetched -> [downsampled] -> statistics -> {paginate | chunk} -> encoded`.
//! Nothing is kept between requests.
//!
//! - **Page mode** emits one message: `{ metadata, statistics, data }` for the
//!   requested page.
//! - **Chunked mode** emits `{ metadata, statistics }` first, then one message
//!   per chunk made of a `Chunk i/n (points a-b)` header line and a
//!   `{ data }` body for that slice only. The chunk ranges cover every sample
//!   exactly once.
//!
//! Downsampling composes with both modes: the reduced count is what gets paged
//! or chunked, and the envelope reports the original count.

use std::collections::BTreeMap;

use pierre_streams_analysis::{
    compute_statistics, downsample_streams, DownsampleConfig, ReductionOutcome, StatisticsMap,
};
use pierre_streams_core::constants::delivery::ALL_POINTS_SENTINEL;
use pierre_streams_core::formatters::{format_output, OutputFormat};
use pierre_streams_core::pagination::{chunk_ranges, ChunkRange, PageWindow};
use pierre_streams_core::{AppError, AppResult, Resolution, SeriesType, StreamKind, StreamSet};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::chunking::ChunkSizeEstimator;
use crate::config::StreamDeliveryConfig;
use crate::encoding::{encode_streams, SampleFormat};

/// Which slice of the dataset to deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// One page of `points_per_page` samples (1-based `page`)
    Page {
        /// Requested page; validated against the dataset during assembly
        page: i64,
        /// Samples per page
        points_per_page: usize,
    },
    /// Every sample, split into size-bounded chunks
    All,
}

impl PageRequest {
    /// Interpret `page` / `points_per_page` request values
    ///
    /// `points_per_page == -1` requests chunked delivery of the whole dataset.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a zero or negative page size other
    /// than the sentinel
    pub fn from_params(page: i64, points_per_page: i64) -> AppResult<Self> {
        if points_per_page == ALL_POINTS_SENTINEL {
            return Ok(Self::All);
        }
        let points_per_page = usize::try_from(points_per_page)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "points_per_page must be a positive integer or {ALL_POINTS_SENTINEL} for all data, got {points_per_page}"
                ))
            })?;
        Ok(Self::Page {
            page,
            points_per_page,
        })
    }
}

/// How the caller wants the samples shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeOptions {
    /// Per-sample encoding
    pub format: SampleFormat,
    /// Sample ceiling triggering downsampling
    pub max_points: Option<usize>,
    /// Page or chunked delivery
    pub paging: PageRequest,
}

/// Position of a message within the response, flattened into the metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeliveryPosition {
    /// Single-page mode
    Page {
        /// 1-based page index
        current_page: usize,
        /// Number of pages
        total_pages: usize,
        /// Page size
        points_per_page: usize,
        /// Whether a later page exists
        has_more: bool,
        /// Whether an earlier page exists
        has_previous: bool,
    },
    /// Chunked mode
    Chunked {
        /// Number of chunk messages following the metadata message
        total_chunks: usize,
        /// Samples per chunk (the last chunk may be shorter)
        chunk_size: usize,
    },
}

/// Metadata envelope attached to every response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetadata {
    /// Activity the streams belong to
    pub activity_id: String,
    /// Channel kinds present in the response
    pub available_types: Vec<StreamKind>,
    /// Samples available after any downsampling
    pub total_points: usize,
    /// Page or chunk position
    #[serde(flatten)]
    pub position: DeliveryPosition,
    /// Per-sample encoding used in `data`
    pub format: SampleFormat,
    /// Unit of each channel's raw values
    pub units: BTreeMap<StreamKind, &'static str>,
    /// Short description of each channel
    pub stream_descriptions: BTreeMap<StreamKind, &'static str>,
    /// Present (true) only when samples were dropped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downsampled: Option<bool>,
    /// Sample count before downsampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_points: Option<usize>,
    /// Axis the channels are indexed by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_type: Option<SeriesType>,
    /// Density tag reported upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

/// One outgoing message: optional header line plus a JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    /// Self-identifying header for chunk messages
    pub header: Option<String>,
    /// Message body
    pub body: Value,
}

impl ResponseMessage {
    /// Render header and body as one text block
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body cannot be written in `output`
    pub fn render(&self, output: OutputFormat) -> AppResult<String> {
        let body = format_output(&self.body, output)?.data;
        Ok(match &self.header {
            Some(header) => format!("{header}\n{body}"),
            None => body,
        })
    }
}

/// Everything produced for one activity
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledResponse {
    /// Envelope shared by all messages
    pub metadata: ResponseMetadata,
    /// Statistics shared by all messages
    pub statistics: StatisticsMap,
    /// Downsampling outcome
    pub outcome: ReductionOutcome,
    /// Chunk ranges, in chunked mode
    pub chunks: Vec<ChunkRange>,
    /// Messages in delivery order
    pub messages: Vec<ResponseMessage>,
}

impl AssembledResponse {
    /// Render every message
    ///
    /// # Errors
    ///
    /// Returns a serialization error if any message cannot be rendered
    pub fn render(&self, output: OutputFormat) -> AppResult<Vec<String>> {
        self.messages.iter().map(|m| m.render(output)).collect()
    }
}

/// Turns fetched channels into response messages
#[derive(Debug, Clone, Copy)]
pub struct StreamAssembler {
    delivery: StreamDeliveryConfig,
    downsample: DownsampleConfig,
}

impl StreamAssembler {
    /// Assembler over the given budgets and downsampling tunables
    #[must_use]
    pub const fn new(delivery: StreamDeliveryConfig, downsample: DownsampleConfig) -> Self {
        Self {
            delivery,
            downsample,
        }
    }

    /// Assemble the response for one activity's channels
    ///
    /// # Errors
    ///
    /// - `EMPTY_RESULT` if `streams` holds no channels
    /// - `INVALID_INPUT` for a zero `max_points`
    /// - `INVALID_PAGE` if the requested page is outside `[1, total_pages]`
    pub fn assemble(
        &self,
        activity_id: &str,
        streams: StreamSet,
        options: &ShapeOptions,
    ) -> AppResult<AssembledResponse> {
        if streams.is_empty() {
            return Err(AppError::empty_result(activity_id));
        }

        let (streams, outcome) = match options.max_points {
            Some(0) => {
                return Err(AppError::invalid_input(
                    "max_points must be a positive integer",
                ))
            }
            Some(ceiling) => downsample_streams(streams, ceiling, &self.downsample),
            None => {
                let total = streams.total_points();
                (streams, ReductionOutcome::unchanged(total))
            }
        };
        let prepared = Prepared {
            activity_id,
            statistics: compute_statistics(&streams),
            streams,
            outcome,
            format: options.format,
        };

        match options.paging {
            PageRequest::Page {
                page,
                points_per_page,
            } => assemble_page(prepared, page, points_per_page),
            PageRequest::All => Ok(self.assemble_chunked(prepared)),
        }
    }

    fn assemble_chunked(&self, prepared: Prepared<'_>) -> AssembledResponse {
        let Prepared {
            activity_id,
            streams,
            statistics,
            outcome,
            format,
        } = prepared;
        let estimate = ChunkSizeEstimator::new(self.delivery).estimate(&streams, format);
        let total_points = streams.total_points();
        let chunks = chunk_ranges(total_points, estimate.chunk_size);

        let position = DeliveryPosition::Chunked {
            total_chunks: chunks.len(),
            chunk_size: estimate.chunk_size,
        };
        let metadata = build_metadata(activity_id, &streams, position, format, outcome);

        let mut messages = Vec::with_capacity(chunks.len() + 1);
        messages.push(ResponseMessage {
            header: None,
            body: json!({
                "metadata": metadata,
                "statistics": statistics,
            }),
        });
        messages.extend(chunks.iter().map(|chunk| ResponseMessage {
            header: Some(chunk.header(chunks.len())),
            body: json!({ "data": encode_streams(&streams.slice(chunk.range()), format) }),
        }));

        info!(
            activity_id,
            total_points,
            chunk_size = estimate.chunk_size,
            total_chunks = chunks.len(),
            refined = estimate.refined,
            format = %format,
            downsampled = outcome.downsampled,
            "Assembled chunked stream response"
        );
        AssembledResponse {
            metadata,
            statistics,
            outcome,
            chunks,
            messages,
        }
    }
}

/// Reduced channels and their statistics, ready for paging or chunking
struct Prepared<'a> {
    activity_id: &'a str,
    streams: StreamSet,
    statistics: StatisticsMap,
    outcome: ReductionOutcome,
    format: SampleFormat,
}

fn assemble_page(
    prepared: Prepared<'_>,
    page: i64,
    points_per_page: usize,
) -> AppResult<AssembledResponse> {
    let Prepared {
        activity_id,
        streams,
        statistics,
        outcome,
        format,
    } = prepared;
    let window = PageWindow::resolve(page, points_per_page, streams.total_points())?;
    let position = DeliveryPosition::Page {
        current_page: window.page,
        total_pages: window.total_pages,
        points_per_page: window.points_per_page,
        has_more: window.has_next(),
        has_previous: window.has_prev(),
    };
    let metadata = build_metadata(activity_id, &streams, position, format, outcome);
    let data = encode_streams(&streams.slice(window.range()), format);

    let body = json!({
        "metadata": metadata,
        "statistics": statistics,
        "data": data,
    });

    info!(
        activity_id,
        page = window.page,
        total_pages = window.total_pages,
        total_points = window.total_points,
        format = %format,
        downsampled = outcome.downsampled,
        "Assembled stream page"
    );
    Ok(AssembledResponse {
        metadata,
        statistics,
        outcome,
        chunks: Vec::new(),
        messages: vec![ResponseMessage { header: None, body }],
    })
}

fn build_metadata(
    activity_id: &str,
    streams: &StreamSet,
    position: DeliveryPosition,
    format: SampleFormat,
    outcome: ReductionOutcome,
) -> ResponseMetadata {
    let kinds = streams.kinds();
    ResponseMetadata {
        activity_id: activity_id.to_owned(),
        units: kinds.iter().map(|kind| (*kind, kind.unit())).collect(),
        stream_descriptions: kinds.iter().map(|kind| (*kind, kind.description())).collect(),
        available_types: kinds,
        total_points: streams.total_points(),
        position,
        format,
        downsampled: outcome.downsampled.then_some(true),
        original_points: outcome.downsampled.then_some(outcome.original_points),
        series_type: streams.series_type(),
        resolution: streams.resolution(),
    }
}
