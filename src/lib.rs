// ABOUTME: Main library entry point for Pierre activity stream delivery
// ABOUTME: Reduces, encodes, and splits workout telemetry into size-bounded tool responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Streams
//!
//! Delivers activity telemetry (time, distance, heart rate, power, GPS, ...)
//! to language-model tool callers whose context windows bound every message.
//!
//! ## Pipeline
//!
//! fetched channels -> optional shape-preserving downsampling -> statistics ->
//! compact or verbose encoding -> one page, or a metadata message followed by
//! size-bounded chunks.
//!
//! ## Crates
//!
//! - `pierre-streams-core`: channel model, errors, page/chunk arithmetic, output formats
//! - `pierre-streams-analysis`: statistics and downsampling
//! - `pierre-streams-providers`: Strava fetch and concurrent bulk fetch
//! - this crate: encoding, chunk sizing, response assembly, tools, config, logging
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_streams::config::ServerConfig;
//! use pierre_streams::tools::StreamTools;
//! use serde_json::json;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let tools = StreamTools::from_config(&config);
//! let response = tools
//!     .get_activity_streams(&json!({ "activity_id": "123", "points_per_page": -1 }))
//!     .await;
//! for text in response.texts() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

/// Response assembly in page or chunked mode
pub mod assembler;

/// Chunk-size estimation for chunked delivery
pub mod chunking;

/// Environment-based configuration
pub mod config;

/// Compact and verbose sample encodings
pub mod encoding;

/// Structured logging setup
pub mod logging;

/// Tool handlers, parameters, and responses
pub mod tools;

pub use pierre_streams_analysis as analysis;
pub use pierre_streams_core as core;
pub use pierre_streams_providers as providers;

pub use assembler::{
    AssembledResponse, DeliveryPosition, PageRequest, ResponseMessage, ResponseMetadata,
    ShapeOptions, StreamAssembler,
};
pub use chunking::{ChunkSizeEstimate, ChunkSizeEstimator};
pub use config::{ServerConfig, StravaConfig, StreamDeliveryConfig};
pub use encoding::{encode_streams, EncodeSamples, SampleFormat};
pub use tools::{StreamTools, ToolResponse};
