// ABOUTME: Core types and constants for the Pierre activity stream pipeline
// ABOUTME: Foundation crate with the channel model, error handling, pagination, and formatters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Streams Core
//!
//! Foundation crate providing the shared types for activity stream delivery.
//! Everything here is pure data or pure arithmetic; the analysis, provider and
//! delivery layers build on top of it.
//!
//! ## Modules
//!
//! - **models**: Channel model (`StreamKind`, `StreamData`, `StreamChannel`, `StreamSet`)
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Unit conversions and stream delivery defaults
//! - **pagination**: Page windows and chunk ranges over sample indices
//! - **formatters**: Output format abstraction (JSON, TOON) for LLM-optimized serialization
//! - **numeric**: Rounding and compact JSON number helpers

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Page and chunk range arithmetic over sample indices
pub mod pagination;

/// Output format abstraction (JSON, TOON) for efficient LLM serialization
pub mod formatters;

/// Channel data model for activity streams
pub mod models;

/// Rounding and JSON number helpers shared by statistics and encoding
pub mod numeric;

pub use errors::{AppError, AppResult, ErrorCode};
pub use models::{LatLng, Resolution, SeriesType, StreamChannel, StreamData, StreamKind, StreamSet};
