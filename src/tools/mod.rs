// ABOUTME: Tool layer exposing activity stream delivery to LLM tool callers
// ABOUTME: Parameter parsing, response types, and the stream tool handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Typed tool parameter parsing
pub mod params;
/// Tool response types
pub mod result;
/// Stream tool handlers
pub mod streams;

pub use params::{BulkStreamToolParams, ShapingParams, StreamToolParams};
pub use result::{ToolContent, ToolResponse};
pub use streams::{StreamTools, GET_ACTIVITY_STREAMS, GET_BULK_ACTIVITY_STREAMS};
