// ABOUTME: Configuration module for the stream delivery service
// ABOUTME: Environment-only configuration covering upstream access, message budgets, and downsampling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read from environment variables only; there is no config file.

/// Environment and server configuration
pub mod environment;

pub use environment::{ServerConfig, StravaConfig, StreamDeliveryConfig};
