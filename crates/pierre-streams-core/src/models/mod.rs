// ABOUTME: Core data models for activity stream delivery
// ABOUTME: Re-exports the channel model types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Channel kinds, samples, and channel sets
pub mod stream;

pub use stream::{
    LatLng, Resolution, SampleShape, SeriesType, StreamChannel, StreamData, StreamKind, StreamSet,
};
