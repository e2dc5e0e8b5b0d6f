// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Stream delivery defaults, statistic precision, and upstream identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Defaults here are starting values only. Everything that tunes delivery
//! (byte targets, per-sample costs, extrema heuristics) is overridable through
//! configuration.

/// Unit conversion and measurement constants
pub mod units;

/// Stream delivery defaults (chunk sizing, pagination)
pub mod delivery {
    /// Target encoded size of one output message in bytes
    pub const DEFAULT_CHUNK_BYTE_TARGET: usize = 50_000;

    /// Bytes reserved per message for headers and JSON structure
    pub const DEFAULT_STRUCTURAL_OVERHEAD_BYTES: usize = 2_000;

    /// Assumed bytes per sample per channel in compact format
    pub const DEFAULT_COMPACT_BYTES_PER_SAMPLE: usize = 25;

    /// Assumed bytes per sample per channel in verbose format
    pub const DEFAULT_VERBOSE_BYTES_PER_SAMPLE: usize = 120;

    /// Chunk size floor
    pub const DEFAULT_MIN_CHUNK_SIZE: usize = 50;

    /// Chunk size ceiling for compact format
    pub const DEFAULT_MAX_CHUNK_SIZE_COMPACT: usize = 5_000;

    /// Chunk size ceiling for verbose format
    pub const DEFAULT_MAX_CHUNK_SIZE_VERBOSE: usize = 1_000;

    /// Number of leading points encoded to calibrate bytes per sample
    pub const DEFAULT_CALIBRATION_SAMPLE_POINTS: usize = 100;

    /// Default page size in single-page mode
    pub const DEFAULT_POINTS_PER_PAGE: usize = 100;

    /// `points_per_page` value requesting the full dataset in chunks
    pub const ALL_POINTS_SENTINEL: i64 = -1;

    /// Maximum concurrent fetches in bulk mode
    pub const DEFAULT_BULK_CONCURRENCY: usize = 4;
}

/// Statistics and downsampling parameters
pub mod analysis {
    /// Decimal places kept on averages and derived statistics
    pub const STATISTIC_DECIMALS: u32 = 2;

    /// Rolling window length (samples) for normalized power
    pub const NORMALIZED_POWER_WINDOW: usize = 30;

    /// Half-width of the neighborhood inspected around each downsampling candidate
    pub const DEFAULT_EXTREMA_WINDOW: usize = 3;

    /// Relative deviation above which a neighborhood extremum is retained
    pub const DEFAULT_EXTREMA_THRESHOLD: f64 = 0.10;

    /// Smallest downsampling ceiling; first and last samples are always kept
    pub const MIN_DOWNSAMPLE_POINTS: usize = 2;
}

/// Verbose encoding precision
pub mod precision {
    /// Decimal places for kilometers
    pub const KILOMETERS_DECIMALS: u32 = 2;
    /// Decimal places for kilometers per hour
    pub const KMH_DECIMALS: u32 = 1;
    /// Decimal places for latitude and longitude
    pub const COORDINATE_DECIMALS: u32 = 6;
    /// Decimal places for grade percentage
    pub const GRADE_DECIMALS: u32 = 1;
}

/// Upstream service identifiers
pub mod service_names {
    /// Service name used in structured logs
    pub const PIERRE_STREAMS: &str = "pierre-streams";
    /// Strava provider name
    pub const STRAVA: &str = "strava";
    /// Default Strava API base URL
    pub const STRAVA_API_BASE_URL: &str = "https://www.strava.com/api/v3";
}
