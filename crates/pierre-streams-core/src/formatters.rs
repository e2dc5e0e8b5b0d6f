// ABOUTME: Output serialization for finished response message bodies
// ABOUTME: Writes a JSON value tree as compact JSON (default) or token-efficient TOON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Message body serialization
//!
//! Response messages are assembled as `serde_json::Value` trees and only
//! turned into text at the very end. TOON (Token-Oriented Object Notation)
//! collapses arrays of uniform records into CSV-like rows, which is where
//! verbose stream samples gain the most.
//!
//! This is independent of the compact/verbose *sample* encoding: that decides
//! the shape of each sample, this decides how the finished body is written.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
#[cfg(feature = "toon")]
use toon_format::EncodeOptions;

use crate::errors::AppError;

/// Serialization applied to a finished message body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact JSON
    #[default]
    Json,
    /// Token-Oriented Object Notation
    Toon,
}

impl OutputFormat {
    /// Parse the `output_format` request value; anything unrecognised is JSON
    #[must_use]
    pub fn from_str_param(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("toon") {
            Self::Toon
        } else {
            Self::Json
        }
    }

    /// MIME type of bodies written in this format
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            // no registered MIME type for TOON
            Self::Toon => "application/vnd.toon",
        }
    }

    /// Format name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toon => "toon",
        }
    }

    fn write(self, body: &Value) -> Result<String, FormatError> {
        match self {
            Self::Json => serde_json::to_string(body).map_err(|e| FormatError::new(self, e)),
            Self::Toon => write_toon(body),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A written message body
#[derive(Debug, Clone)]
pub struct FormattedOutput {
    /// Body text
    pub data: String,
    /// Format the body was written in
    pub format: OutputFormat,
    /// MIME type of `data`
    pub content_type: &'static str,
}

/// Failure to write a message body
#[derive(Debug, Clone, Error)]
#[error("Format error ({format}): {message}")]
pub struct FormatError {
    /// What went wrong
    pub message: String,
    /// Format being written
    pub format: OutputFormat,
}

impl FormatError {
    fn new(format: OutputFormat, message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
            format,
        }
    }
}

impl From<FormatError> for AppError {
    fn from(error: FormatError) -> Self {
        Self::serialization(error.to_string())
    }
}

/// Write a message body in the requested format
///
/// # Errors
///
/// Returns `FormatError` if the body cannot be written in `format`
pub fn format_output(body: &Value, format: OutputFormat) -> Result<FormattedOutput, FormatError> {
    let data = format.write(body)?;
    Ok(FormattedOutput {
        data,
        format,
        content_type: format.content_type(),
    })
}

#[cfg(feature = "toon")]
fn write_toon(body: &Value) -> Result<String, FormatError> {
    toon_format::encode(body, &EncodeOptions::default())
        .map_err(|e| FormatError::new(OutputFormat::Toon, e))
}

#[cfg(not(feature = "toon"))]
fn write_toon(body: &Value) -> Result<String, FormatError> {
    tracing::warn!("TOON output requested but the `toon` feature is disabled; writing JSON");
    OutputFormat::Json.write(body)
}
