// ABOUTME: Unified error type and error codes for the stream delivery pipeline
// ABOUTME: Maps configuration, pagination, empty-result, and upstream failures to stable codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! `AppError` is the single error type that crosses crate boundaries. Every
//! failure carries an `ErrorCode` (stable, serializable) plus a human-readable
//! message that is safe to show to a tool caller, and optional structured
//! details.
//!
//! The stream pipeline itself does not fail on degenerate input (empty arrays,
//! single samples, zero totals). Errors here describe request-level problems
//! that are recovered at the boundary and rendered as plain text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the stream pipeline
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// A request parameter is malformed
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required request parameter is absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Requested page lies outside the available range
    #[serde(rename = "INVALID_PAGE")]
    InvalidPage = 3004,

    // Resource Management (4000-4999)
    /// The upstream resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Upstream returned zero channels
    #[serde(rename = "EMPTY_RESULT")]
    EmptyResult = 4004,

    // External Services (5000-5999)
    /// Upstream API call failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Upstream rejected the credential
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,

    // Configuration (6000-6999)
    /// Required configuration value is absent
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Serialization of a response failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidPage => "The requested page is out of range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::EmptyResult => "No stream data is available",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Unified error type for the stream pipeline
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured context
    pub details: Option<Value>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required parameter absent
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required parameter '{field}'"),
        )
    }

    /// Requested page outside `[1, total_pages]`
    #[must_use]
    pub fn invalid_page(page: i64, total_pages: usize, total_points: usize) -> Self {
        Self::new(
            ErrorCode::InvalidPage,
            format!(
                "Invalid page {page}: valid range is 1-{total_pages} ({total_points} points available)"
            ),
        )
        .with_details(serde_json::json!({
            "page": page,
            "total_pages": total_pages,
            "total_points": total_points,
        }))
    }

    /// Upstream returned no channels for an activity
    #[must_use]
    pub fn empty_result(activity_id: &str) -> Self {
        Self::new(
            ErrorCode::EmptyResult,
            format!(
                "No stream data available for activity {activity_id}. \
                 Manual entries and older activities often have no recorded telemetry, \
                 and some channels only exist when the matching sensor was paired."
            ),
        )
    }

    /// Required credential or parameter absent from configuration
    #[must_use]
    pub fn config_missing(key: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("Missing configuration: {key} must be set"),
        )
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service rejected the credential
    #[must_use]
    pub fn external_auth_failed(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalAuthFailed,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Serialization failure
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Render the error as the plain-text body returned to tool callers
    #[must_use]
    pub fn to_user_text(&self) -> String {
        format!("Error ({}): {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
