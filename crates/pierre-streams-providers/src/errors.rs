// ABOUTME: Structured error types for activity stream fetch operations
// ABOUTME: Carries upstream status codes and annotates failures with likely causes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_streams_core::AppError;
use serde_json::json;
use thiserror::Error;

/// Failure fetching streams from an upstream provider
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// No access token was supplied for the request
    #[error("{provider} access token is not configured")]
    MissingCredentials {
        /// Provider name
        provider: &'static str,
    },

    /// Activity identifier is not a numeric upstream id
    #[error("{provider} activity id '{activity_id}' is not numeric")]
    InvalidActivityId {
        /// Provider name
        provider: &'static str,
        /// Identifier as received
        activity_id: String,
    },

    /// Upstream answered with a non-success status
    #[error("{provider} API returned status {status}: {message}")]
    Api {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Request never produced a response
    #[error("{provider} request failed: {message}")]
    Network {
        /// Provider name
        provider: &'static str,
        /// Transport error text
        message: String,
    },

    /// Response body could not be interpreted
    #[error("{provider} response could not be parsed: {message}")]
    Parse {
        /// Provider name
        provider: &'static str,
        /// Parser error text
        message: String,
    },
}

impl ProviderError {
    /// Provider that produced the error
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::MissingCredentials { provider }
            | Self::InvalidActivityId { provider, .. }
            | Self::Api { provider, .. }
            | Self::Network { provider, .. }
            | Self::Parse { provider, .. } => provider,
        }
    }

    /// Upstream HTTP status, when one was received
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Explanations worth showing next to an upstream failure
    #[must_use]
    pub fn likely_causes(&self) -> Vec<&'static str> {
        match self {
            Self::MissingCredentials { .. } => vec!["The access token environment variable is unset"],
            Self::InvalidActivityId { .. } => {
                vec!["Activity IDs are the numeric IDs shown in activity URLs"]
            }
            Self::Api { status: 401, .. } => vec![
                "The access token has expired or was revoked",
                "The token lacks the activity:read_all scope",
            ],
            Self::Api { status: 403, .. } => vec![
                "The activity belongs to another athlete and is private",
                "The token lacks permission to read this activity",
            ],
            Self::Api { status: 404, .. } => vec![
                "The activity ID is invalid or was deleted",
                "The requested stream type is not recorded for this activity",
            ],
            Self::Api { status: 429, .. } => vec!["The upstream rate limit was exceeded"],
            Self::Api { .. } => vec![
                "The activity ID is invalid",
                "The token does not have permission to read this activity",
                "A requested stream type is not supported for this activity",
                "The activity data has been archived",
            ],
            Self::Network { .. } => vec!["The upstream API is unreachable or timed out"],
            Self::Parse { .. } => vec!["The upstream API changed its response format"],
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        let causes = error.likely_causes();
        let message = format!("{error}. Likely causes: {}", causes.join("; "));
        let details = json!({
            "provider": error.provider(),
            "status": error.status(),
            "likely_causes": causes,
        });

        let app_error = match &error {
            ProviderError::MissingCredentials { provider } => {
                Self::config_missing(&format!("{}_ACCESS_TOKEN", provider.to_uppercase()))
            }
            ProviderError::InvalidActivityId { .. } => Self::invalid_input(message),
            ProviderError::Api {
                status: 401 | 403,
                provider,
                ..
            } => Self::external_auth_failed(*provider, message),
            ProviderError::Api { status: 404, .. } => Self::not_found(message),
            _ => Self::external_service(error.provider(), message),
        };
        app_error.with_details(details)
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
