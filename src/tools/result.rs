// ABOUTME: Tool response types returned by the stream tool handlers
// ABOUTME: Text content items with an error flag, serialized in MCP tool-response shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Response Types
//!
//! Success and failure travel the same way: a list of text items. Failures are
//! a single plain-text item with `is_error` set, never structured JSON.

use pierre_streams_core::AppError;
use serde::{Deserialize, Serialize};

/// One content item of a tool response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    /// Plain text (JSON or TOON bodies are carried as text)
    #[serde(rename = "text")]
    Text {
        /// Message text
        text: String,
    },
}

impl ToolContent {
    /// Text carried by this item
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Content items in delivery order
    pub content: Vec<ToolContent>,
    /// Whether this response reports a failure
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResponse {
    /// Successful response with one item per message
    #[must_use]
    pub fn messages(messages: Vec<String>) -> Self {
        Self {
            content: messages
                .into_iter()
                .map(|text| ToolContent::Text { text })
                .collect(),
            is_error: false,
        }
    }

    /// Successful single-message response
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self::messages(vec![message.into()])
    }

    /// Failure rendered as user-facing plain text
    #[must_use]
    pub fn error(error: &AppError) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: error.to_user_text(),
            }],
            is_error: true,
        }
    }

    /// Text of every content item
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.content.iter().map(ToolContent::as_text).collect()
    }
}
