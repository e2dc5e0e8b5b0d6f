// ABOUTME: Tool handlers for get_activity_streams and get_bulk_activity_streams
// ABOUTME: Fetch through a provider, assemble messages, and render every failure as plain text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Activity Stream Tools
//!
//! - `get_activity_streams`: one activity, single page or full chunked delivery.
//! - `get_bulk_activity_streams`: several activities fetched concurrently,
//!   each delivered as one page. A failed activity becomes an
//!   `{ activity_id, error }` entry and never fails the batch.

use std::sync::Arc;

use pierre_streams_core::formatters::format_output;
use pierre_streams_core::{AppError, AppResult};
use pierre_streams_providers::{
    fetch_bulk_streams, initialize_shared_client, AccessToken, StravaStreamProvider,
    StreamProvider,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::assembler::{AssembledResponse, StreamAssembler};
use crate::config::{ServerConfig, StreamDeliveryConfig};
use crate::tools::params::{BulkStreamToolParams, StreamToolParams};
use crate::tools::result::ToolResponse;

/// Tool name for single-activity stream delivery
pub const GET_ACTIVITY_STREAMS: &str = "get_activity_streams";

/// Tool name for multi-activity stream delivery
pub const GET_BULK_ACTIVITY_STREAMS: &str = "get_bulk_activity_streams";

/// Stream tool handlers bound to a provider and configuration
#[derive(Clone)]
pub struct StreamTools {
    provider: Arc<dyn StreamProvider>,
    assembler: StreamAssembler,
    delivery: StreamDeliveryConfig,
    token: Option<AccessToken>,
}

impl StreamTools {
    /// Handlers over an explicit provider
    #[must_use]
    pub fn new(provider: Arc<dyn StreamProvider>, config: &ServerConfig) -> Self {
        Self {
            provider,
            assembler: StreamAssembler::new(config.delivery, config.downsample),
            delivery: config.delivery,
            token: config.strava.token(),
        }
    }

    /// Handlers over the Strava API described by `config`
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        initialize_shared_client(config.strava.http);
        let provider = StravaStreamProvider::with_base_url(config.strava.api_base_url.clone());
        Self::new(Arc::new(provider), config)
    }

    /// Dispatch a tool call by name
    pub async fn call(&self, name: &str, args: &Value) -> ToolResponse {
        match name {
            GET_ACTIVITY_STREAMS => self.get_activity_streams(args).await,
            GET_BULK_ACTIVITY_STREAMS => self.get_bulk_activity_streams(args).await,
            other => ToolResponse::error(&AppError::invalid_input(format!(
                "Unknown tool '{other}'"
            ))),
        }
    }

    /// Handle `get_activity_streams`
    pub async fn get_activity_streams(&self, args: &Value) -> ToolResponse {
        match self.activity_streams(args).await {
            Ok(messages) => ToolResponse::messages(messages),
            Err(error) => {
                warn!(tool = GET_ACTIVITY_STREAMS, code = ?error.code, error = %error, "Tool call failed");
                ToolResponse::error(&error)
            }
        }
    }

    /// Handle `get_bulk_activity_streams`
    pub async fn get_bulk_activity_streams(&self, args: &Value) -> ToolResponse {
        match self.bulk_activity_streams(args).await {
            Ok(message) => ToolResponse::text(message),
            Err(error) => {
                warn!(tool = GET_BULK_ACTIVITY_STREAMS, code = ?error.code, error = %error, "Tool call failed");
                ToolResponse::error(&error)
            }
        }
    }

    fn token(&self) -> AppResult<&AccessToken> {
        self.token
            .as_ref()
            .ok_or_else(|| AppError::config_missing("STRAVA_ACCESS_TOKEN"))
    }

    async fn activity_streams(&self, args: &Value) -> AppResult<Vec<String>> {
        let params = StreamToolParams::from_args(args, self.delivery.default_points_per_page)?;
        let token = self.token()?;

        let streams = self
            .provider
            .fetch_streams(&params.activity_id, &params.shaping.query(), token)
            .await?;
        let response = self
            .assembler
            .assemble(&params.activity_id, streams, &params.shaping.shape)?;

        info!(
            activity_id = %params.activity_id,
            messages = response.messages.len(),
            output_format = %params.shaping.output_format,
            "Delivered activity streams"
        );
        response.render(params.shaping.output_format)
    }

    async fn bulk_activity_streams(&self, args: &Value) -> AppResult<String> {
        let params = BulkStreamToolParams::from_args(args, self.delivery.default_points_per_page)?;
        let token = self.token()?;
        let query = params.shaping.query();

        let fetched = fetch_bulk_streams(
            self.provider.as_ref(),
            &params.activity_ids,
            &query,
            token,
            self.delivery.bulk_concurrency,
        )
        .await;

        let mut failed = 0_usize;
        let activities: Vec<Value> = fetched
            .into_iter()
            .map(|item| {
                let assembled = item
                    .result
                    .map_err(AppError::from)
                    .and_then(|streams| {
                        self.assembler
                            .assemble(&item.activity_id, streams, &params.shaping.shape)
                    })
                    .and_then(|response| page_body(&item.activity_id, response));
                match assembled {
                    Ok(body) => body,
                    Err(error) => {
                        failed += 1;
                        json!({
                            "activity_id": item.activity_id,
                            "error": error.to_user_text(),
                        })
                    }
                }
            })
            .collect();

        let requested = params.activity_ids.len();
        info!(requested, failed, "Delivered bulk activity streams");
        let body = json!({
            "activities": activities,
            "summary": {
                "requested": requested,
                "succeeded": requested - failed,
                "failed": failed,
            },
        });
        Ok(format_output(&body, params.shaping.output_format)?.data)
    }
}

/// Body of the single page message a bulk entry is built from
fn page_body(activity_id: &str, mut response: AssembledResponse) -> AppResult<Value> {
    match (response.messages.pop(), response.messages.is_empty()) {
        (Some(message), true) => Ok(message.body),
        _ => Err(AppError::internal(format!(
            "Expected exactly one page message for activity {activity_id}"
        ))),
    }
}
