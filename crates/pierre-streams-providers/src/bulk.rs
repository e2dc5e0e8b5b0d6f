// ABOUTME: Concurrent stream fetching for several activities at once
// ABOUTME: One failed activity never aborts the batch; results come back in request order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use futures_util::stream::{self, StreamExt};
use pierre_streams_core::StreamSet;
use tracing::{info, warn};

use crate::core::{AccessToken, StreamProvider, StreamQuery};
use crate::errors::ProviderResult;

/// Outcome of fetching one activity in a batch
#[derive(Debug)]
pub struct BulkFetchResult {
    /// Identifier the caller asked for
    pub activity_id: String,
    /// Channels or the failure for this activity alone
    pub result: ProviderResult<StreamSet>,
}

impl BulkFetchResult {
    /// Whether this activity was fetched successfully
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetch streams for every id with at most `concurrency` requests in flight
///
/// The returned vector has one entry per requested id, in the same order.
pub async fn fetch_bulk_streams(
    provider: &dyn StreamProvider,
    activity_ids: &[String],
    query: &StreamQuery,
    token: &AccessToken,
    concurrency: usize,
) -> Vec<BulkFetchResult> {
    let results: Vec<BulkFetchResult> = stream::iter(activity_ids)
        .map(|activity_id| async move {
            let result = provider.fetch_streams(activity_id, query, token).await;
            if let Err(error) = &result {
                warn!(
                    activity_id = %activity_id,
                    provider = provider.name(),
                    error = %error,
                    "Stream fetch failed for activity in bulk request"
                );
            }
            BulkFetchResult {
                activity_id: activity_id.clone(),
                result,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let failed = results.iter().filter(|item| !item.is_ok()).count();
    info!(
        requested = activity_ids.len(),
        failed,
        concurrency,
        "Bulk stream fetch completed"
    );
    results
}
