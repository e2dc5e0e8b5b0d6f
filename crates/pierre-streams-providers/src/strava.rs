// ABOUTME: Strava activity streams client and keyed-by-type response parsing
// ABOUTME: Maps Strava stream keys onto the channel model with provenance carried per channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use pierre_streams_core::constants::service_names::{STRAVA, STRAVA_API_BASE_URL};
use pierre_streams_core::{
    LatLng, Resolution, SeriesType, StreamChannel, StreamData, StreamKind, StreamSet,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::{AccessToken, StreamProvider, StreamQuery};
use crate::errors::{ProviderError, ProviderResult};
use crate::http_client::shared_client;

/// One stream object as returned by `GET /activities/{id}/streams`
#[derive(Debug, Deserialize)]
struct StravaStream {
    #[serde(rename = "type")]
    stream_type: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
    series_type: Option<String>,
    original_size: Option<usize>,
    resolution: Option<String>,
}

/// Strava streams API client
pub struct StravaStreamProvider {
    base_url: String,
    client: Client,
}

impl StravaStreamProvider {
    /// Client against the public Strava API using the shared HTTP client
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(STRAVA_API_BASE_URL)
    }

    /// Client against a custom base URL (proxies, test servers)
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: shared_client().clone(),
        }
    }

    /// Base URL requests are issued against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for one activity
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidActivityId` unless `activity_id` is a
    /// non-empty run of ASCII digits, so it can never alter the request path
    pub fn streams_url(&self, activity_id: &str, query: &StreamQuery) -> ProviderResult<String> {
        if !is_numeric_id(activity_id) {
            return Err(ProviderError::InvalidActivityId {
                provider: STRAVA,
                activity_id: activity_id.to_owned(),
            });
        }
        let keys: Vec<&str> = query
            .effective_kinds()
            .iter()
            .map(StreamKind::strava_key)
            .collect();
        Ok(format!(
            "{}/activities/{activity_id}/streams?keys={}&key_by_type=true&series_type={}&resolution={}",
            self.base_url,
            keys.join(","),
            query.series_type.as_str(),
            query.resolution.as_str(),
        ))
    }
}

impl Default for StravaStreamProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamProvider for StravaStreamProvider {
    fn name(&self) -> &'static str {
        STRAVA
    }

    async fn fetch_streams(
        &self,
        activity_id: &str,
        query: &StreamQuery,
        token: &AccessToken,
    ) -> ProviderResult<StreamSet> {
        if token.expose().is_empty() {
            return Err(ProviderError::MissingCredentials { provider: STRAVA });
        }

        let url = self.streams_url(activity_id, query)?;
        debug!(activity_id, url = %url, "Fetching Strava streams");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| ProviderError::Network {
                provider: STRAVA,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_owned()
            } else {
                body
            };
            warn!(activity_id, status = status.as_u16(), "Strava streams request failed");
            return Err(ProviderError::Api {
                provider: STRAVA,
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await.map_err(|e| ProviderError::Parse {
            provider: STRAVA,
            message: e.to_string(),
        })?;

        let streams = parse_streams_response(body, query.series_type, query.resolution)?
            .retain_kinds(query.effective_kinds());
        info!(
            activity_id,
            channels = streams.channel_count(),
            total_points = streams.total_points(),
            "Fetched Strava streams"
        );
        Ok(streams)
    }
}

/// Parse a Strava streams body into a channel set
///
/// Accepts both the keyed-by-type object and the plain array form. Unknown
/// stream keys are skipped. `series_type` and `resolution` fill in provenance
/// the body leaves out.
///
/// # Errors
///
/// Returns `ProviderError::Parse` when the body is neither form, or a known
/// stream carries samples of the wrong shape.
pub fn parse_streams_response(
    body: Value,
    series_type: SeriesType,
    resolution: Resolution,
) -> ProviderResult<StreamSet> {
    let entries: Vec<(String, StravaStream)> = match body {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| Ok((key, deserialize_stream(value)?)))
            .collect::<ProviderResult<_>>()?,
        Value::Array(items) => items
            .into_iter()
            .map(|value| {
                let stream = deserialize_stream(value)?;
                Ok((stream.stream_type.clone().unwrap_or_default(), stream))
            })
            .collect::<ProviderResult<_>>()?,
        other => {
            return Err(parse_error(format!(
                "expected an object or array of streams, got {other}"
            )))
        }
    };

    let mut streams = StreamSet::new();
    for (key, stream) in entries {
        let Some(kind) = StreamKind::parse(&key) else {
            debug!(key = %key, "Ignoring unknown Strava stream");
            continue;
        };
        streams.insert(build_channel(kind, stream, series_type, resolution)?);
    }
    Ok(streams)
}

/// Whether `id` is a Strava activity id (ASCII digits only)
#[must_use]
pub fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn deserialize_stream(value: Value) -> ProviderResult<StravaStream> {
    serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))
}

fn parse_error(message: String) -> ProviderError {
    ProviderError::Parse {
        provider: STRAVA,
        message,
    }
}

fn build_channel(
    kind: StreamKind,
    stream: StravaStream,
    series_type: SeriesType,
    resolution: Resolution,
) -> ProviderResult<StreamChannel> {
    let data = match kind {
        StreamKind::Position => StreamData::Position(
            stream
                .data
                .iter()
                .map(|value| parse_coordinate(kind, value))
                .collect::<ProviderResult<_>>()?,
        ),
        // Missing flags read as stationary so indices stay aligned
        StreamKind::MovingFlag => StreamData::MovingFlag(
            stream
                .data
                .iter()
                .map(|value| value.as_bool().unwrap_or(false))
                .collect(),
        ),
        scalar => {
            let values = stream
                .data
                .iter()
                .map(|value| parse_scalar(scalar, value))
                .collect::<ProviderResult<Vec<f64>>>()?;
            StreamData::from_scalars(scalar, values).unwrap_or_else(|| StreamData::empty(scalar))
        }
    };

    let original_size = stream.original_size.unwrap_or_else(|| data.len());
    let series_type = stream
        .series_type
        .as_deref()
        .map_or(series_type, SeriesType::from_str_param);
    let resolution = stream
        .resolution
        .as_deref()
        .and_then(Resolution::parse)
        .unwrap_or(resolution);

    Ok(StreamChannel::new(data)
        .with_original_size(original_size)
        .with_series_type(series_type)
        .with_resolution(resolution))
}

fn parse_scalar(kind: StreamKind, value: &Value) -> ProviderResult<f64> {
    match value {
        Value::Null => Ok(f64::NAN),
        Value::Number(number) => Ok(number.as_f64().unwrap_or(f64::NAN)),
        Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
        other => Err(parse_error(format!(
            "non-numeric sample {other} in {kind} stream"
        ))),
    }
}

fn parse_coordinate(kind: StreamKind, value: &Value) -> ProviderResult<LatLng> {
    match value.as_array().map(Vec::as_slice) {
        Some([lat, lng]) => Ok(LatLng::new(
            lat.as_f64().unwrap_or(f64::NAN),
            lng.as_f64().unwrap_or(f64::NAN),
        )),
        _ => Err(parse_error(format!(
            "expected [lat, lng] pair in {kind} stream, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_streams_url_uses_strava_keys() {
        let provider = StravaStreamProvider::with_base_url("http://localhost:9999/api/v3/");
        let query = StreamQuery::new(vec![StreamKind::HeartRate, StreamKind::Position])
            .with_resolution(Resolution::Medium);
        assert_eq!(
            provider.streams_url("42", &query).expect("numeric id"),
            "http://localhost:9999/api/v3/activities/42/streams?keys=heartrate,latlng&key_by_type=true&series_type=time&resolution=medium"
        );
    }

    #[test]
    fn test_streams_url_rejects_path_segments() {
        let provider = StravaStreamProvider::with_base_url("http://localhost:9999/api/v3");
        let query = StreamQuery::default();
        for id in ["../athlete", "../athlete/activities?per_page=200#", "12/../34", "", "12a"] {
            assert!(
                matches!(
                    provider.streams_url(id, &query),
                    Err(ProviderError::InvalidActivityId { .. })
                ),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_null_samples_keep_alignment() {
        let body = json!({ "heartrate": { "data": [120, null, 130] } });
        let streams = parse_streams_response(body, SeriesType::Time, Resolution::High)
            .expect("valid body");
        let channel = streams.get(StreamKind::HeartRate).expect("heart rate present");
        assert_eq!(channel.len(), 3);
    }
}
