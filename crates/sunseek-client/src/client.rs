//! HTTP client for the travel-weather backend.
//!
//! Wraps `reqwest` with typed request bodies, typed responses, and one error
//! taxonomy for the three endpoints:
//!
//! - `POST /search`: ranked sunny and comfortable destinations,
//! - `GET /location-suggest`: place-name autocomplete,
//! - `GET /project-weather-index`: grid cells for browse mode.
//!
//! Any body carrying a top-level `"error"` string is surfaced as
//! [`ClientError::Api`] whatever its HTTP status. Failed requests are never
//! retried.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sunseek_core::{
    AppConfig, GeoPoint, LocationSuggestion, ProjectionQuery, ProjectionResponse, SearchQuery,
    SearchResponse,
};

use crate::error::ClientError;

const SEARCH_PATH: &str = "search";
const SUGGEST_PATH: &str = "location-suggest";
const PROJECTION_PATH: &str = "project-weather-index";

/// Default shortest query the suggestion endpoint is called for, in characters.
pub const MIN_SUGGEST_CHARS: usize = 2;

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    from: &'a str,
    date: String,
    start_hour: u8,
    end_hour: u8,
    distance: u32,
}

/// Suggestion entries arrive with coordinates as numbers or numeric strings.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    display_name: String,
    lat: serde_json::Value,
    lon: serde_json::Value,
}

fn coordinate(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl RawSuggestion {
    fn into_suggestion(self) -> Option<LocationSuggestion> {
        let point = GeoPoint::new(coordinate(&self.lat)?, coordinate(&self.lon)?).ok()?;
        Some(LocationSuggestion {
            display_name: self.display_name,
            point,
        })
    }
}

/// Client for the search, suggestion, and projection endpoints.
///
/// Use [`SunseekClient::from_config`] in the binary or
/// [`SunseekClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct SunseekClient {
    client: Client,
    base_url: Url,
    min_suggest_chars: usize,
}

impl SunseekClient {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ClientError::Network`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so endpoint paths join under any prefix.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            min_suggest_chars: MIN_SUGGEST_CHARS,
        })
    }

    /// Sets the shortest trimmed input [`SunseekClient::suggest`] sends.
    #[must_use]
    pub fn with_min_suggest_chars(mut self, min_chars: usize) -> Self {
        self.min_suggest_chars = min_chars;
        self
    }

    /// # Errors
    ///
    /// See [`SunseekClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_min_suggest_chars(config.suggest_min_chars))
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Posts a destination search.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NoData`] if both rankings come back empty.
    /// - [`ClientError::Api`] if the backend returns its error shape.
    /// - [`ClientError::Network`] / [`ClientError::Timeout`] on transport failure.
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::Deserialize`] for
    ///   any other unusable response.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ClientError> {
        let url = self.endpoint(SEARCH_PATH);
        let body = SearchBody {
            from: &query.from,
            date: query.date.format("%Y-%m-%d").to_string(),
            start_hour: query.hours.start(),
            end_hour: query.hours.end(),
            distance: query.radius_miles,
        };
        tracing::info!(
            origin = %query.from,
            date = %query.date,
            hours = %query.hours,
            radius_miles = query.radius_miles,
            "searching destinations"
        );

        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, url.as_str()))?;
        let results: SearchResponse = Self::decode(response, &url, "search").await?;

        if results.is_empty() {
            return Err(ClientError::NoData {
                endpoint: "/search",
            });
        }
        tracing::info!(
            sunny = results.sunny_destinations.len(),
            comfortable = results.comfortable_destinations.len(),
            "search complete"
        );
        Ok(results)
    }

    /// Fetches place-name candidates for partial input.
    ///
    /// Input shorter than the configured minimum (after trimming, default
    /// [`MIN_SUGGEST_CHARS`]) returns an empty list without a request. Blank
    /// input never makes a request. Entries with unusable
    /// coordinates are skipped. An empty answer is not an error.
    ///
    /// # Errors
    ///
    /// Same transport and decoding errors as [`SunseekClient::search`].
    pub async fn suggest(&self, text: &str) -> Result<Vec<LocationSuggestion>, ClientError> {
        let text = text.trim();
        if text.is_empty() || text.chars().count() < self.min_suggest_chars {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint(SUGGEST_PATH);
        url.query_pairs_mut().append_pair("q", text);
        tracing::debug!(query = text, "fetching location suggestions");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, url.as_str()))?;
        let raw: Vec<RawSuggestion> = Self::decode(response, &url, "location-suggest").await?;

        let total = raw.len();
        let suggestions: Vec<LocationSuggestion> = raw
            .into_iter()
            .filter_map(RawSuggestion::into_suggestion)
            .collect();
        if suggestions.len() < total {
            tracing::warn!(
                skipped = total - suggestions.len(),
                "dropped suggestions with unusable coordinates"
            );
        }
        Ok(suggestions)
    }

    /// Requests projected weather-index cells around a center.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NoData`] if the response has no cells.
    /// - Otherwise the same errors as [`SunseekClient::search`].
    pub async fn project_weather_index(
        &self,
        query: &ProjectionQuery,
    ) -> Result<ProjectionResponse, ClientError> {
        let mut url = self.endpoint(PROJECTION_PATH);
        url.query_pairs_mut()
            .append_pair("lat", &query.center.lat().to_string())
            .append_pair("lon", &query.center.lon().to_string())
            .append_pair("radius", &query.radius_miles.to_string())
            .append_pair("index_type", query.index_type.as_str())
            .append_pair("date", &query.date.format("%Y-%m-%d").to_string())
            .append_pair("start_hour", &query.hours.start().to_string())
            .append_pair("end_hour", &query.hours.end().to_string());
        tracing::info!(
            center = %query.center,
            radius_miles = query.radius_miles,
            index = %query.index_type,
            "projecting weather index"
        );

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, url.as_str()))?;
        let projection: ProjectionResponse =
            Self::decode(response, &url, "project-weather-index").await?;

        if projection.cells.is_empty() {
            return Err(ClientError::NoData {
                endpoint: "/project-weather-index",
            });
        }
        tracing::info!(
            cells = projection.cells.len(),
            total_cells = projection.total_cells,
            "projection complete"
        );
        Ok(projection)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        url
    }

    /// Reads the body, surfaces the backend error shape or a bad status, and
    /// decodes the rest into `T`.
    async fn decode<T: DeserializeOwned>(
        response: Response,
        url: &Url,
        context: &str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(e, url.as_str()))?;
        let parsed = serde_json::from_str::<serde_json::Value>(&body);

        if let Some(message) = parsed
            .as_ref()
            .ok()
            .and_then(|v| v.get("error"))
            .and_then(serde_json::Value::as_str)
        {
            tracing::warn!(status = status.as_u16(), %message, context, "backend returned an error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: message.to_string(),
            });
        }

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "unexpected HTTP status");
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let value = parsed.map_err(|source| ClientError::Deserialize {
            context: context.to_string(),
            source,
        })?;
        serde_json::from_value(value).map_err(|source| ClientError::Deserialize {
            context: context.to_string(),
            source,
        })
    }
}
