//! Response types for the search, suggestion, and projection endpoints.
//!
//! Scores are computed server-side on a 0–10 scale and are opaque here. The
//! search endpoint may omit either score, a region, or a country for a given
//! destination, so those fields default when absent.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::CoreError;

/// A ranked destination returned by `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub city: String,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub country: String,

    pub coordinates: GeoPoint,

    /// Great-circle distance from the search origin, in miles.
    #[serde(rename = "distance")]
    pub distance_miles: f64,

    #[serde(default)]
    pub sunny_score: Option<f64>,

    #[serde(default)]
    pub comfort_score: Option<f64>,

    /// Short condition text for the searched window, e.g. `"Sunny"`.
    #[serde(default)]
    pub condition: Option<String>,

    #[serde(default, alias = "temperature")]
    pub temperature_c: Option<f64>,
}

/// Body of a successful `POST /search` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub sunny_destinations: Vec<Destination>,

    #[serde(default)]
    pub comfortable_destinations: Vec<Destination>,
}

impl SearchResponse {
    /// `true` when neither ranking has any destination.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sunny_destinations.is_empty() && self.comfortable_destinations.is_empty()
    }
}

/// One candidate returned by `GET /location-suggest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSuggestion {
    pub display_name: String,
    pub point: GeoPoint,
}

/// Which weather index the projection endpoint should paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Sunny,
    Comfort,
}

impl IndexType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IndexType::Sunny => "sunny",
            IndexType::Comfort => "comfort",
        }
    }

    /// Human label used in legends and summaries.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            IndexType::Sunny => "Sunny score",
            IndexType::Comfort => "Comfort score",
        }
    }
}

impl std::fmt::Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(IndexType::Sunny),
            "comfort" | "comfortable" => Ok(IndexType::Comfort),
            other => Err(CoreError::UnknownIndexType(other.to_string())),
        }
    }
}

/// A server-defined polygon tile with its projected score.
///
/// `boundaries` is a closed ring: the last vertex connects back to the first
/// and is not repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub id: u64,
    pub center: GeoPoint,
    #[serde(alias = "boundary")]
    pub boundaries: Vec<GeoPoint>,
    pub score: f64,
}

/// Body of a successful `GET /project-weather-index` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResponse {
    #[serde(default)]
    pub cells: Vec<GridCell>,

    #[serde(default)]
    pub total_cells: usize,

    #[serde(default)]
    pub target_date: String,

    #[serde(default)]
    pub time_range: String,
}
