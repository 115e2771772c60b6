pub mod app_config;
pub mod config;
pub mod geo;
pub mod query;
pub mod types;
pub mod units;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, Viewport};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{destination_point, distance_m, GeoPoint, EARTH_RADIUS_M, EAST_BEARING_DEG};
pub use query::{parse_form_date, HourRange, ProjectionQuery, SearchQuery};
pub use types::{
    Destination, GridCell, IndexType, LocationSuggestion, ProjectionResponse, SearchResponse,
};
pub use units::{
    clamp_radius_miles, meters_to_miles, miles_to_meters, MAX_RADIUS_MILES, METERS_PER_MILE,
    MIN_RADIUS_MILES,
};

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("invalid hour range {start}-{end}: hours must be 0-23 with start <= end")]
    InvalidHourRange { start: u8, end: u8 },

    #[error("invalid date \"{0}\": expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("starting location must not be empty")]
    EmptyOrigin,

    #[error("unknown weather index type \"{0}\"")]
    UnknownIndexType(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
