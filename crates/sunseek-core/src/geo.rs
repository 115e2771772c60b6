//! Geographic coordinates and spherical geodesy.
//!
//! All math uses a sphere of radius [`EARTH_RADIUS_M`]. The forward formula
//! ([`destination_point`]) and the inverse ([`distance_m`]) share that radius,
//! so placing a point at distance `d` and measuring it back yields `d` to
//! floating-point precision.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Sphere radius used for both forward and inverse geodesy, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Bearing of the radius handle relative to the circle center (due east).
pub const EAST_BEARING_DEG: f64 = 90.0;

/// A bounds-checked WGS-84 coordinate in degrees.
///
/// Deserializes from either `{lat, lon}` or `{latitude, longitude}` and
/// rejects out-of-range values at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude", alias = "lng")]
    lon: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = CoreError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl GeoPoint {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if either value is non-finite,
    /// latitude is outside `[-90, 90]`, or longitude is outside `[-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Wraps a longitude in degrees into `[-180, 180]`.
fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the input's sign at the antimeridian.
    if (wrapped + 180.0).abs() < f64::EPSILON && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Spherical direct geodesic: the point `distance_m` meters from `origin`
/// along the great circle leaving at `bearing_deg` (clockwise from north).
#[must_use]
pub fn destination_point(origin: GeoPoint, distance_m: f64, bearing_deg: f64) -> GeoPoint {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint {
        lat: lat2.to_degrees().clamp(-90.0, 90.0),
        lon: normalize_lon(lon2.to_degrees()),
    }
}

/// Haversine great-circle distance between two points, in meters.
#[must_use]
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
