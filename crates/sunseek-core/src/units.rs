//! Distance units used at the boundary between the form and the map layer.
//!
//! The form and every user-facing label speak miles; the map layer speaks
//! meters. The conversion factor is fixed.

/// Meters in one statute mile, as used by the map layer.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Smallest search radius the form accepts, in miles.
pub const MIN_RADIUS_MILES: u32 = 1;

/// Largest search radius the form accepts, in miles.
pub const MAX_RADIUS_MILES: u32 = 200;

#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

#[must_use]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Rounds `raw` to the nearest whole mile and clamps it into
/// `[MIN_RADIUS_MILES, MAX_RADIUS_MILES]`.
///
/// Out-of-range input never errors: it snaps to the nearest bound. `NaN`
/// snaps to the lower bound.
#[must_use]
pub fn clamp_radius_miles(raw: f64) -> u32 {
    if raw.is_nan() {
        return MIN_RADIUS_MILES;
    }
    let rounded = raw
        .round()
        .clamp(f64::from(MIN_RADIUS_MILES), f64::from(MAX_RADIUS_MILES));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let miles = rounded as u32;
    miles
}
