//! Validated form input for the search and browse modes.

use chrono::NaiveDate;

use crate::geo::GeoPoint;
use crate::types::IndexType;
use crate::units::clamp_radius_miles;
use crate::CoreError;

/// Last selectable hour of the day.
const LAST_HOUR: u8 = 23;

/// Inclusive hour-of-day window, `start <= end`, both in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    start: u8,
    end: u8,
}

impl HourRange {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidHourRange`] if either hour exceeds 23 or
    /// `start > end`.
    pub fn new(start: u8, end: u8) -> Result<Self, CoreError> {
        if start > LAST_HOUR || end > LAST_HOUR || start > end {
            return Err(CoreError::InvalidHourRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> u8 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> u8 {
        self.end
    }
}

impl std::fmt::Display for HourRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start, self.end)
    }
}

/// Parses a `YYYY-MM-DD` form date.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] if the string is not a valid ISO date.
pub fn parse_form_date(raw: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(raw.to_string()))
}

/// A validated destination search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub from: String,
    pub date: NaiveDate,
    pub hours: HourRange,
    pub radius_miles: u32,
}

impl SearchQuery {
    /// Builds a query from raw form values. The radius is clamped, never
    /// rejected.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyOrigin`] if `from` is blank.
    /// - [`CoreError::InvalidDate`] if `date` is not `YYYY-MM-DD`.
    /// - [`CoreError::InvalidHourRange`] for a bad hour window.
    pub fn new(
        from: &str,
        date: &str,
        start_hour: u8,
        end_hour: u8,
        radius_miles: f64,
    ) -> Result<Self, CoreError> {
        let from = from.trim();
        if from.is_empty() {
            return Err(CoreError::EmptyOrigin);
        }
        Ok(Self {
            from: from.to_string(),
            date: parse_form_date(date)?,
            hours: HourRange::new(start_hour, end_hour)?,
            radius_miles: clamp_radius_miles(radius_miles),
        })
    }
}

/// A validated browse-mode projection request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionQuery {
    pub center: GeoPoint,
    pub radius_miles: u32,
    pub index_type: IndexType,
    pub date: NaiveDate,
    pub hours: HourRange,
}

impl ProjectionQuery {
    /// # Errors
    ///
    /// - [`CoreError::InvalidDate`] if `date` is not `YYYY-MM-DD`.
    /// - [`CoreError::InvalidHourRange`] for a bad hour window.
    pub fn new(
        center: GeoPoint,
        radius_miles: f64,
        index_type: IndexType,
        date: &str,
        start_hour: u8,
        end_hour: u8,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            center,
            radius_miles: clamp_radius_miles(radius_miles),
            index_type,
            date: parse_form_date(date)?,
            hours: HourRange::new(start_hour, end_hour)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_range_accepts_single_hour_and_full_day() {
        assert!(HourRange::new(12, 12).is_ok());
        assert!(HourRange::new(0, 23).is_ok());
    }

    #[test]
    fn hour_range_rejects_inverted_and_out_of_day() {
        assert_eq!(
            HourRange::new(15, 9),
            Err(CoreError::InvalidHourRange { start: 15, end: 9 })
        );
        assert!(HourRange::new(8, 24).is_err());
    }

    #[test]
    fn hour_range_displays_padded() {
        assert_eq!(HourRange::new(9, 17).unwrap().to_string(), "09:00-17:00");
    }

    #[test]
    fn search_query_trims_origin_and_clamps_radius() {
        let q = SearchQuery::new("  London ", "2025-07-04", 9, 17, 500.0).unwrap();
        assert_eq!(q.from, "London");
        assert_eq!(q.radius_miles, 200);
        assert_eq!(q.date, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
    }

    #[test]
    fn search_query_rejects_blank_origin() {
        assert_eq!(
            SearchQuery::new("   ", "2025-07-04", 9, 17, 50.0),
            Err(CoreError::EmptyOrigin)
        );
    }

    #[test]
    fn search_query_rejects_bad_date() {
        assert!(matches!(
            SearchQuery::new("London", "04/07/2025", 9, 17, 50.0),
            Err(CoreError::InvalidDate(_))
        ));
    }

    #[test]
    fn projection_query_clamps_radius() {
        let center = GeoPoint::new(51.5074, -0.1278).unwrap();
        let q = ProjectionQuery::new(center, 0.2, IndexType::Comfort, "2025-07-04", 10, 14)
            .unwrap();
        assert_eq!(q.radius_miles, 1);
        assert_eq!(q.index_type, IndexType::Comfort);
    }
}
