use std::path::Path;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::FixtureError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const GENERATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// What a shift changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftReport {
    pub earliest: NaiveDate,
    pub today: NaiveDate,
    pub offset_days: i64,
    pub forecasts_updated: usize,
    pub hourly_updated: usize,
}

fn parse_date(raw: &str) -> Result<NaiveDate, FixtureError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FixtureError::InvalidDate {
        value: raw.to_string(),
    })
}

fn shift_date(raw: &str, offset: Duration) -> Result<String, FixtureError> {
    parse_date(raw)?
        .checked_add_signed(offset)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .ok_or_else(|| FixtureError::InvalidDate {
            value: raw.to_string(),
        })
}

fn forecasts(data: &Value) -> impl Iterator<Item = &Value> {
    data.get("weather_data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|location| location.get("forecast").and_then(Value::as_array))
        .flatten()
}

fn forecasts_mut(data: &mut Value) -> impl Iterator<Item = &mut Value> {
    data.get_mut("weather_data")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(|location| location.get_mut("forecast").and_then(Value::as_array_mut))
        .flatten()
}

/// Earliest `weather_data[].forecast[].date`. Forecasts without a `date` are
/// ignored.
///
/// # Errors
///
/// - [`FixtureError::InvalidDate`] if a `date` is not a `YYYY-MM-DD` string.
/// - [`FixtureError::NoDates`] if no forecast carries a date.
pub fn find_earliest_date(data: &Value) -> Result<NaiveDate, FixtureError> {
    let mut earliest: Option<NaiveDate> = None;
    for forecast in forecasts(data) {
        let Some(raw) = forecast.get("date") else {
            continue;
        };
        let date = match raw.as_str() {
            Some(s) => parse_date(s)?,
            None => {
                return Err(FixtureError::InvalidDate {
                    value: raw.to_string(),
                })
            }
        };
        earliest = Some(earliest.map_or(date, |e| e.min(date)));
    }
    earliest.ok_or(FixtureError::NoDates)
}

/// Shifts one forecast in place. Returns how many hourly entries moved.
fn shift_forecast(forecast: &mut Value, offset: Duration) -> Result<usize, FixtureError> {
    if let Some(Value::String(date)) = forecast.get_mut("date") {
        *date = shift_date(date, offset)?;
    }

    let mut hourly_updated = 0;
    let hourly = forecast
        .get_mut("hourly")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten();
    for entry in hourly {
        let Some(Value::String(time)) = entry.get_mut("time") else {
            continue;
        };
        // Only "YYYY-MM-DD HH:MM" is rewritten; anything else is left alone.
        let parts: Vec<&str> = time.split(' ').collect();
        if let [day, clock] = parts.as_slice() {
            *time = format!("{} {clock}", shift_date(day, offset)?);
            hourly_updated += 1;
        }
    }
    Ok(hourly_updated)
}

/// Moves every forecast so the earliest one falls on `today`, and stamps
/// `generated_at` with `now`.
///
/// `data` is only modified if the whole shift succeeds.
///
/// # Errors
///
/// - [`FixtureError::NoDates`] / [`FixtureError::InvalidDate`], see
///   [`find_earliest_date`]. A malformed hourly date also fails the shift.
/// - [`FixtureError::WouldMoveIntoPast`] if `today` is before the earliest
///   date and `allow_past` is false.
pub fn shift_fixture_dates(
    data: &mut Value,
    today: NaiveDate,
    now: NaiveDateTime,
    allow_past: bool,
) -> Result<ShiftReport, FixtureError> {
    let earliest = find_earliest_date(data)?;
    let offset = today.signed_duration_since(earliest);
    let offset_days = offset.num_days();
    tracing::info!(%earliest, %today, offset_days, "shifting fixture dates");

    if offset_days < 0 {
        if !allow_past {
            return Err(FixtureError::WouldMoveIntoPast { days: -offset_days });
        }
        tracing::warn!(offset_days, "moving fixture dates backwards");
    }

    let mut shifted = data.clone();
    let mut forecasts_updated = 0;
    let mut hourly_updated = 0;
    for forecast in forecasts_mut(&mut shifted) {
        hourly_updated += shift_forecast(forecast, offset)?;
        forecasts_updated += 1;
    }
    if let Some(root) = shifted.as_object_mut() {
        root.insert(
            "generated_at".to_string(),
            Value::String(now.format(GENERATED_AT_FORMAT).to_string()),
        );
    }
    *data = shifted;

    tracing::info!(forecasts_updated, hourly_updated, "fixture dates shifted");
    Ok(ShiftReport {
        earliest,
        today,
        offset_days,
        forecasts_updated,
        hourly_updated,
    })
}

/// # Errors
///
/// [`FixtureError::Io`] if the file cannot be read, [`FixtureError::Json`] if
/// it is not valid JSON.
pub fn load_fixture(path: &Path) -> Result<Value, FixtureError> {
    let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `data` with two-space indentation and a trailing newline. Object
/// keys keep the order they were read in.
///
/// # Errors
///
/// [`FixtureError::Io`] if the file cannot be written.
pub fn save_fixture(path: &Path, data: &Value) -> Result<(), FixtureError> {
    let mut body = serde_json::to_string_pretty(data).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    body.push('\n');
    std::fs::write(path, body).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "fixture saved");
    Ok(())
}

/// Loads the fixture at `path`, shifts it to start on `today`, and writes it
/// back. Nothing is written if the shift fails.
///
/// # Errors
///
/// Any error from [`load_fixture`], [`shift_fixture_dates`], or
/// [`save_fixture`].
pub fn shift_fixture_file(
    path: &Path,
    today: NaiveDate,
    allow_past: bool,
) -> Result<ShiftReport, FixtureError> {
    let mut data = load_fixture(path)?;
    let report = shift_fixture_dates(&mut data, today, Local::now().naive_local(), allow_past)?;
    save_fixture(path, &data)?;
    Ok(report)
}
