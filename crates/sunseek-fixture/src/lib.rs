//! Replays a recorded weather fixture as if it were fetched today.
//!
//! The fixture is the backend's `weather_data.json`:
//!
//! ```json
//! {
//!   "generated_at": "2025-07-04T08:12:44",
//!   "weather_data": [
//!     { "forecast": [
//!         { "date": "2025-07-04",
//!           "hourly": [ { "time": "2025-07-04 00:00" } ] } ] }
//!   ]
//! }
//! ```
//!
//! Every forecast `date` and hourly `time` moves by the same number of days so
//! the earliest forecast lands on `today`. Other fields are left untouched.

pub mod error;
pub mod shift;

pub use error::FixtureError;
pub use shift::{
    find_earliest_date, load_fixture, save_fixture, shift_fixture_dates, shift_fixture_file,
    ShiftReport,
};
