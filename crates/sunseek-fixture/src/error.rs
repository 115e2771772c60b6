use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no forecast dates found in fixture")]
    NoDates,

    #[error("invalid date \"{value}\" in fixture")]
    InvalidDate { value: String },

    /// `today` is before the earliest fixture date, so shifting would move
    /// every forecast backwards.
    #[error("fixture starts {days} day(s) after today; shifting would move dates into the past")]
    WouldMoveIntoPast { days: i64 },
}
