use thiserror::Error;

/// Errors returned by [`crate::SunseekClient`].
///
/// None of these are retried. Each one is scoped to the request that raised
/// it and the caller decides how to surface it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS, or body-read failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The backend answered with its `{"error": "..."}` shape.
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request succeeded but matched nothing.
    #[error("no results from {endpoint}")]
    NoData { endpoint: &'static str },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// Builds the error for a failed `reqwest` call, separating timeouts from
    /// other transport failures.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            ClientError::Timeout {
                url: url.to_string(),
            }
        } else {
            ClientError::Network(err)
        }
    }

    /// `true` for an empty-but-successful response, which callers show as
    /// information rather than failure.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, ClientError::NoData { .. })
    }

    /// `true` when the backend could not be reached or did not answer in time.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout { .. })
    }
}
