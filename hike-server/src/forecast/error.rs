//! Forecast API error types.

/// Errors from the NOAA forecast client.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("forecast API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A period carried an unparseable start time
    #[error("bad period start time {value:?}: {message}")]
    BadTimestamp { value: String, message: String },
}
