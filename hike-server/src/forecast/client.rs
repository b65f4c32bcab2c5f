//! NOAA forecast HTTP client.

use tracing::debug;

use crate::domain::LatLon;

use super::error::ForecastError;
use super::types::ForecastResponse;

/// Default base URL for the NOAA weather API.
const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

/// The NOAA API asks clients to identify themselves in the User-Agent.
const DEFAULT_USER_AGENT: &str = "hike-server (trailhead forecast client)";

/// Configuration for the forecast client.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Base URL for the API (defaults to the production endpoint)
    pub base_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ForecastConfig {
    /// Create a config with the default endpoint. The API needs no key.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// NOAA point-forecast API client.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch the point forecast for a coordinate.
    ///
    /// Unlike the distance client, failures here propagate as errors:
    /// nothing is persisted from a forecast, so the caller just reports
    /// the failure and moves on.
    pub async fn point_forecast(&self, coord: &LatLon) -> Result<ForecastResponse, ForecastError> {
        let url = format!("{}/points/{}/forecast", self.base_url, coord);
        debug!(%coord, "forecast API call");

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForecastError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ForecastError::Json {
            message: e.to_string(),
        })
    }
}
