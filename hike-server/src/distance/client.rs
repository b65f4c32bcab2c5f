//! Distance-matrix HTTP client.
//!
//! One call covers one origin and up to `max_destinations` destinations.
//! Transport failures never escape as errors: they come back as
//! `RawResult::Transport` so the sync engine can record them on the
//! affected entries instead of aborting the run.

use tracing::debug;

use crate::domain::LatLon;

use super::types::{MatrixResponse, RawResult};

/// Default base URL for the distance-matrix API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Default maximum destinations per request, the provider's batch limit.
const DEFAULT_MAX_DESTINATIONS: usize = 25;

/// Errors from constructing the distance client.
#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    /// Underlying HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration for the distance client.
#[derive(Debug, Clone)]
pub struct DistanceConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to the production endpoint)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum destinations per batch call
    pub max_destinations: usize,
}

impl DistanceConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_destinations: DEFAULT_MAX_DESTINATIONS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the per-request destination limit.
    pub fn with_max_destinations(mut self, n: usize) -> Self {
        self.max_destinations = n;
        self
    }
}

/// Distance-matrix API client.
#[derive(Debug, Clone)]
pub struct DistanceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_destinations: usize,
}

impl DistanceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DistanceConfig) -> Result<Self, DistanceError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            max_destinations: config.max_destinations,
        })
    }

    /// The provider's destinations-per-request limit for this client.
    pub fn max_destinations(&self) -> usize {
        self.max_destinations
    }

    /// Fetch drive distances from one origin to a batch of destinations.
    ///
    /// Callers must keep `destinations` within `max_destinations`; the
    /// provider rejects oversized batches with `MAX_ELEMENTS_EXCEEDED`.
    /// The returned payload's `rows[0].elements` are in `destinations`
    /// order.
    pub async fn fetch_distances(&self, origin: &LatLon, destinations: &[LatLon]) -> RawResult {
        let destination_str = join_coords(destinations);
        debug!(origin = %origin, destinations = destinations.len(), "distance API call");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origins", origin.to_string()),
                ("destinations", destination_str),
                ("mode", "driving".to_string()),
                ("units", "imperial".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                return RawResult::Transport {
                    message: format!("error reaching distance matrix API: {e}"),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            return RawResult::Transport {
                message: format!("distance matrix API returned HTTP {status}"),
            };
        }

        match response.json::<MatrixResponse>().await {
            Ok(payload) => RawResult::Payload(payload),
            Err(e) => RawResult::Transport {
                message: format!("could not decode distance matrix API response: {e}"),
            },
        }
    }
}

/// Pipe-join coordinates for the `origins`/`destinations` parameters.
fn join_coords(coords: &[LatLon]) -> String {
    coords
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("|")
}
