//! Distance-matrix API response DTOs.
//!
//! These types map directly to the provider's JSON. The provider returns
//! one `status` for the whole call and, when that is OK, one nested
//! `status` per origin/destination pair inside `rows[].elements[]`.

use serde::Deserialize;

/// A value with its human-readable rendering, e.g. `{"value": 27000,
/// "text": "7 hours 30 mins"}`. Durations are seconds, distances meters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueText {
    pub value: f64,
    pub text: String,
}

/// One origin/destination pair result.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixElement {
    /// Pair-level status code (`OK`, `NOT_FOUND`, `ZERO_RESULTS`, ...).
    pub status: String,

    /// Travel time. Present only when `status` is `OK`.
    pub duration: Option<ValueText>,

    /// Travel distance. Present only when `status` is `OK`.
    pub distance: Option<ValueText>,
}

/// All pair results for one origin, in destination order.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// Top-level distance-matrix response.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixResponse {
    /// Batch-level status code (`OK`, `REQUEST_DENIED`, ...).
    pub status: String,

    /// Optional detail accompanying a non-OK batch status.
    #[serde(default)]
    pub error_message: Option<String>,

    /// Resolved origin addresses, in request order.
    #[serde(default)]
    pub origin_addresses: Vec<String>,

    /// Resolved destination addresses, in request order.
    #[serde(default)]
    pub destination_addresses: Vec<String>,

    /// One row per origin; this client always sends a single origin.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

/// What one batch call to the provider produced.
///
/// `Transport` covers every failure to obtain a parseable payload:
/// connect/TLS errors, timeouts, non-2xx HTTP statuses, undecodable
/// bodies. Provider-side rejections arrive inside a `Payload` via its
/// `status` field and are the normalizer's concern.
#[derive(Debug, Clone)]
pub enum RawResult {
    /// The provider returned a decodable JSON payload.
    Payload(MatrixResponse),

    /// The provider could not be reached or did not yield a payload.
    Transport { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_ok_payload() {
        let json = r#"{
            "status": "OK",
            "origin_addresses": ["Seattle, WA, USA"],
            "destination_addresses": ["Paradise, WA, USA"],
            "rows": [{"elements": [{
                "status": "OK",
                "duration": {"value": 9000, "text": "2 hours 30 mins"},
                "distance": {"value": 160934, "text": "100 mi"}
            }]}]
        }"#;

        let resp: MatrixResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "OK");
        assert_eq!(resp.rows.len(), 1);
        let element = &resp.rows[0].elements[0];
        assert_eq!(element.status, "OK");
        assert_eq!(element.duration.as_ref().unwrap().value, 9000.0);
        assert_eq!(element.distance.as_ref().unwrap().text, "100 mi");
    }

    #[test]
    fn deserialize_denied_payload_without_rows() {
        let json = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;

        let resp: MatrixResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "REQUEST_DENIED");
        assert_eq!(
            resp.error_message.as_deref(),
            Some("The provided API key is invalid.")
        );
        assert!(resp.rows.is_empty());
    }

    #[test]
    fn deserialize_unroutable_element() {
        let json = r#"{
            "status": "OK",
            "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}]
        }"#;

        let resp: MatrixResponse = serde_json::from_str(json).unwrap();
        let element = &resp.rows[0].elements[0];
        assert_eq!(element.status, "ZERO_RESULTS");
        assert!(element.duration.is_none());
        assert!(element.distance.is_none());
    }
}
