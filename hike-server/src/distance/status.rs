//! Tagged status codes for both levels of a distance-matrix response.

use std::fmt;

/// Batch-level status: the fate of a whole API call.
///
/// `Transport` and `MalformedResponse` are synthesized on this side of
/// the wire; the rest decode the provider's top-level `status` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Ok,
    /// The provider could not be reached at all.
    Transport,
    InvalidRequest,
    MaxElementsExceeded,
    OverDailyLimit,
    RequestDenied,
    UnknownError,
    /// The payload decoded but did not match the request shape
    /// (missing row, or fewer elements than destinations sent).
    MalformedResponse,
    /// A status code this client does not know.
    Unrecognized(String),
}

impl BatchStatus {
    /// Decode the provider's top-level status code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "OK" => BatchStatus::Ok,
            "INVALID_REQUEST" => BatchStatus::InvalidRequest,
            "MAX_ELEMENTS_EXCEEDED" => BatchStatus::MaxElementsExceeded,
            "OVER_DAILY_LIMIT" => BatchStatus::OverDailyLimit,
            "REQUEST_DENIED" => BatchStatus::RequestDenied,
            "UNKNOWN_ERROR" => BatchStatus::UnknownError,
            other => BatchStatus::Unrecognized(other.to_string()),
        }
    }

    /// The wire-format code for this status.
    pub fn code(&self) -> &str {
        match self {
            BatchStatus::Ok => "OK",
            BatchStatus::Transport => "TRANSPORT_ERROR",
            BatchStatus::InvalidRequest => "INVALID_REQUEST",
            BatchStatus::MaxElementsExceeded => "MAX_ELEMENTS_EXCEEDED",
            BatchStatus::OverDailyLimit => "OVER_DAILY_LIMIT",
            BatchStatus::RequestDenied => "REQUEST_DENIED",
            BatchStatus::UnknownError => "UNKNOWN_ERROR",
            BatchStatus::MalformedResponse => "MALFORMED_RESPONSE",
            BatchStatus::Unrecognized(code) => code,
        }
    }

    /// Fallback message used when the payload carries no `error_message`.
    pub fn default_message(&self) -> &'static str {
        match self {
            BatchStatus::Ok => "",
            BatchStatus::Transport => "transport error accessing the distance matrix API",
            BatchStatus::InvalidRequest => "the distance matrix API request was malformed",
            BatchStatus::MaxElementsExceeded => {
                "the request exceeds the distance matrix API per-query element limit"
            }
            BatchStatus::OverDailyLimit => {
                "the distance matrix API key is over its daily quota or invalid"
            }
            BatchStatus::RequestDenied => "use of the distance matrix API was denied",
            BatchStatus::UnknownError => "the distance matrix API reported a server error",
            BatchStatus::MalformedResponse => {
                "the distance matrix API response did not match the request"
            }
            BatchStatus::Unrecognized(_) => "unhandled API status",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Pair-level status: the fate of one origin/destination element inside
/// an otherwise successful batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxRouteLengthExceeded,
    /// A status code this client does not know.
    Unrecognized(String),
}

impl ElementStatus {
    /// Decode an element's status code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "OK" => ElementStatus::Ok,
            "NOT_FOUND" => ElementStatus::NotFound,
            "ZERO_RESULTS" => ElementStatus::ZeroResults,
            "MAX_ROUTE_LENGTH_EXCEEDED" => ElementStatus::MaxRouteLengthExceeded,
            other => ElementStatus::Unrecognized(other.to_string()),
        }
    }

    /// The wire-format code for this status.
    pub fn code(&self) -> &str {
        match self {
            ElementStatus::Ok => "OK",
            ElementStatus::NotFound => "NOT_FOUND",
            ElementStatus::ZeroResults => "ZERO_RESULTS",
            ElementStatus::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            ElementStatus::Unrecognized(code) => code,
        }
    }

    /// Message recorded on the entry when the element carries no detail.
    pub fn default_message(&self) -> &'static str {
        match self {
            ElementStatus::Ok => "",
            ElementStatus::NotFound => {
                "the origin or destination for this pair could not be geocoded"
            }
            ElementStatus::ZeroResults => "no driving route could be found for this pair",
            ElementStatus::MaxRouteLengthExceeded => {
                "the driving route for this pair is too long to process"
            }
            ElementStatus::Unrecognized(_) => "unhandled route error",
        }
    }
}

impl fmt::Display for ElementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
