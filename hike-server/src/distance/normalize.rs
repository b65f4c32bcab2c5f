//! Response normalization: one batch payload to one per-pair outcome.
//!
//! A single batch call can partially succeed: the call-level status may
//! be OK while individual pairs are unroutable. Both layers are decoded
//! independently so the matrix can record pair-level failures without
//! conflating them with batch-level ones.

use super::status::{BatchStatus, ElementStatus};
use super::types::{RawResult, ValueText};

/// Normalized result for one (origin, destination-index) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// The batch succeeded and this pair is routable. Duration and
    /// distance are copied verbatim from the payload (seconds/meters
    /// plus the provider's display text).
    Ok {
        duration: ValueText,
        distance: ValueText,
    },

    /// The whole batch call failed; every pair in it shares this
    /// failure and may be retried later.
    BatchFailed {
        status: BatchStatus,
        message: String,
    },

    /// The batch succeeded but this specific pair did not.
    PairFailed {
        status: ElementStatus,
        message: String,
    },
}

/// Unpack the result for the destination at `destination_index`.
///
/// Positional correspondence with the request's destination list is
/// strict: a payload whose `rows[0].elements` is shorter than the index
/// is treated as a malformed batch, not silently skipped.
pub fn unpack_pair(raw: &RawResult, destination_index: usize) -> PairOutcome {
    let payload = match raw {
        RawResult::Transport { message } => {
            return PairOutcome::BatchFailed {
                status: BatchStatus::Transport,
                message: message.clone(),
            };
        }
        RawResult::Payload(payload) => payload,
    };

    let batch_status = BatchStatus::from_code(&payload.status);
    if batch_status != BatchStatus::Ok {
        let message = payload
            .error_message
            .clone()
            .unwrap_or_else(|| batch_status.default_message().to_string());
        return PairOutcome::BatchFailed {
            status: batch_status,
            message,
        };
    }

    // One origin per call, so all pair results live in rows[0].
    let element = match payload
        .rows
        .first()
        .and_then(|row| row.elements.get(destination_index))
    {
        Some(element) => element,
        None => {
            return PairOutcome::BatchFailed {
                status: BatchStatus::MalformedResponse,
                message: format!(
                    "no element at destination index {destination_index} in the response"
                ),
            };
        }
    };

    let element_status = ElementStatus::from_code(&element.status);
    if element_status != ElementStatus::Ok {
        let message = element_status.default_message().to_string();
        return PairOutcome::PairFailed {
            status: element_status,
            message,
        };
    }

    match (&element.duration, &element.distance) {
        (Some(duration), Some(distance)) => PairOutcome::Ok {
            duration: duration.clone(),
            distance: distance.clone(),
        },
        _ => PairOutcome::BatchFailed {
            status: BatchStatus::MalformedResponse,
            message: format!(
                "element at destination index {destination_index} is OK but lacks duration or distance"
            ),
        },
    }
}
