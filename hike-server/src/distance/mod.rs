//! Distance-matrix API client and response normalization.
//!
//! The provider answers one HTTP call per batch: a single origin against
//! up to its per-request destination limit. Two properties shape this
//! module:
//! - a call can partially succeed, so batch-level and pair-level status
//!   are decoded independently;
//! - transport failures are returned as values (`RawResult::Transport`),
//!   never raised, so the sync engine can record them on entries and
//!   keep processing other origin groups.

mod client;
mod normalize;
mod status;
mod types;

pub use client::{DistanceClient, DistanceConfig, DistanceError};
pub use normalize::{PairOutcome, unpack_pair};
pub use status::{BatchStatus, ElementStatus};
pub use types::{MatrixElement, MatrixResponse, MatrixRow, RawResult, ValueText};
