//! The drive-time matrix: batching, persistence, and synchronization.
//!
//! One entry per (trailhead, major city) pair holds the cached drive
//! time and distance shown on search and detail pages. The sync engine
//! keeps those entries consistent with the distance API in batch runs:
//! reconciliation creates missing entries, the slicer partitions each
//! origin group to the API's per-request limit, and every pair outcome
//! is written back as entry state.

mod memory;
mod slice;
mod sqlite;
mod store;
mod sync;

pub use memory::InMemoryMatrixStore;
pub use slice::{SliceError, slice_indices};
pub use sqlite::SqliteMatrixStore;
pub use store::{EntryUpdate, MatrixStore, OriginKind, OriginRef, StoreError};
pub use sync::{
    DistanceProvider, FillReport, SyncEngine, SyncError, SyncOptions, SyncReport,
    ensure_entries_exist,
};
