//! Repository interface for the drive-time matrix.
//!
//! The sync engine only ever talks to this trait, so it can run against
//! the SQLite store in production and the in-memory store in tests.

use chrono::NaiveDate;

use crate::domain::{
    CityId, DriveTimeEntry, EntryId, EntryStatus, MajorCity, Trailhead, TrailheadId,
};

/// Errors from matrix store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be decoded into its domain type
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// No entry with this id exists
    #[error("drive-time entry {0} not found")]
    EntryNotFound(EntryId),

    /// An entry references a trailhead or city that is not in the store
    #[error("entry {entry} references missing {kind} {id}")]
    MissingReference {
        entry: EntryId,
        kind: &'static str,
        id: i64,
    },
}

/// Which side of the pair acts as the batch origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    /// One batch per major city; trailheads are the destinations.
    MajorCity,
    /// One batch per trailhead; major cities are the destinations.
    Trailhead,
}

/// A concrete origin to select pending entries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginRef {
    MajorCity(CityId),
    Trailhead(TrailheadId),
}

/// Field changes to apply to one entry.
///
/// `last_updated` is `None` to leave the stored date untouched (failure
/// updates keep the old date so the entry still reads as stale).
#[derive(Debug, Clone, PartialEq)]
pub struct EntryUpdate {
    pub status: EntryStatus,
    pub drive_distance: Option<f64>,
    pub drive_time: Option<f64>,
    pub error_message: String,
    pub last_updated: Option<NaiveDate>,
}

impl EntryUpdate {
    /// A successful sync: cache the values, clear any old error, stamp
    /// the date.
    pub fn success(distance_meters: f64, time_secs: f64, as_of: NaiveDate) -> Self {
        Self {
            status: EntryStatus::Ok,
            drive_distance: Some(distance_meters),
            drive_time: Some(time_secs),
            error_message: String::new(),
            last_updated: Some(as_of),
        }
    }

    /// A failed sync: record the message, clear any cached values.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: EntryStatus::Error,
            drive_distance: None,
            drive_time: None,
            error_message: message.into(),
            last_updated: None,
        }
    }
}

/// Persistence operations the sync engine needs.
///
/// Implementations must return entries from `find_pending` in ascending
/// id order (batch/pair pairing relies on a stable order) and must
/// de-duplicate by entry id when several statuses are requested.
pub trait MatrixStore {
    /// All trailheads, ascending id.
    fn trailheads(&self) -> Result<Vec<Trailhead>, StoreError>;

    /// All major cities, ascending id.
    fn major_cities(&self) -> Result<Vec<MajorCity>, StoreError>;

    /// Whether an entry exists for this pair.
    fn has_entry(&self, trailhead: TrailheadId, city: CityId) -> Result<bool, StoreError>;

    /// Create a fresh entry for this pair: status New, no cached values,
    /// stale sentinel date.
    fn insert_entry(&mut self, trailhead: TrailheadId, city: CityId)
    -> Result<EntryId, StoreError>;

    /// Entries of the given origin whose status is in `statuses`,
    /// ascending id, each entry at most once.
    fn find_pending(
        &self,
        origin: OriginRef,
        statuses: &[EntryStatus],
    ) -> Result<Vec<DriveTimeEntry>, StoreError>;

    /// Fetch one entry by id.
    fn get_entry(&self, id: EntryId) -> Result<Option<DriveTimeEntry>, StoreError>;

    /// Apply an update to one entry.
    fn update_entry(&mut self, id: EntryId, update: &EntryUpdate) -> Result<(), StoreError>;

    /// Reset every entry of this trailhead to New and clear its cached
    /// distance/time (the coordinates-changed trigger). Error messages
    /// and other trailheads are untouched. Returns how many entries were
    /// reset.
    fn bulk_invalidate(&mut self, trailhead: TrailheadId) -> Result<usize, StoreError>;

    /// Total number of matrix entries.
    fn entry_count(&self) -> Result<usize, StoreError>;
}
