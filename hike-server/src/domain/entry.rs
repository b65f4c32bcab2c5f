//! The drive-time matrix cell: one (trailhead, major city) pair.

use chrono::NaiveDate;

use super::place::{CityId, TrailheadId};
use super::units;

/// Identifier of a drive-time entry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub i64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of the last sync attempt on an entry.
///
/// Stored as integer codes 1/2/3. `New` means the entry has never been
/// synced (or was invalidated after a coordinate change) and is always
/// selected on the next new-items run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    New,
    Ok,
    Error,
}

impl EntryStatus {
    /// Integer code used in persistent storage.
    pub fn code(&self) -> i64 {
        match self {
            EntryStatus::New => 1,
            EntryStatus::Ok => 2,
            EntryStatus::Error => 3,
        }
    }

    /// Decode a stored status code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(EntryStatus::New),
            2 => Some(EntryStatus::Ok),
            3 => Some(EntryStatus::Error),
            _ => None,
        }
    }

    /// Human-readable label for operator output.
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::New => "New Item",
            EntryStatus::Ok => "OK",
            EntryStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The `last_updated` default. Old enough that any entry which has never
/// been synced always reads as stale.
pub fn stale_sentinel() -> NaiveDate {
    // 1900-01-01 is a valid date; construction cannot fail.
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
}

/// One persisted (trailhead, major city) drive-time record.
///
/// Distance is in meters and time in seconds, the provider's native
/// units. Both are `None` until a sync succeeds, and cleared again on
/// failure or invalidation.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveTimeEntry {
    pub id: EntryId,
    pub trailhead: TrailheadId,
    pub city: CityId,
    pub status: EntryStatus,
    pub drive_distance: Option<f64>,
    pub drive_time: Option<f64>,
    pub last_updated: NaiveDate,
    pub error_message: String,
}

impl DriveTimeEntry {
    /// Cached drive distance in miles, if synced.
    pub fn drive_distance_miles(&self) -> Option<f64> {
        self.drive_distance.map(units::m_to_miles)
    }

    /// Cached drive time in minutes, if synced.
    pub fn drive_time_minutes(&self) -> Option<f64> {
        self.drive_time.map(|secs| secs / 60.0)
    }

    /// Cached drive time as an "X hr Y min" label, if synced.
    pub fn drive_time_label(&self) -> Option<String> {
        self.drive_time.map(|secs| {
            let (hours, minutes) = units::sec_to_hour_min(secs);
            format!("{hours} hr {minutes} min")
        })
    }
}
