//! SQLite-backed matrix store.
//!
//! One row per (trailhead, major city) pair, with the uniqueness the
//! data model requires enforced by the schema. Views read this table for
//! cached drive data; only the sync engine writes entry state.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::domain::{
    CityId, DriveTimeEntry, EntryId, EntryStatus, LatLon, MajorCity, Trailhead, TrailheadId,
};

use super::store::{EntryUpdate, MatrixStore, OriginRef, StoreError};

const CREATE_TRAILHEADS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS trailheads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL
)
";

const CREATE_MAJOR_CITIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS major_cities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL
)
";

const CREATE_DRIVE_TIMES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS drive_times (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    trailhead_id INTEGER NOT NULL REFERENCES trailheads(id) ON DELETE CASCADE,
    majorcity_id INTEGER NOT NULL REFERENCES major_cities(id) ON DELETE CASCADE,
    status INTEGER NOT NULL DEFAULT 1,
    drive_distance REAL,
    drive_time REAL,
    last_updated TEXT NOT NULL DEFAULT '1900-01-01',
    error_message TEXT NOT NULL DEFAULT '',
    UNIQUE(trailhead_id, majorcity_id)
)
";

const CREATE_STATUS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_drive_times_status ON drive_times(status)
";

const CREATE_CITY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_drive_times_city ON drive_times(majorcity_id)
";

const CREATE_TRAILHEAD_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_drive_times_trailhead ON drive_times(trailhead_id)
";

/// All schema creation statements in order.
const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_TRAILHEADS_TABLE,
    CREATE_MAJOR_CITIES_TABLE,
    CREATE_DRIVE_TIMES_TABLE,
    CREATE_STATUS_INDEX,
    CREATE_CITY_INDEX,
    CREATE_TRAILHEAD_INDEX,
];

const ENTRY_COLUMNS: &str =
    "id, trailhead_id, majorcity_id, status, drive_distance, drive_time, last_updated, error_message";

/// Persistent matrix store.
#[derive(Debug)]
pub struct SqliteMatrixStore {
    path: PathBuf,
    conn: Connection,
}

impl SqliteMatrixStore {
    /// Open or create a store at the given path, initializing the
    /// schema if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        debug!("opening matrix store at {}", path.display());
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        initialize_schema(&conn)?;

        Ok(Self { path, conn })
    }

    /// Create an in-memory store (tests, dry runs).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed a trailhead, returning its id.
    pub fn insert_trailhead(
        &mut self,
        name: &str,
        coord: LatLon,
    ) -> Result<TrailheadId, StoreError> {
        self.conn.execute(
            "INSERT INTO trailheads (name, latitude, longitude) VALUES (?1, ?2, ?3)",
            params![name, coord.latitude(), coord.longitude()],
        )?;
        Ok(TrailheadId(self.conn.last_insert_rowid()))
    }

    /// Seed a major city, returning its id.
    pub fn insert_city(&mut self, name: &str, coord: LatLon) -> Result<CityId, StoreError> {
        self.conn.execute(
            "INSERT INTO major_cities (name, latitude, longitude) VALUES (?1, ?2, ?3)",
            params![name, coord.latitude(), coord.longitude()],
        )?;
        Ok(CityId(self.conn.last_insert_rowid()))
    }

    /// Change a trailhead's coordinates. Callers pair this with
    /// `bulk_invalidate` so cached drive data is recomputed.
    pub fn set_trailhead_coord(
        &mut self,
        id: TrailheadId,
        coord: LatLon,
    ) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE trailheads SET latitude = ?1, longitude = ?2 WHERE id = ?3",
            params![coord.latitude(), coord.longitude(), id.0],
        )?;
        if changed == 0 {
            return Err(StoreError::Corrupt(format!("no trailhead with id {id}")));
        }
        Ok(())
    }

    /// Entry counts per status, for operator visibility.
    pub fn status_counts(&self) -> Result<Vec<(EntryStatus, usize)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM drive_times GROUP BY status ORDER BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (code, count) = row?;
            let status = EntryStatus::from_code(code)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown status code {code}")))?;
            counts.push((status, count as usize));
        }
        Ok(counts)
    }

    fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntryRow> {
        Ok(RawEntryRow {
            id: row.get(0)?,
            trailhead_id: row.get(1)?,
            city_id: row.get(2)?,
            status: row.get(3)?,
            drive_distance: row.get(4)?,
            drive_time: row.get(5)?,
            last_updated: row.get(6)?,
            error_message: row.get(7)?,
        })
    }
}

/// Entry row as stored, before domain decoding.
struct RawEntryRow {
    id: i64,
    trailhead_id: i64,
    city_id: i64,
    status: i64,
    drive_distance: Option<f64>,
    drive_time: Option<f64>,
    last_updated: String,
    error_message: String,
}

impl RawEntryRow {
    fn decode(self) -> Result<DriveTimeEntry, StoreError> {
        let status = EntryStatus::from_code(self.status).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "entry {}: unknown status code {}",
                self.id, self.status
            ))
        })?;
        let last_updated =
            NaiveDate::parse_from_str(&self.last_updated, "%Y-%m-%d").map_err(|e| {
                StoreError::Corrupt(format!(
                    "entry {}: bad last_updated {:?}: {e}",
                    self.id, self.last_updated
                ))
            })?;

        Ok(DriveTimeEntry {
            id: EntryId(self.id),
            trailhead: TrailheadId(self.trailhead_id),
            city: CityId(self.city_id),
            status,
            drive_distance: self.drive_distance,
            drive_time: self.drive_time,
            last_updated,
            error_message: self.error_message,
        })
    }
}

fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    for stmt in SCHEMA_STATEMENTS {
        conn.execute(stmt, [])?;
    }
    Ok(())
}

fn decode_place_row(
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
) -> Result<(i64, String, LatLon), StoreError> {
    let coord = LatLon::new(latitude, longitude).map_err(|e| {
        StoreError::Corrupt(format!("row {id}: stored coordinate out of range: {e}"))
    })?;
    Ok((id, name, coord))
}

impl MatrixStore for SqliteMatrixStore {
    fn trailheads(&self) -> Result<Vec<Trailhead>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, latitude, longitude FROM trailheads ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut trailheads = Vec::new();
        for row in rows {
            let (id, name, lat, lon) = row?;
            let (id, name, coord) = decode_place_row(id, name, lat, lon)?;
            trailheads.push(Trailhead {
                id: TrailheadId(id),
                name,
                coord,
            });
        }
        Ok(trailheads)
    }

    fn major_cities(&self) -> Result<Vec<MajorCity>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, latitude, longitude FROM major_cities ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut cities = Vec::new();
        for row in rows {
            let (id, name, lat, lon) = row?;
            let (id, name, coord) = decode_place_row(id, name, lat, lon)?;
            cities.push(MajorCity {
                id: CityId(id),
                name,
                coord,
            });
        }
        Ok(cities)
    }

    fn has_entry(&self, trailhead: TrailheadId, city: CityId) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM drive_times WHERE trailhead_id = ?1 AND majorcity_id = ?2",
            params![trailhead.0, city.0],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn insert_entry(
        &mut self,
        trailhead: TrailheadId,
        city: CityId,
    ) -> Result<EntryId, StoreError> {
        self.conn.execute(
            "INSERT INTO drive_times (trailhead_id, majorcity_id) VALUES (?1, ?2)",
            params![trailhead.0, city.0],
        )?;
        Ok(EntryId(self.conn.last_insert_rowid()))
    }

    fn find_pending(
        &self,
        origin: OriginRef,
        statuses: &[EntryStatus],
    ) -> Result<Vec<DriveTimeEntry>, StoreError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let (origin_column, origin_id) = match origin {
            OriginRef::MajorCity(city) => ("majorcity_id", city.0),
            OriginRef::Trailhead(th) => ("trailhead_id", th.0),
        };

        // One IN query keeps multi-status selection a de-duplicated
        // union: each row matches at most once.
        let placeholders = vec!["?"; statuses.len()].join(", ");
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM drive_times \
             WHERE {origin_column} = ? AND status IN ({placeholders}) \
             ORDER BY id"
        );

        let mut params_vec: Vec<i64> = vec![origin_id];
        params_vec.extend(statuses.iter().map(|s| s.code()));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec), Self::row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.decode()?);
        }
        Ok(entries)
    }

    fn get_entry(&self, id: EntryId) -> Result<Option<DriveTimeEntry>, StoreError> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM drive_times WHERE id = ?1"),
                [id.0],
                Self::row_to_entry,
            )
            .optional()?;

        raw.map(RawEntryRow::decode).transpose()
    }

    fn update_entry(&mut self, id: EntryId, update: &EntryUpdate) -> Result<(), StoreError> {
        let changed = match update.last_updated {
            Some(date) => self.conn.execute(
                "UPDATE drive_times SET status = ?1, drive_distance = ?2, drive_time = ?3, \
                 error_message = ?4, last_updated = ?5 WHERE id = ?6",
                params![
                    update.status.code(),
                    update.drive_distance,
                    update.drive_time,
                    update.error_message,
                    date.format("%Y-%m-%d").to_string(),
                    id.0
                ],
            )?,
            None => self.conn.execute(
                "UPDATE drive_times SET status = ?1, drive_distance = ?2, drive_time = ?3, \
                 error_message = ?4 WHERE id = ?5",
                params![
                    update.status.code(),
                    update.drive_distance,
                    update.drive_time,
                    update.error_message,
                    id.0
                ],
            )?,
        };

        if changed == 0 {
            return Err(StoreError::EntryNotFound(id));
        }
        Ok(())
    }

    fn bulk_invalidate(&mut self, trailhead: TrailheadId) -> Result<usize, StoreError> {
        let reset = self.conn.execute(
            "UPDATE drive_times SET status = ?1, drive_distance = NULL, drive_time = NULL \
             WHERE trailhead_id = ?2",
            params![EntryStatus::New.code(), trailhead.0],
        )?;
        Ok(reset)
    }

    fn entry_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM drive_times", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
