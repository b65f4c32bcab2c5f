//! In-memory matrix store.
//!
//! Backs the engine tests and offline dry runs without a database file.
//! Behavior matches `SqliteMatrixStore` for everything the `MatrixStore`
//! trait promises.

use std::collections::BTreeMap;

use crate::domain::{
    CityId, DriveTimeEntry, EntryId, EntryStatus, LatLon, MajorCity, Trailhead, TrailheadId,
    stale_sentinel,
};

use super::store::{EntryUpdate, MatrixStore, OriginRef, StoreError};

/// BTreeMap-backed store; iteration order gives the ascending-id
/// ordering the trait requires.
#[derive(Debug, Default)]
pub struct InMemoryMatrixStore {
    trailheads: BTreeMap<TrailheadId, Trailhead>,
    cities: BTreeMap<CityId, MajorCity>,
    entries: BTreeMap<EntryId, DriveTimeEntry>,
    next_trailhead: i64,
    next_city: i64,
    next_entry: i64,
}

impl InMemoryMatrixStore {
    pub fn new() -> Self {
        Self {
            next_trailhead: 1,
            next_city: 1,
            next_entry: 1,
            ..Self::default()
        }
    }

    /// Seed a trailhead, returning its id.
    pub fn insert_trailhead(&mut self, name: impl Into<String>, coord: LatLon) -> TrailheadId {
        let id = TrailheadId(self.next_trailhead);
        self.next_trailhead += 1;
        self.trailheads.insert(
            id,
            Trailhead {
                id,
                name: name.into(),
                coord,
            },
        );
        id
    }

    /// Seed a major city, returning its id.
    pub fn insert_city(&mut self, name: impl Into<String>, coord: LatLon) -> CityId {
        let id = CityId(self.next_city);
        self.next_city += 1;
        self.cities.insert(
            id,
            MajorCity {
                id,
                name: name.into(),
                coord,
            },
        );
        id
    }

    /// Change a trailhead's coordinates. Callers pair this with
    /// `bulk_invalidate` so cached drive data is recomputed.
    pub fn set_trailhead_coord(
        &mut self,
        id: TrailheadId,
        coord: LatLon,
    ) -> Result<(), StoreError> {
        match self.trailheads.get_mut(&id) {
            Some(th) => {
                th.coord = coord;
                Ok(())
            }
            None => Err(StoreError::Corrupt(format!("no trailhead with id {id}"))),
        }
    }
}

impl MatrixStore for InMemoryMatrixStore {
    fn trailheads(&self) -> Result<Vec<Trailhead>, StoreError> {
        Ok(self.trailheads.values().cloned().collect())
    }

    fn major_cities(&self) -> Result<Vec<MajorCity>, StoreError> {
        Ok(self.cities.values().cloned().collect())
    }

    fn has_entry(&self, trailhead: TrailheadId, city: CityId) -> Result<bool, StoreError> {
        Ok(self
            .entries
            .values()
            .any(|e| e.trailhead == trailhead && e.city == city))
    }

    fn insert_entry(
        &mut self,
        trailhead: TrailheadId,
        city: CityId,
    ) -> Result<EntryId, StoreError> {
        let id = EntryId(self.next_entry);
        self.next_entry += 1;
        self.entries.insert(
            id,
            DriveTimeEntry {
                id,
                trailhead,
                city,
                status: EntryStatus::New,
                drive_distance: None,
                drive_time: None,
                last_updated: stale_sentinel(),
                error_message: String::new(),
            },
        );
        Ok(id)
    }

    fn find_pending(
        &self,
        origin: OriginRef,
        statuses: &[EntryStatus],
    ) -> Result<Vec<DriveTimeEntry>, StoreError> {
        Ok(self
            .entries
            .values()
            .filter(|e| match origin {
                OriginRef::MajorCity(city) => e.city == city,
                OriginRef::Trailhead(th) => e.trailhead == th,
            })
            .filter(|e| statuses.contains(&e.status))
            .cloned()
            .collect())
    }

    fn get_entry(&self, id: EntryId) -> Result<Option<DriveTimeEntry>, StoreError> {
        Ok(self.entries.get(&id).cloned())
    }

    fn update_entry(&mut self, id: EntryId, update: &EntryUpdate) -> Result<(), StoreError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(StoreError::EntryNotFound(id))?;

        entry.status = update.status;
        entry.drive_distance = update.drive_distance;
        entry.drive_time = update.drive_time;
        entry.error_message = update.error_message.clone();
        if let Some(date) = update.last_updated {
            entry.last_updated = date;
        }
        Ok(())
    }

    fn bulk_invalidate(&mut self, trailhead: TrailheadId) -> Result<usize, StoreError> {
        let mut reset = 0;
        for entry in self.entries.values_mut() {
            if entry.trailhead == trailhead {
                entry.status = EntryStatus::New;
                entry.drive_distance = None;
                entry.drive_time = None;
                reset += 1;
            }
        }
        Ok(reset)
    }

    fn entry_count(&self) -> Result<usize, StoreError> {
        Ok(self.entries.len())
    }
}
