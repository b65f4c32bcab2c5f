//! Drive-time matrix synchronization.
//!
//! The engine reconciles the matrix against the current trailhead and
//! city sets, selects entries by status, batches each origin group to
//! the provider's destination limit, and writes every pair outcome back
//! as entry state. API failures of any kind become `Error` entries to
//! be retried on a later run; nothing short of a store failure aborts a
//! run partway.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::distance::{DistanceClient, PairOutcome, RawResult, unpack_pair};
use crate::domain::{DriveTimeEntry, EntryStatus, LatLon, TrailheadId};

use super::slice::{SliceError, slice_indices};
use super::store::{EntryUpdate, MatrixStore, OriginKind, OriginRef, StoreError};

/// Error from a sync run.
///
/// API and pair failures are not errors here; they are recorded on the
/// affected entries. This type covers the store and the caller's inputs.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The matrix store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The provider's batch limit cannot cover any destinations
    #[error("invalid batch limit: {0}")]
    InvalidBatchLimit(#[from] SliceError),
}

/// A source of distance-matrix batch results.
///
/// Consumer-side seam so the engine can run against the real
/// [`DistanceClient`] in production and a scripted fake in tests.
// Returned futures need not be Send; the engine awaits each call in turn.
#[allow(async_fn_in_trait)]
pub trait DistanceProvider {
    /// The provider's destinations-per-request limit.
    fn max_destinations(&self) -> usize;

    /// One batch call: one origin against up to `max_destinations`
    /// destinations, pair results in destination order.
    async fn fetch_distances(&self, origin: &LatLon, destinations: &[LatLon]) -> RawResult;
}

impl DistanceProvider for DistanceClient {
    fn max_destinations(&self) -> usize {
        DistanceClient::max_destinations(self)
    }

    async fn fetch_distances(&self, origin: &LatLon, destinations: &[LatLon]) -> RawResult {
        DistanceClient::fetch_distances(self, origin, destinations).await
    }
}

/// Which entry statuses a sync run selects, and how entries are grouped
/// into batch origins.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Select entries that have never been synced (or were invalidated).
    pub run_new: bool,
    /// Select entries whose last sync attempt failed.
    pub run_errors: bool,
    /// Batch per major city or per trailhead.
    pub origin: OriginKind,
}

impl Default for SyncOptions {
    /// New entries only, batched per major city.
    fn default() -> Self {
        Self {
            run_new: true,
            run_errors: false,
            origin: OriginKind::MajorCity,
        }
    }
}

impl SyncOptions {
    /// The statuses this run selects. Selection over several statuses is
    /// a union keyed by entry id, so an entry is processed at most once.
    pub fn selected_statuses(&self) -> Vec<EntryStatus> {
        let mut statuses = Vec::new();
        if self.run_new {
            statuses.push(EntryStatus::New);
        }
        if self.run_errors {
            statuses.push(EntryStatus::Error);
        }
        statuses
    }
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone)]
pub struct FillReport {
    /// How many missing (trailhead, city) pairs were created.
    pub num_added: usize,
    /// Operator-readable log of what was added.
    pub trace: Vec<String>,
}

/// Result of a full sync run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Entries created by the reconciliation step.
    pub num_added: usize,
    /// Entries updated with a successful API result.
    pub num_updated: usize,
    /// Operator-readable log of the run.
    pub trace: Vec<String>,
}

/// Create an entry for every (trailhead, city) pair that lacks one.
///
/// Idempotent: pairs that already have an entry are left untouched, so
/// re-running on a complete matrix is a no-op. New entries start as
/// `New` with no cached values and the stale sentinel date.
pub fn ensure_entries_exist<S: MatrixStore>(store: &mut S) -> Result<FillReport, StoreError> {
    let trailheads = store.trailheads()?;
    let cities = store.major_cities()?;

    let mut num_added = 0;
    let mut trace = Vec::new();

    for city in &cities {
        let mut city_count = 0;
        for trailhead in &trailheads {
            if store.has_entry(trailhead.id, city.id)? {
                continue;
            }
            store.insert_entry(trailhead.id, city.id)?;
            city_count += 1;
            num_added += 1;
            trace.push(format!("Added {} - {}", city.name, trailhead.name));
        }
        trace.push(format!("Entries added for {}: {city_count}", city.name));
    }
    trace.push(format!("Total new entries: {num_added}"));

    debug!(num_added, "matrix reconciliation finished");
    Ok(FillReport { num_added, trace })
}

/// One pending entry with its resolved destination coordinate.
struct PendingPair {
    entry: DriveTimeEntry,
    destination: LatLon,
    /// `"origin : destination"` by name, for the trace.
    label: String,
}

/// All pending entries sharing one batch origin.
struct OriginGroup {
    name: String,
    coord: LatLon,
    pairs: Vec<PendingPair>,
}

/// The sync engine: drives the matrix toward the provider's answers.
///
/// Generic over the store and the provider so the orchestration logic
/// tests without a database or network.
pub struct SyncEngine<'a, S: MatrixStore, P: DistanceProvider> {
    store: &'a mut S,
    provider: &'a P,
}

impl<'a, S: MatrixStore, P: DistanceProvider> SyncEngine<'a, S, P> {
    pub fn new(store: &'a mut S, provider: &'a P) -> Self {
        Self { store, provider }
    }

    /// Reset every entry of this trailhead to `New` and clear its cached
    /// values, so the next new-items run recomputes them. Used after the
    /// trailhead's coordinates change.
    pub fn invalidate(&mut self, trailhead: TrailheadId) -> Result<usize, SyncError> {
        let reset = self.store.bulk_invalidate(trailhead)?;
        info!(%trailhead, reset, "invalidated drive-time entries");
        Ok(reset)
    }

    /// Run a full sync, stamping successful entries with today's date.
    pub async fn synchronize(&mut self, options: &SyncOptions) -> Result<SyncReport, SyncError> {
        let today = chrono::Local::now().date_naive();
        self.synchronize_as_of(options, today).await
    }

    /// Run a full sync with an explicit update date.
    ///
    /// Reconciles first, then works through each origin group: selected
    /// entries are batched to the provider's destination limit, one call
    /// per batch, and every pair in the response is applied to its entry
    /// by position. A batch-level failure marks every entry in that
    /// batch `Error` and the run moves on to the next batch; a
    /// pair-level failure marks only its own entry.
    pub async fn synchronize_as_of(
        &mut self,
        options: &SyncOptions,
        as_of: NaiveDate,
    ) -> Result<SyncReport, SyncError> {
        let fill = ensure_entries_exist(self.store)?;
        let num_added = fill.num_added;
        let mut trace = fill.trace;

        let statuses = options.selected_statuses();
        if statuses.is_empty() {
            trace.push("No entry statuses selected; nothing to update.".to_string());
            return Ok(SyncReport {
                num_added,
                num_updated: 0,
                trace,
            });
        }

        let max_batch = self.provider.max_destinations();
        if max_batch == 0 {
            return Err(SyncError::InvalidBatchLimit(SliceError::EmptyBatch(0)));
        }

        let mut num_updated = 0;
        for group in self.collect_groups(options.origin, &statuses)? {
            if group.pairs.is_empty() {
                trace.push(format!("No records to update for {}", group.name));
                continue;
            }

            trace.push(format!(
                "Records to update for {}: {}",
                group.name,
                group.pairs.len()
            ));
            for pair in &group.pairs {
                trace.push(format!("{} ----- {}", pair.entry.status.label(), pair.label));
            }

            let destinations: Vec<LatLon> = group.pairs.iter().map(|p| p.destination).collect();
            for (start, end) in slice_indices(group.pairs.len(), max_batch)? {
                debug!(
                    origin = %group.name,
                    batch = end - start,
                    "distance matrix batch"
                );
                let raw = self
                    .provider
                    .fetch_distances(&group.coord, &destinations[start..end])
                    .await;

                for (offset, pair) in group.pairs[start..end].iter().enumerate() {
                    match unpack_pair(&raw, offset) {
                        PairOutcome::Ok { duration, distance } => {
                            self.store.update_entry(
                                pair.entry.id,
                                &EntryUpdate::success(distance.value, duration.value, as_of),
                            )?;
                            trace.push(format!("VALID -- {}", pair.label));
                            trace.push(format!(
                                "     distance: {}, time: {}",
                                distance.value, duration.value
                            ));
                            num_updated += 1;
                        }
                        PairOutcome::BatchFailed { message, .. } => {
                            self.store
                                .update_entry(pair.entry.id, &EntryUpdate::failure(&message))?;
                            trace.push(format!("API error for {} -- '{message}'", pair.label));
                        }
                        PairOutcome::PairFailed { message, .. } => {
                            self.store
                                .update_entry(pair.entry.id, &EntryUpdate::failure(&message))?;
                            trace.push(format!("Data error for {} -- '{message}'", pair.label));
                        }
                    }
                }
            }
        }

        trace.push(format!("Number updated: {num_updated}"));
        info!(num_added, num_updated, "drive-time sync finished");

        Ok(SyncReport {
            num_added,
            num_updated,
            trace,
        })
    }

    /// Group pending entries by batch origin, resolving the destination
    /// coordinate of every entry. Entry order inside a group is the
    /// store's ascending-id order; the batch/pair position math depends
    /// on keeping it.
    fn collect_groups(
        &self,
        origin: OriginKind,
        statuses: &[EntryStatus],
    ) -> Result<Vec<OriginGroup>, SyncError> {
        let trailheads = self.store.trailheads()?;
        let cities = self.store.major_cities()?;

        let mut groups = Vec::new();
        match origin {
            OriginKind::MajorCity => {
                for city in &cities {
                    let pending = self
                        .store
                        .find_pending(OriginRef::MajorCity(city.id), statuses)?;
                    let mut pairs = Vec::with_capacity(pending.len());
                    for entry in pending {
                        let trailhead = trailheads
                            .iter()
                            .find(|t| t.id == entry.trailhead)
                            .ok_or(StoreError::MissingReference {
                                entry: entry.id,
                                kind: "trailhead",
                                id: entry.trailhead.0,
                            })?;
                        pairs.push(PendingPair {
                            destination: trailhead.coord,
                            label: format!("{} : {}", city.name, trailhead.name),
                            entry,
                        });
                    }
                    groups.push(OriginGroup {
                        name: city.name.clone(),
                        coord: city.coord,
                        pairs,
                    });
                }
            }
            OriginKind::Trailhead => {
                for trailhead in &trailheads {
                    let pending = self
                        .store
                        .find_pending(OriginRef::Trailhead(trailhead.id), statuses)?;
                    let mut pairs = Vec::with_capacity(pending.len());
                    for entry in pending {
                        let city = cities.iter().find(|c| c.id == entry.city).ok_or(
                            StoreError::MissingReference {
                                entry: entry.id,
                                kind: "major city",
                                id: entry.city.0,
                            },
                        )?;
                        pairs.push(PendingPair {
                            destination: city.coord,
                            label: format!("{} : {}", trailhead.name, city.name),
                            entry,
                        });
                    }
                    groups.push(OriginGroup {
                        name: trailhead.name.clone(),
                        coord: trailhead.coord,
                        pairs,
                    });
                }
            }
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::distance::{MatrixElement, MatrixResponse, MatrixRow, ValueText};
    use crate::domain::{CityId, stale_sentinel};
    use crate::matrix::memory::InMemoryMatrixStore;

    /// Serves pre-scripted batch results in order and records every call.
    struct ScriptedProvider {
        max_destinations: usize,
        responses: RefCell<VecDeque<RawResult>>,
        calls: RefCell<Vec<(String, usize)>>,
    }

    impl ScriptedProvider {
        fn new(max_destinations: usize, responses: Vec<RawResult>) -> Self {
            Self {
                max_destinations,
                responses: RefCell::new(responses.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        /// Recorded `(origin, destination count)` per call, in order.
        fn calls(&self) -> Vec<(String, usize)> {
            self.calls.borrow().clone()
        }
    }

    impl DistanceProvider for ScriptedProvider {
        fn max_destinations(&self) -> usize {
            self.max_destinations
        }

        async fn fetch_distances(&self, origin: &LatLon, destinations: &[LatLon]) -> RawResult {
            self.calls
                .borrow_mut()
                .push((origin.to_string(), destinations.len()));
            self.responses
                .borrow_mut()
                .pop_front()
                .expect("provider called more times than scripted")
        }
    }

    fn coord(lat: f64, lon: f64) -> LatLon {
        LatLon::new(lat, lon).unwrap()
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    fn ok_element(distance: f64, duration: f64) -> MatrixElement {
        MatrixElement {
            status: "OK".to_string(),
            duration: Some(ValueText {
                value: duration,
                text: format!("{duration} secs"),
            }),
            distance: Some(ValueText {
                value: distance,
                text: format!("{distance} m"),
            }),
        }
    }

    fn failed_element(code: &str) -> MatrixElement {
        MatrixElement {
            status: code.to_string(),
            duration: None,
            distance: None,
        }
    }

    fn ok_payload(elements: Vec<MatrixElement>) -> RawResult {
        RawResult::Payload(MatrixResponse {
            status: "OK".to_string(),
            error_message: None,
            origin_addresses: Vec::new(),
            destination_addresses: Vec::new(),
            rows: vec![MatrixRow { elements }],
        })
    }

    fn transport_failure() -> RawResult {
        RawResult::Transport {
            message: "connection refused".to_string(),
        }
    }

    /// `n_trailheads` trailheads and `n_cities` cities, distinct coords.
    fn seeded_store(n_trailheads: usize, n_cities: usize) -> InMemoryMatrixStore {
        let mut store = InMemoryMatrixStore::new();
        for i in 0..n_trailheads {
            store.insert_trailhead(format!("Trailhead {}", i + 1), coord(46.0 + i as f64, -121.5));
        }
        for i in 0..n_cities {
            store.insert_city(format!("City {}", i + 1), coord(47.0, -122.0 - i as f64));
        }
        store
    }

    #[test]
    fn reconciliation_creates_full_matrix_once() {
        let mut store = seeded_store(3, 2);

        let first = ensure_entries_exist(&mut store).unwrap();
        assert_eq!(first.num_added, 6);
        assert_eq!(store.entry_count().unwrap(), 6);
        assert!(first.trace.contains(&"Added City 1 - Trailhead 1".to_string()));
        assert!(first.trace.contains(&"Entries added for City 2: 3".to_string()));
        assert!(first.trace.contains(&"Total new entries: 6".to_string()));

        // Second run is a no-op.
        let second = ensure_entries_exist(&mut store).unwrap();
        assert_eq!(second.num_added, 0);
        assert_eq!(store.entry_count().unwrap(), 6);
        assert!(second.trace.contains(&"Total new entries: 0".to_string()));
    }

    #[test]
    fn reconciliation_fills_only_missing_pairs() {
        let mut store = seeded_store(2, 1);
        ensure_entries_exist(&mut store).unwrap();

        store.insert_trailhead("Trailhead 3", coord(48.1, -121.5));
        let report = ensure_entries_exist(&mut store).unwrap();

        assert_eq!(report.num_added, 1);
        assert_eq!(store.entry_count().unwrap(), 3);
        assert!(report.trace.contains(&"Added City 1 - Trailhead 3".to_string()));
    }

    #[tokio::test]
    async fn successful_sync_marks_entries_ok() {
        let mut store = seeded_store(2, 1);
        let provider = ScriptedProvider::new(
            25,
            vec![ok_payload(vec![
                ok_element(160934.0, 9000.0),
                ok_element(80000.0, 4000.0),
            ])],
        );

        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        assert_eq!(report.num_added, 2);
        assert_eq!(report.num_updated, 2);
        assert_eq!(provider.calls(), vec![("47,-122".to_string(), 2)]);

        for (id, distance, time) in [(1, 160934.0, 9000.0), (2, 80000.0, 4000.0)] {
            let entry = store.get_entry(crate::domain::EntryId(id)).unwrap().unwrap();
            assert_eq!(entry.status, EntryStatus::Ok);
            assert_eq!(entry.drive_distance, Some(distance));
            assert_eq!(entry.drive_time, Some(time));
            assert_eq!(entry.last_updated, as_of());
            assert!(entry.error_message.is_empty());
        }
    }

    #[tokio::test]
    async fn transport_failure_marks_whole_batch_error() {
        let mut store = seeded_store(2, 1);
        let provider = ScriptedProvider::new(25, vec![transport_failure()]);

        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        assert_eq!(report.num_updated, 0);
        for id in [1, 2] {
            let entry = store.get_entry(crate::domain::EntryId(id)).unwrap().unwrap();
            assert_eq!(entry.status, EntryStatus::Error);
            assert_eq!(entry.error_message, "connection refused");
            assert_eq!(entry.drive_distance, None);
            assert_eq!(entry.drive_time, None);
            // Failures never stamp the update date.
            assert_eq!(entry.last_updated, stale_sentinel());
        }
    }

    #[tokio::test]
    async fn pair_failure_is_isolated_to_its_entry() {
        let mut store = seeded_store(2, 1);
        let provider = ScriptedProvider::new(
            25,
            vec![ok_payload(vec![
                ok_element(1000.0, 60.0),
                failed_element("ZERO_RESULTS"),
            ])],
        );

        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        assert_eq!(report.num_updated, 1);

        let good = store.get_entry(crate::domain::EntryId(1)).unwrap().unwrap();
        assert_eq!(good.status, EntryStatus::Ok);

        let bad = store.get_entry(crate::domain::EntryId(2)).unwrap().unwrap();
        assert_eq!(bad.status, EntryStatus::Error);
        assert_eq!(bad.error_message, "no driving route could be found for this pair");
        assert_eq!(bad.drive_distance, None);
    }

    #[tokio::test]
    async fn batch_failure_does_not_abort_other_origins() {
        let mut store = seeded_store(1, 2);
        let provider = ScriptedProvider::new(
            25,
            vec![transport_failure(), ok_payload(vec![ok_element(500.0, 30.0)])],
        );

        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        assert_eq!(report.num_updated, 1);
        assert_eq!(provider.calls().len(), 2);

        // City 1's entry failed, city 2's succeeded.
        let failed = store.get_entry(crate::domain::EntryId(1)).unwrap().unwrap();
        assert_eq!(failed.status, EntryStatus::Error);
        let ok = store.get_entry(crate::domain::EntryId(2)).unwrap().unwrap();
        assert_eq!(ok.status, EntryStatus::Ok);
    }

    #[tokio::test]
    async fn destinations_batched_to_provider_limit() {
        let mut store = seeded_store(5, 1);
        let provider = ScriptedProvider::new(
            2,
            vec![
                ok_payload(vec![ok_element(1000.0, 10.0), ok_element(2000.0, 20.0)]),
                ok_payload(vec![ok_element(3000.0, 30.0), ok_element(4000.0, 40.0)]),
                ok_payload(vec![ok_element(5000.0, 50.0)]),
            ],
        );

        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        assert_eq!(report.num_updated, 5);
        assert_eq!(
            provider.calls(),
            vec![
                ("47,-122".to_string(), 2),
                ("47,-122".to_string(), 2),
                ("47,-122".to_string(), 1),
            ]
        );

        // Pair results land on the right entries across slices.
        for id in 1..=5 {
            let entry = store.get_entry(crate::domain::EntryId(id)).unwrap().unwrap();
            assert_eq!(entry.drive_distance, Some(1000.0 * id as f64));
            assert_eq!(entry.drive_time, Some(10.0 * id as f64));
        }
    }

    #[tokio::test]
    async fn union_selection_processes_each_entry_once() {
        let mut store = seeded_store(3, 1);
        ensure_entries_exist(&mut store).unwrap();

        // Entry 1 stays New, entry 2 failed before, entry 3 is current.
        store
            .update_entry(crate::domain::EntryId(2), &EntryUpdate::failure("old failure"))
            .unwrap();
        store
            .update_entry(
                crate::domain::EntryId(3),
                &EntryUpdate::success(9.0, 9.0, as_of()),
            )
            .unwrap();

        let provider = ScriptedProvider::new(
            25,
            vec![ok_payload(vec![
                ok_element(1000.0, 60.0),
                ok_element(2000.0, 120.0),
            ])],
        );

        let options = SyncOptions {
            run_new: true,
            run_errors: true,
            origin: OriginKind::MajorCity,
        };
        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&options, as_of())
            .await
            .unwrap();

        // One call covering the New and Error entries exactly once; the
        // OK entry is untouched.
        assert_eq!(report.num_updated, 2);
        assert_eq!(provider.calls(), vec![("47,-122".to_string(), 2)]);
        let untouched = store.get_entry(crate::domain::EntryId(3)).unwrap().unwrap();
        assert_eq!(untouched.drive_distance, Some(9.0));
    }

    #[tokio::test]
    async fn errors_only_run_retries_failed_entries() {
        let mut store = seeded_store(2, 1);
        ensure_entries_exist(&mut store).unwrap();
        store
            .update_entry(crate::domain::EntryId(1), &EntryUpdate::failure("flaky"))
            .unwrap();

        let provider = ScriptedProvider::new(25, vec![ok_payload(vec![ok_element(700.0, 70.0)])]);

        let options = SyncOptions {
            run_new: false,
            run_errors: true,
            origin: OriginKind::MajorCity,
        };
        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&options, as_of())
            .await
            .unwrap();

        assert_eq!(report.num_updated, 1);
        assert_eq!(provider.calls(), vec![("47,-122".to_string(), 1)]);

        let retried = store.get_entry(crate::domain::EntryId(1)).unwrap().unwrap();
        assert_eq!(retried.status, EntryStatus::Ok);
        assert!(retried.error_message.is_empty());

        // The New entry was not selected.
        let skipped = store.get_entry(crate::domain::EntryId(2)).unwrap().unwrap();
        assert_eq!(skipped.status, EntryStatus::New);
    }

    #[tokio::test]
    async fn no_selected_statuses_is_a_recorded_noop() {
        let mut store = seeded_store(1, 1);
        let provider = ScriptedProvider::new(25, Vec::new());

        let options = SyncOptions {
            run_new: false,
            run_errors: false,
            origin: OriginKind::MajorCity,
        };
        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&options, as_of())
            .await
            .unwrap();

        // Reconciliation still ran; no API traffic.
        assert_eq!(report.num_added, 1);
        assert_eq!(report.num_updated, 0);
        assert!(provider.calls().is_empty());
        assert!(
            report
                .trace
                .contains(&"No entry statuses selected; nothing to update.".to_string())
        );
        let entry = store.get_entry(crate::domain::EntryId(1)).unwrap().unwrap();
        assert_eq!(entry.status, EntryStatus::New);
    }

    #[tokio::test]
    async fn trailhead_origin_batches_per_trailhead() {
        let mut store = seeded_store(2, 1);
        let provider = ScriptedProvider::new(
            25,
            vec![
                ok_payload(vec![ok_element(1000.0, 60.0)]),
                ok_payload(vec![ok_element(2000.0, 120.0)]),
            ],
        );

        let options = SyncOptions {
            origin: OriginKind::Trailhead,
            ..SyncOptions::default()
        };
        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&options, as_of())
            .await
            .unwrap();

        assert_eq!(report.num_updated, 2);
        // One call per trailhead, origin is the trailhead's coordinate.
        assert_eq!(
            provider.calls(),
            vec![("46,-121.5".to_string(), 1), ("47,-121.5".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn zero_batch_limit_is_rejected() {
        let mut store = seeded_store(1, 1);
        let provider = ScriptedProvider::new(0, Vec::new());

        let result = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await;

        assert!(matches!(result, Err(SyncError::InvalidBatchLimit(_))));
    }

    #[tokio::test]
    async fn trace_reads_like_an_operator_log() {
        let mut store = seeded_store(1, 1);
        let provider = ScriptedProvider::new(25, vec![ok_payload(vec![ok_element(1000.0, 60.0)])]);

        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        assert!(report.trace.contains(&"Added City 1 - Trailhead 1".to_string()));
        assert!(report.trace.contains(&"Records to update for City 1: 1".to_string()));
        assert!(
            report
                .trace
                .contains(&"New Item ----- City 1 : Trailhead 1".to_string())
        );
        assert!(report.trace.contains(&"VALID -- City 1 : Trailhead 1".to_string()));
        assert!(report.trace.contains(&"Number updated: 1".to_string()));
    }

    #[tokio::test]
    async fn cities_without_pending_entries_are_noted_not_called() {
        let mut store = seeded_store(1, 2);
        ensure_entries_exist(&mut store).unwrap();
        store
            .update_entry(
                crate::domain::EntryId(2),
                &EntryUpdate::success(1.0, 1.0, as_of()),
            )
            .unwrap();

        let provider = ScriptedProvider::new(25, vec![ok_payload(vec![ok_element(1.0, 1.0)])]);

        let report = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        assert_eq!(provider.calls().len(), 1);
        assert!(
            report
                .trace
                .contains(&"No records to update for City 2".to_string())
        );
    }

    #[tokio::test]
    async fn invalidated_entries_are_picked_up_by_the_next_run() {
        let mut store = seeded_store(1, 1);
        let provider = ScriptedProvider::new(
            25,
            vec![
                ok_payload(vec![ok_element(1000.0, 60.0)]),
                ok_payload(vec![ok_element(5000.0, 300.0)]),
            ],
        );

        let mut engine = SyncEngine::new(&mut store, &provider);
        engine
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();

        // Coordinates changed: invalidate and re-sync.
        let reset = engine.invalidate(TrailheadId(1)).unwrap();
        assert_eq!(reset, 1);

        let report = engine
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await
            .unwrap();
        assert_eq!(report.num_updated, 1);

        let entry = store.get_entry(crate::domain::EntryId(1)).unwrap().unwrap();
        assert_eq!(entry.status, EntryStatus::Ok);
        assert_eq!(entry.drive_distance, Some(5000.0));
        assert_eq!(entry.drive_time, Some(300.0));
    }

    #[tokio::test]
    async fn missing_destination_reference_is_a_store_error() {
        // An entry pointing at a trailhead the store no longer returns.
        let mut store = seeded_store(1, 1);
        store.insert_entry(TrailheadId(42), CityId(1)).unwrap();
        let provider = ScriptedProvider::new(25, Vec::new());

        let result = SyncEngine::new(&mut store, &provider)
            .synchronize_as_of(&SyncOptions::default(), as_of())
            .await;

        assert!(matches!(
            result,
            Err(SyncError::Store(StoreError::MissingReference { .. }))
        ));
    }
}
