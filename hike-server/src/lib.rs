//! Hike planner drive-time services.
//!
//! Keeps a (trailhead, major city) drive-time matrix consistent with an
//! external distance-matrix API. Reconciliation creates one matrix entry
//! per pair; the sync engine fills entries in API-limit-sized batch
//! calls, recording successes and failures as entry state for the web
//! views to read. A NOAA forecast client supplies trailhead weather.

pub mod distance;
pub mod domain;
pub mod forecast;
pub mod logging;
pub mod matrix;
