//! NOAA point-forecast client and by-day grouping.
//!
//! Trailhead detail views show upcoming weather next to the cached
//! drive data. The forecast API returns half-day periods ("Tonight",
//! "Wednesday Night", ...); `group_by_day` folds them into calendar
//! days for display.

mod by_day;
mod client;
mod error;
mod types;

pub use by_day::{ForecastDay, group_by_day};
pub use client::{ForecastClient, ForecastConfig};
pub use error::ForecastError;
pub use types::{ForecastPeriod, ForecastProperties, ForecastResponse};
