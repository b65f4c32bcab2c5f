//! Unit conversions for drive data display.
//!
//! The distance API reports meters and seconds; views show miles and
//! hours/minutes.

/// Meters per statute mile, as used for all distance display.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Convert minutes to seconds.
pub fn min_to_sec(minutes: f64) -> f64 {
    minutes * 60.0
}

/// Convert meters to miles.
pub fn m_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Convert miles to meters.
pub fn miles_to_m(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

/// Split a duration in seconds into whole hours and leftover whole
/// minutes, both rounded down.
pub fn sec_to_hour_min(seconds: f64) -> (u64, u64) {
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds - hours * 3600.0) / 60.0).floor();
    (hours as u64, minutes as u64)
}
