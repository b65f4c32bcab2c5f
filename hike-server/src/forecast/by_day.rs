//! Grouping forecast periods into calendar days.

use chrono::{DateTime, Datelike};

use super::error::ForecastError;
use super::types::ForecastPeriod;

/// One calendar day of forecast periods.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    /// Display label: `"Today"`, `"Tomorrow"`, then weekday names.
    pub label: String,
    /// Month number of the day (1-12).
    pub month: u32,
    /// Day of the month (1-31).
    pub day: u32,
    /// The periods that start on this day, in forecast order.
    pub periods: Vec<ForecastPeriod>,
}

/// Group forecast periods by the calendar day they start on.
///
/// Periods arrive in chronological order; a new day begins whenever the
/// day-of-month of a period's start differs from the previous one's.
/// The first day is labeled `"Today"` and the second `"Tomorrow"`,
/// matching what a forecast fetched now actually covers; later days use
/// their weekday names.
pub fn group_by_day(periods: &[ForecastPeriod]) -> Result<Vec<ForecastDay>, ForecastError> {
    let mut days: Vec<ForecastDay> = Vec::new();

    for period in periods {
        let start = DateTime::parse_from_rfc3339(&period.start_time).map_err(|e| {
            ForecastError::BadTimestamp {
                value: period.start_time.clone(),
                message: e.to_string(),
            }
        })?;

        match days.last_mut() {
            Some(current) if current.day == start.day() => {
                current.periods.push(period.clone());
            }
            _ => {
                let label = match days.len() {
                    0 => "Today".to_string(),
                    1 => "Tomorrow".to_string(),
                    _ => start.format("%A").to_string(),
                };
                days.push(ForecastDay {
                    label,
                    month: start.month(),
                    day: start.day(),
                    periods: vec![period.clone()],
                });
            }
        }
    }

    Ok(days)
}
