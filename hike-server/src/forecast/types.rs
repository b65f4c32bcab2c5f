//! NOAA forecast API response DTOs.

use serde::Deserialize;

/// One forecast period, usually half a day ("Tonight", "Wednesday").
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    /// 1-based position within the forecast.
    pub number: i32,

    /// Period label, e.g. `"Tonight"` or `"Wednesday Night"`.
    pub name: String,

    /// ISO 8601 start of the period, local time with offset.
    pub start_time: String,

    /// ISO 8601 end of the period.
    pub end_time: String,

    pub is_daytime: bool,

    /// Forecast temperature in `temperature_unit` degrees.
    pub temperature: i32,

    /// Temperature unit, e.g. `"F"`.
    pub temperature_unit: String,

    #[serde(default)]
    pub wind_speed: Option<String>,

    #[serde(default)]
    pub wind_direction: Option<String>,

    /// One-line summary, e.g. `"Mostly Clear"`.
    pub short_forecast: String,

    /// Full sentence forecast.
    #[serde(default)]
    pub detailed_forecast: String,
}

/// The `properties` object of a point forecast.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

/// Top-level point-forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}
