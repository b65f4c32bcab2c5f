//! Geographic coordinate type.

use std::fmt;

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoordinate {
    /// Latitude outside (-90, 90)
    #[error("latitude must be between -90 and 90 degrees, got {0}")]
    Latitude(f64),

    /// Longitude outside (-180, 180)
    #[error("longitude must be between -180 and 180 degrees, got {0}")]
    Longitude(f64),
}

/// A validated latitude/longitude pair.
///
/// Values are strictly inside the (-90, 90) / (-180, 180) open intervals,
/// so any `LatLon` is valid by construction. NaN never passes validation.
///
/// # Examples
///
/// ```
/// use hike_server::domain::LatLon;
///
/// let rainier = LatLon::new(46.8523, -121.7603).unwrap();
/// assert_eq!(rainier.to_string(), "46.8523,-121.7603");
///
/// assert!(LatLon::new(90.0, 0.0).is_err());
/// assert!(LatLon::new(0.0, -180.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    latitude: f64,
    longitude: f64,
}

impl LatLon {
    /// Construct a coordinate, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        // Written so NaN fails the comparison and is rejected.
        if !(latitude > -90.0 && latitude < 90.0) {
            return Err(InvalidCoordinate::Latitude(latitude));
        }
        if !(longitude > -180.0 && longitude < 180.0) {
            return Err(InvalidCoordinate::Longitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees north.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees east.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for LatLon {
    /// Formats as `"lat,lon"`, the shape the distance API takes in its
    /// `origins`/`destinations` query parameters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any coordinate strictly inside the open intervals constructs.
        #[test]
        fn in_range_always_valid(lat in -89.99f64..=89.99, lon in -179.99f64..=179.99) {
            prop_assert!(LatLon::new(lat, lon).is_ok());
        }

        /// Latitudes at or beyond the poles are always rejected.
        #[test]
        fn out_of_range_latitude_rejected(lat in 90.0f64..=1000.0, lon in -179.0f64..=179.0) {
            prop_assert!(LatLon::new(lat, lon).is_err());
            prop_assert!(LatLon::new(-lat, lon).is_err());
        }

        /// Display output parses back to the same pair of values.
        #[test]
        fn display_roundtrip(lat in -89.99f64..=89.99, lon in -179.99f64..=179.99) {
            let coord = LatLon::new(lat, lon).unwrap();
            let text = coord.to_string();
            let (lat_str, lon_str) = text.split_once(',').unwrap();
            prop_assert_eq!(lat_str.parse::<f64>().unwrap(), lat);
            prop_assert_eq!(lon_str.parse::<f64>().unwrap(), lon);
        }
    }
}
