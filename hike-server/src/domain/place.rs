//! Trailheads and major cities, the two ends of every matrix entry.

use std::fmt;

use super::LatLon;

/// Identifier of a trailhead row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrailheadId(pub i64);

impl fmt::Display for TrailheadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a major-city row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(pub i64);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trailhead: where a hike starts and where you park.
#[derive(Debug, Clone, PartialEq)]
pub struct Trailhead {
    pub id: TrailheadId,
    pub name: String,
    pub coord: LatLon,
}

/// A major city used as a rough driving-time reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct MajorCity {
    pub id: CityId,
    pub name: String,
    pub coord: LatLon,
}
