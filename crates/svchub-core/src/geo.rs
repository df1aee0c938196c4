//! Coordinate and map-region math

use serde::{Deserialize, Serialize};

/// Rough kilometers per degree of latitude/longitude.
pub const KILOMETERS_PER_DEGREE: f64 = 111.0;

/// Search radius bounds, in kilometers.
pub const MIN_RADIUS_KM: f64 = 5.0;
pub const MAX_RADIUS_KM: f64 = 100.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Straight-line delta in degrees between two coordinates.
    pub fn delta(&self, other: Coordinate) -> f64 {
        (self.latitude - other.latitude).hypot(self.longitude - other.longitude)
    }
}

/// A rendered map viewport: a center plus an angular span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: Coordinate,
    pub span_latitude: f64,
    pub span_longitude: f64,
}

impl MapRegion {
    pub fn new(center: Coordinate, span_latitude: f64, span_longitude: f64) -> Self {
        Self {
            center,
            span_latitude,
            span_longitude,
        }
    }

    /// New region centered elsewhere, keeping the current span.
    pub fn recentered(&self, center: Coordinate) -> Self {
        Self { center, ..*self }
    }

    pub fn center_delta(&self, other: &MapRegion) -> f64 {
        self.center.delta(other.center)
    }

    pub fn span_delta(&self, other: &MapRegion) -> f64 {
        (self.span_latitude - other.span_latitude)
            .hypot(self.span_longitude - other.span_longitude)
    }

    /// Search radius implied by the visible span: half the larger span
    /// component converted to kilometers, clamped to [5, 100] and rounded to
    /// the nearest multiple of 5.
    pub fn radius_kilometers(&self) -> f64 {
        let span_km = self.span_latitude.max(self.span_longitude) * KILOMETERS_PER_DEGREE;
        snap_radius_kilometers(span_km / 2.0)
    }
}

/// Clamp a kilometer radius to [5, 100] and round to the nearest multiple
/// of 5, the only radius steps the backend is exercised with.
pub fn snap_radius_kilometers(kilometers: f64) -> f64 {
    let radius = kilometers.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM);
    (radius / 5.0).round() * 5.0
}

/// Convert a UI kilometer value to the radius sent to the backend.
/// Values below one kilometer never collapse to a zero-meter radius.
pub fn radius_meters(kilometers: f64) -> i64 {
    (kilometers.max(1.0) * 1_000.0).round() as i64
}
