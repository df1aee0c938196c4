//! Search filter state sent with every company search

use crate::geo::{radius_meters, Coordinate};

/// Default search center (Cape Town) used before any location is chosen.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: -33.9249,
    longitude: 18.4241,
};

/// Default search radius shown in the UI, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 25.0;

/// Filter values for a company search. Never persisted; mutated by every
/// search-triggering interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub search_text: String,
    pub center: Coordinate,
    pub radius_meters: i64,
    /// Minimum average rating, 0-5; 0 disables the filter server-side.
    pub minimum_rating: i32,
    pub catalog_items: Vec<String>,
}

impl SearchFilters {
    pub fn new(center: Coordinate) -> Self {
        Self {
            search_text: String::new(),
            center,
            radius_meters: radius_meters(DEFAULT_RADIUS_KM),
            minimum_rating: 0,
            catalog_items: Vec::new(),
        }
    }

    pub fn update_center(&mut self, center: Coordinate) {
        self.center = center;
    }

    pub fn set_radius_kilometers(&mut self, kilometers: f64) {
        self.radius_meters = radius_meters(kilometers);
    }
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}
