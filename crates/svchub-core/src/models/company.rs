//! Company search results, detail, business hours and service areas

use serde::Deserialize;

use super::envelope::{impl_envelope, ResponseCode};
use crate::geo::Coordinate;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    /// Absent on failure envelopes such as `TOKEN_EXPIRED`.
    #[serde(default)]
    pub company_list: Option<CompanyPage>,
}

impl CompanyListResponse {
    pub fn companies(&self) -> &[CompanySummary] {
        self.company_list
            .as_ref()
            .map(|page| page.content.as_slice())
            .unwrap_or_default()
    }
}

/// One page of search results. Pages are never merged client-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPage {
    pub content: Vec<CompanySummary>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub size: i64,
    pub number: i64,
}

/// Immutable snapshot of one company in a search result page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub uuid: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub website_url: Option<String>,
    pub status_type: Option<String>,
    pub catalog_items: Option<Vec<String>>,
    pub average_rating: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Distance from the search center, in meters.
    pub distance: Option<f64>,
}

impl CompanySummary {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    pub fn formatted_distance(&self) -> Option<String> {
        self.distance.map(format_distance)
    }

    pub fn formatted_rating(&self) -> String {
        match self.average_rating {
            Some(rating) if rating > 0.0 => format!("{rating:.1} ★"),
            _ => "Unrated".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    /// Absent on failure envelopes such as `TOKEN_EXPIRED`.
    #[serde(default)]
    pub company: Option<CompanyDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    pub uuid: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub website_url: Option<String>,
    pub status_type: Option<String>,
    #[serde(default)]
    pub catalog_items: Option<Vec<CatalogItemValue>>,
    pub description: Option<String>,
    pub average_rating: Option<f64>,
    pub distance: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CompanyDetail {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    /// Offered service names, skipping blank entries.
    pub fn service_names(&self) -> Vec<&str> {
        self.catalog_items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|item| item.name.as_str())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// A catalog item on a company detail: either a bare string or an object
/// with a `name`/`label` field, depending on backend version.
#[derive(Debug, Clone)]
pub struct CatalogItemValue {
    pub name: String,
}

impl<'de> Deserialize<'de> for CatalogItemValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Object {
                name: Option<String>,
                label: Option<String>,
            },
        }

        let name = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            Raw::Object { name, label } => name.or(label).unwrap_or_default(),
        };
        Ok(CatalogItemValue { name })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHoursResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub business_hours: Vec<BusinessHour>,
}

/// Canonical weekday ordering used for display and sorting.
const WEEKDAY_ORDER: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// One weekday's opening hours.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHour {
    pub uuid: Option<String>,
    pub day_of_week: String,
    pub available: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl BusinessHour {
    /// Uppercase day key used for ordering and per-day deduplication.
    pub fn day_key(&self) -> String {
        self.day_of_week.to_uppercase()
    }

    pub fn display_day_name(&self) -> String {
        let lower = self.day_key().to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => lower,
        }
    }

    /// Monday = 0 … Sunday = 6; unrecognized days sort last.
    pub fn sort_order(&self) -> usize {
        let key = self.day_key();
        WEEKDAY_ORDER
            .iter()
            .position(|day| *day == key)
            .unwrap_or(WEEKDAY_ORDER.len())
    }

    pub fn display_range(&self) -> String {
        if !self.available {
            return "Closed".to_string();
        }
        let start = normalize_time(self.start_time.as_deref());
        let end = normalize_time(self.end_time.as_deref());
        format!(
            "{} - {}",
            start.unwrap_or_else(|| "--".to_string()),
            end.unwrap_or_else(|| "--".to_string())
        )
    }
}

/// Truncate backend "HH:MM:SS" strings to "HH:MM" for display.
fn normalize_time(value: Option<&str>) -> Option<String> {
    let value = value?;
    if value.is_empty() {
        return None;
    }
    if value.len() >= 5 {
        Some(value[..5].to_string())
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAreasResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub company_area_list: Vec<ServiceArea>,
}

/// A coverage circle a company serves.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceArea {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
}

impl ServiceArea {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius.unwrap_or(0.0).max(0.0)
    }

    pub fn display_title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Service Area",
        }
    }

    pub fn formatted_radius(&self) -> String {
        format_distance_radius(self.radius_meters())
    }
}

fn format_distance(meters: f64) -> String {
    if meters > 1_000.0 {
        format!("{:.1} km", meters / 1_000.0)
    } else {
        format!("{meters:.0} m")
    }
}

fn format_distance_radius(meters: f64) -> String {
    if meters >= 1_000.0 {
        format!("{:.1} km radius", meters / 1_000.0)
    } else {
        format!("{} m radius", meters as i64)
    }
}

impl_envelope!(
    CompanyListResponse,
    CompanyDetailResponse,
    BusinessHoursResponse,
    ServiceAreasResponse,
);
