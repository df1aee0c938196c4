//! Request payloads for the company search endpoint

use std::collections::BTreeMap;

use serde::Serialize;
use svchub_core::filters::SearchFilters;

/// Body of `POST companies/getAllCompanies`: a filter map keyed by field
/// name, plus sorting and paging. The server performs the geo-radius
/// filtering; the client only supplies the location filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearchRequest {
    pub filter: BTreeMap<String, FilterValue>,
    pub sort_by: String,
    pub direction: SortDirection,
    pub page: i64,
    pub size: i64,
}

impl CompanySearchRequest {
    pub fn new(filters: &SearchFilters, page: i64, size: i64) -> Self {
        let mut filter = BTreeMap::new();
        filter.insert(
            "search".to_string(),
            FilterValue {
                value: FilterPayload::Text(filters.search_text.clone()),
                match_mode: MatchMode::Contains,
            },
        );
        filter.insert(
            "rating".to_string(),
            FilterValue {
                value: FilterPayload::Integer(filters.minimum_rating as i64),
                match_mode: MatchMode::GreaterThanOrEqualTo,
            },
        );
        filter.insert(
            "location".to_string(),
            FilterValue {
                value: FilterPayload::Location(LocationFilter {
                    latitude: filters.center.latitude,
                    longitude: filters.center.longitude,
                    radius: filters.radius_meters,
                }),
                match_mode: MatchMode::Equals,
            },
        );
        if !filters.catalog_items.is_empty() {
            filter.insert(
                "catalogItems".to_string(),
                FilterValue {
                    value: FilterPayload::TextList(filters.catalog_items.clone()),
                    match_mode: MatchMode::Contains,
                },
            );
        }

        Self {
            filter,
            sort_by: "name".to_string(),
            direction: SortDirection::Ascending,
            page,
            size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterValue {
    pub value: FilterPayload,
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FilterPayload {
    Text(String),
    Integer(i64),
    TextList(Vec<String>),
    Location(LocationFilter),
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum MatchMode {
    #[serde(rename = "CONTAINS")]
    Contains,
    #[serde(rename = "EQUALS")]
    Equals,
    #[serde(rename = "GREATER_THAN_OR_EQUAL_TO")]
    GreaterThanOrEqualTo,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;
    use svchub_core::geo::Coordinate;

    fn filters() -> SearchFilters {
        let mut filters = SearchFilters::new(Coordinate::new(-33.9, 18.4));
        filters.search_text = "plumber".to_string();
        filters.minimum_rating = 3;
        filters
    }

    #[test]
    fn test_body_shape() {
        let request = CompanySearchRequest::new(&filters(), 0, 20);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["sortBy"], "name");
        assert_eq!(json["direction"], "ASC");
        assert_eq!(json["page"], 0);
        assert_eq!(json["size"], 20);

        let filter = &json["filter"];
        assert_eq!(filter["search"]["value"], "plumber");
        assert_eq!(filter["search"]["matchMode"], "CONTAINS");
        assert_eq!(filter["rating"]["value"], 3);
        assert_eq!(filter["rating"]["matchMode"], "GREATER_THAN_OR_EQUAL_TO");
        assert_eq!(filter["location"]["matchMode"], "EQUALS");
        assert_eq!(filter["location"]["value"]["radius"], 25_000);
        assert_eq!(filter["location"]["value"]["latitude"], -33.9);
    }

    #[test]
    fn test_catalog_items_omitted_when_empty() {
        let request = CompanySearchRequest::new(&filters(), 0, 20);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["filter"].get("catalogItems").is_none());
    }

    #[test]
    fn test_catalog_items_sent_when_selected() {
        let mut selected = filters();
        selected.catalog_items = vec!["Wiring".to_string(), "Solar".to_string()];
        let request = CompanySearchRequest::new(&selected, 0, 20);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["filter"]["catalogItems"]["value"],
            serde_json::json!(["Wiring", "Solar"])
        );
        assert_eq!(json["filter"]["catalogItems"]["matchMode"], "CONTAINS");
    }
}
