//! Place lookup results

use serde::{Deserialize, Deserializer};

use super::envelope::{impl_envelope, ResponseCode};
use crate::geo::Coordinate;

/// The place endpoint uses snake_case keys, unlike the rest of the API.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub places: Vec<Place>,
}

/// A candidate place returned for a free-text location query.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub place_id: Option<i64>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub importance: Option<f64>,
    pub bounding_box: Option<Vec<f64>>,
    #[serde(deserialize_with = "flexible_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub lon: f64,
}

impl Place {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// Best available human-readable label for the place.
    pub fn label(&self) -> String {
        if let Some(display_name) = self.display_name.as_deref() {
            if !display_name.is_empty() {
                return display_name.to_string();
            }
        }
        if let Some(name) = self.name.as_deref() {
            if !name.is_empty() {
                return name.to_string();
            }
        }
        if let Some(kind) = self.kind.as_deref() {
            if !kind.is_empty() {
                return capitalize(kind);
            }
        }
        "Unknown place".to_string()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Coordinates arrive either as JSON numbers or as quoted strings.
fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.parse::<f64>().map_err(serde::de::Error::custom),
    }
}

impl_envelope!(PlaceResponse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_decodes_string_coordinates() {
        let place: Place = serde_json::from_str(
            r#"{"place_id": 42, "display_name": "Cape Town", "lat": "-33.9249", "lon": "18.4241"}"#,
        )
        .unwrap();
        assert!((place.coordinate().latitude + 33.9249).abs() < 1e-9);
        assert_eq!(place.label(), "Cape Town");
    }

    #[test]
    fn test_place_decodes_numeric_coordinates() {
        let place: Place =
            serde_json::from_str(r#"{"lat": -33.9, "lon": 18.4, "type": "suburb"}"#).unwrap();
        assert_eq!(place.label(), "Suburb");
    }

    #[test]
    fn test_place_label_fallback() {
        let place: Place = serde_json::from_str(r#"{"lat": 0.0, "lon": 0.0}"#).unwrap();
        assert_eq!(place.label(), "Unknown place");
    }

    #[test]
    fn test_place_rejects_unparseable_coordinate() {
        let result = serde_json::from_str::<Place>(r#"{"lat": "not-a-number", "lon": 1.0}"#);
        assert!(result.is_err());
    }
}
