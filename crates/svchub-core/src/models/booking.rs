//! Booking records and requests

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::envelope::{impl_envelope, ResponseCode};

/// Wire format for booking timestamps: a timezone-naive local timestamp.
pub mod naive_timestamp {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Create/update payload. A null `bookingUuid` creates, a present one updates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub booking_uuid: Option<String>,
    pub user_uuid: String,
    pub company_uuid: String,
    #[serde(with = "naive_timestamp")]
    pub booking_time: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    pub booking: Option<Booking>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    pub booking_list: Option<Vec<Booking>>,
}

/// The authoritative copy lives on the backend; the client holds a
/// read-through snapshot refreshed after each mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub uuid: String,
    pub user: BookingUserSummary,
    pub company: BookingCompanySummary,
    #[serde(with = "naive_timestamp")]
    pub booking_time: NaiveDateTime,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUserSummary {
    pub uuid: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCompanySummary {
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "UNCONFIRMED")]
    Unconfirmed,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl_envelope!(BookingResponse, BookingListResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_booking_request_serializes_naive_timestamp() {
        let request = BookingRequest {
            booking_uuid: None,
            user_uuid: "u1".to_string(),
            company_uuid: "c1".to_string(),
            booking_time: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(9, 45, 0)
                .unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["bookingTime"], "2026-03-14T09:45:00");
        assert!(json["bookingUuid"].is_null());
    }

    #[test]
    fn test_booking_decodes() {
        let booking: Booking = serde_json::from_str(
            r#"{
                "uuid": "b1",
                "user": {"uuid": "u1", "email": "a@b.c"},
                "company": {"uuid": "c1", "name": "Spark Electrical"},
                "bookingTime": "2026-03-14T09:45:00",
                "status": "UNCONFIRMED"
            }"#,
        )
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Unconfirmed);
        assert_eq!(booking.booking_time.hour(), 9);
        assert_eq!(booking.company.name, "Spark Electrical");
    }

    #[test]
    fn test_list_response_list_may_be_absent() {
        let response: BookingListResponse =
            serde_json::from_str(r#"{"responseCode":"SUCCESSFUL"}"#).unwrap();
        assert!(response.booking_list.is_none());
    }
}
