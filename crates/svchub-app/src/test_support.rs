//! Scripted gateway fake and fixtures for orchestrator tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::sync::Notify;

use svchub_core::models::{
    BookingListResponse, BookingRequest, BookingResponse, BusinessHoursResponse,
    CatalogListResponse, CompanyDetailResponse, CompanyListResponse, ContributionStatsResponse,
    CreateAccountRequest, LoginRequest, PlaceResponse, ServiceAreasResponse, StatusResponse, User,
    UserResponse,
};
use svchub_core::{Error, Result, SearchFilters};

use crate::gateway::Gateway;
use crate::session::SessionStore;

/// A queue of scripted outcomes for one gateway method. Each entry may carry
/// a gate the call blocks on, which lets tests hold a response in flight
/// while another request overtakes it.
pub struct Scripted<T> {
    queue: Mutex<VecDeque<Entry<T>>>,
    calls: AtomicUsize,
}

struct Entry<T> {
    gate: Option<Arc<Notify>>,
    outcome: Result<T>,
}

impl<T> Default for Scripted<T> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T> Scripted<T> {
    pub fn push(&self, outcome: Result<T>) {
        self.queue.lock().unwrap().push_back(Entry {
            gate: None,
            outcome,
        });
    }

    pub fn push_gated(&self, gate: Arc<Notify>, outcome: Result<T>) {
        self.queue.lock().unwrap().push_back(Entry {
            gate: Some(gate),
            outcome,
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.queue.lock().unwrap().pop_front();
        let Some(entry) = entry else {
            return Err(Error::transport("unscripted gateway call"));
        };
        if let Some(gate) = entry.gate {
            gate.notified().await;
        }
        entry.outcome
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub search: Scripted<CompanyListResponse>,
    pub places: Scripted<PlaceResponse>,
    pub catalogs: Scripted<CatalogListResponse>,
    pub detail: Scripted<CompanyDetailResponse>,
    pub hours: Scripted<BusinessHoursResponse>,
    pub areas: Scripted<ServiceAreasResponse>,
    pub login: Scripted<UserResponse>,
    pub create_account: Scripted<StatusResponse>,
    pub update_user: Scripted<UserResponse>,
    pub save_booking: Scripted<BookingResponse>,
    pub company_bookings: Scripted<BookingListResponse>,
    pub month_bookings: Scripted<BookingListResponse>,
    pub delete_booking: Scripted<BookingResponse>,
    pub stats: Scripted<ContributionStatsResponse>,
    /// Filter snapshots seen by `search_companies`, in call order.
    pub seen_filters: Mutex<Vec<SearchFilters>>,
}

impl FakeGateway {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_filters(&self) -> Option<SearchFilters> {
        self.seen_filters.lock().unwrap().last().cloned()
    }
}

impl Gateway for Arc<FakeGateway> {
    async fn search_companies(
        &self,
        _token: Option<&str>,
        filters: &SearchFilters,
    ) -> Result<CompanyListResponse> {
        self.seen_filters.lock().unwrap().push(filters.clone());
        self.search.next().await
    }

    async fn find_places(&self, _token: Option<&str>, _query: &str) -> Result<PlaceResponse> {
        self.places.next().await
    }

    async fn fetch_catalogs(
        &self,
        _token: Option<&str>,
        _search: &str,
    ) -> Result<CatalogListResponse> {
        self.catalogs.next().await
    }

    async fn company_detail(
        &self,
        _token: Option<&str>,
        _company_uuid: &str,
    ) -> Result<CompanyDetailResponse> {
        self.detail.next().await
    }

    async fn business_hours(
        &self,
        _token: Option<&str>,
        _company_uuid: &str,
    ) -> Result<BusinessHoursResponse> {
        self.hours.next().await
    }

    async fn service_areas(
        &self,
        _token: Option<&str>,
        _company_uuid: &str,
    ) -> Result<ServiceAreasResponse> {
        self.areas.next().await
    }

    async fn login(&self, _request: &LoginRequest) -> Result<UserResponse> {
        self.login.next().await
    }

    async fn create_account(&self, _request: &CreateAccountRequest) -> Result<StatusResponse> {
        self.create_account.next().await
    }

    async fn update_user(&self, _token: Option<&str>, _user: &User) -> Result<UserResponse> {
        self.update_user.next().await
    }

    async fn save_booking(
        &self,
        _token: Option<&str>,
        _request: &BookingRequest,
    ) -> Result<BookingResponse> {
        self.save_booking.next().await
    }

    async fn user_company_bookings(
        &self,
        _token: Option<&str>,
        _user_uuid: &str,
        _company_uuid: &str,
    ) -> Result<BookingListResponse> {
        self.company_bookings.next().await
    }

    async fn user_bookings(
        &self,
        _token: Option<&str>,
        _user_uuid: &str,
        _month: u32,
        _year: i32,
    ) -> Result<BookingListResponse> {
        self.month_bookings.next().await
    }

    async fn delete_booking(
        &self,
        _token: Option<&str>,
        _booking_uuid: &str,
    ) -> Result<BookingResponse> {
        self.delete_booking.next().await
    }

    async fn contribution_stats(
        &self,
        _token: Option<&str>,
        _user_uuid: &str,
    ) -> Result<ContributionStatsResponse> {
        self.stats.next().await
    }
}

/// Poll until `check` passes, failing the test after two seconds.
pub async fn wait_until(what: &str, check: impl Fn() -> bool) {
    for _ in 0..2_000 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("timed out waiting for {what}");
}

pub fn session_in_tempdir() -> (tempfile::TempDir, SessionStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::load_from(dir.path().to_path_buf());
    (dir, store)
}

pub fn sample_user() -> User {
    serde_json::from_value(json!({
        "uuid": "user-1",
        "name": "Sipho",
        "surname": "Dlamini",
        "cellPhone": "0825551234",
        "email": "sipho@example.com"
    }))
    .unwrap()
}

pub fn company_list(companies: &[(&str, &str)]) -> CompanyListResponse {
    let content: Vec<_> = companies
        .iter()
        .map(|(uuid, name)| json!({"uuid": uuid, "name": name}))
        .collect();
    serde_json::from_value(json!({
        "responseCode": "SUCCESSFUL",
        "companyList": {
            "content": content,
            "totalElements": content.len(),
            "totalPages": 1,
            "size": 20,
            "number": 0
        }
    }))
    .unwrap()
}

pub fn company_list_with_token(token: &str) -> CompanyListResponse {
    let mut response = company_list(&[("c1", "Spark Electrical")]);
    response.token = Some(token.to_string());
    response
}

pub fn token_expired<T: serde::de::DeserializeOwned>() -> T {
    serde_json::from_value(json!({
        "responseCode": "TOKEN_EXPIRED",
        "description": "Session expired. Please log in again."
    }))
    .unwrap()
}

pub fn place_response(count: usize) -> PlaceResponse {
    let places: Vec<_> = (0..count)
        .map(|i| json!({"display_name": format!("Place {i}"), "lat": -33.9, "lon": 18.4}))
        .collect();
    serde_json::from_value(json!({"responseCode": "SUCCESSFUL", "places": places})).unwrap()
}

pub fn place(display_name: &str, lat: f64, lon: f64) -> svchub_core::models::Place {
    serde_json::from_value(json!({"display_name": display_name, "lat": lat, "lon": lon})).unwrap()
}

pub fn catalog_response() -> CatalogListResponse {
    serde_json::from_value(json!({
        "responseCode": "SUCCESSFUL",
        "catalogList": [
            {"uuid": "s1", "name": "Wiring", "parentName": "Electrical"},
            {"uuid": "s2", "name": "Solar", "parentName": "Electrical"},
            {"uuid": "s3", "name": "Geysers", "parentName": "Plumbing"}
        ]
    }))
    .unwrap()
}

pub fn detail_response(uuid: &str, name: &str) -> CompanyDetailResponse {
    serde_json::from_value(json!({
        "responseCode": "SUCCESSFUL",
        "company": {"uuid": uuid, "name": name}
    }))
    .unwrap()
}

pub fn hours_response(days: &[&str]) -> BusinessHoursResponse {
    let hours: Vec<_> = days
        .iter()
        .map(|day| {
            json!({
                "dayOfWeek": day,
                "available": true,
                "startTime": "08:00:00",
                "endTime": "17:00:00"
            })
        })
        .collect();
    serde_json::from_value(json!({"responseCode": "SUCCESSFUL", "businessHours": hours})).unwrap()
}

pub fn areas_response(names: &[&str]) -> ServiceAreasResponse {
    let areas: Vec<_> = names
        .iter()
        .map(|name| json!({"name": name, "latitude": -33.9, "longitude": 18.4, "radius": 2000.0}))
        .collect();
    serde_json::from_value(json!({"responseCode": "SUCCESSFUL", "companyAreaList": areas}))
        .unwrap()
}

pub fn user_response(token: &str) -> UserResponse {
    serde_json::from_value(json!({
        "responseCode": "SUCCESSFUL",
        "token": token,
        "user": {
            "uuid": "user-1",
            "name": "Sipho",
            "surname": "Dlamini",
            "cellPhone": "0825551234",
            "email": "sipho@example.com"
        }
    }))
    .unwrap()
}

pub fn status_response(description: &str) -> StatusResponse {
    serde_json::from_value(json!({
        "responseCode": "SUCCESSFUL",
        "description": description
    }))
    .unwrap()
}

pub fn booking_list(uuids: &[&str]) -> BookingListResponse {
    let bookings: Vec<_> = uuids
        .iter()
        .map(|uuid| {
            json!({
                "uuid": uuid,
                "user": {"uuid": "user-1", "email": "sipho@example.com"},
                "company": {"uuid": "c1", "name": "Spark Electrical"},
                "bookingTime": "2026-09-01T09:00:00",
                "status": "UNCONFIRMED"
            })
        })
        .collect();
    serde_json::from_value(json!({"responseCode": "SUCCESSFUL", "bookingList": bookings}))
        .unwrap()
}

pub fn booking_response() -> BookingResponse {
    serde_json::from_value(json!({"responseCode": "SUCCESSFUL"})).unwrap()
}

pub fn stats_response(total: i64) -> ContributionStatsResponse {
    serde_json::from_value(json!({
        "responseCode": "SUCCESSFUL",
        "stats": {
            "creatorCount": 2,
            "reviewerCount": 1,
            "totalContributions": total,
            "placements": [],
            "badges": [],
            "awards": []
        }
    }))
    .unwrap()
}
