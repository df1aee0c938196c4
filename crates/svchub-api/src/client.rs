//! Stateless HTTP client for the backend API
//!
//! Every call attaches a bearer token when one is supplied, sends the
//! request, and maps the outcome into the core error taxonomy. The client
//! never stores tokens; refreshed tokens ride back inside the typed
//! envelopes for the caller to absorb.

use reqwest::{header::AUTHORIZATION, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use svchub_core::filters::SearchFilters;
use svchub_core::models::{
    BookingListResponse, BookingRequest, BookingResponse, BusinessHoursResponse,
    CatalogListResponse, CompanyDetailResponse, CompanyListResponse, ContributionStatsResponse,
    CreateAccountRequest, LoginRequest, PlaceResponse, ServiceAreasResponse, StatusResponse, User,
    UserResponse,
};
use svchub_core::prelude::*;
use url::Url;

use crate::requests::CompanySearchRequest;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "SVCHUB_API_URL";

const DEFAULT_BASE_URL: &str = "https://api.labourlink.local:8081/api";

const DEFAULT_PAGE: i64 = 0;
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Stateless gateway to the backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build a client from `SVCHUB_API_URL`, falling back to the compiled
    /// default when the variable is absent or unparseable.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .and_then(|raw| Url::parse(&raw).ok())
            .unwrap_or_else(|| {
                Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
            });
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────
    // Search / browse
    // ─────────────────────────────────────────────────────────

    pub async fn search_companies(
        &self,
        token: Option<&str>,
        filters: &SearchFilters,
    ) -> Result<CompanyListResponse> {
        let body = CompanySearchRequest::new(filters, DEFAULT_PAGE, DEFAULT_PAGE_SIZE);
        debug!(
            search = %filters.search_text,
            radius_m = filters.radius_meters,
            "searching companies"
        );
        let request = self
            .http
            .post(self.endpoint("companies/getAllCompanies"))
            .json(&body);
        self.execute(request, token).await
    }

    pub async fn find_places(&self, token: Option<&str>, query: &str) -> Result<PlaceResponse> {
        let request = self
            .http
            .get(self.endpoint("location/findLocation"))
            .query(&[("searchString", query)]);
        self.execute(request, token).await
    }

    pub async fn fetch_catalogs(
        &self,
        token: Option<&str>,
        search: &str,
    ) -> Result<CatalogListResponse> {
        let request = self
            .http
            .get(self.endpoint("catalog/getAllCatalogs"))
            .query(&[("searchString", search)]);
        self.execute(request, token).await
    }

    // ─────────────────────────────────────────────────────────
    // Company detail fan-out
    // ─────────────────────────────────────────────────────────

    pub async fn company_detail(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<CompanyDetailResponse> {
        let request = self
            .http
            .get(self.endpoint(&format!("companies/{company_uuid}")));
        self.execute(request, token).await
    }

    pub async fn business_hours(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<BusinessHoursResponse> {
        let request = self
            .http
            .get(self.endpoint(&format!("businessHours/{company_uuid}")));
        self.execute(request, token).await
    }

    pub async fn service_areas(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<ServiceAreasResponse> {
        let request = self
            .http
            .get(self.endpoint(&format!("area/findAllCompanyAreas/{company_uuid}")));
        self.execute(request, token).await
    }

    // ─────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────

    pub async fn login(&self, request: &LoginRequest) -> Result<UserResponse> {
        let builder = self.http.post(self.endpoint("users/login")).json(request);
        self.execute(builder, None).await
    }

    pub async fn create_account(&self, request: &CreateAccountRequest) -> Result<StatusResponse> {
        let builder = self
            .http
            .post(self.endpoint("users/createAccount"))
            .json(request);
        self.execute(builder, None).await
    }

    pub async fn update_user(&self, token: Option<&str>, user: &User) -> Result<UserResponse> {
        let builder = self.http.put(self.endpoint("users/updateUser")).json(user);
        self.execute(builder, token).await
    }

    // ─────────────────────────────────────────────────────────
    // Bookings
    // ─────────────────────────────────────────────────────────

    /// Create (null uuid) or update (present uuid) a booking.
    pub async fn save_booking(
        &self,
        token: Option<&str>,
        request: &BookingRequest,
    ) -> Result<BookingResponse> {
        let builder = self
            .http
            .post(self.endpoint("bookings/saveBooking"))
            .json(request);
        self.execute(builder, token).await
    }

    pub async fn user_company_bookings(
        &self,
        token: Option<&str>,
        user_uuid: &str,
        company_uuid: &str,
    ) -> Result<BookingListResponse> {
        let request = self
            .http
            .get(self.endpoint("bookings/findUserCompanyBookings"))
            .query(&[("userUuid", user_uuid), ("companyUuid", company_uuid)]);
        self.execute(request, token).await
    }

    pub async fn user_bookings(
        &self,
        token: Option<&str>,
        user_uuid: &str,
        month: u32,
        year: i32,
    ) -> Result<BookingListResponse> {
        let request = self
            .http
            .get(self.endpoint("bookings/findUserBookings"))
            .query(&[
                ("userUuid", user_uuid.to_string()),
                ("month", month.to_string()),
                ("year", year.to_string()),
            ]);
        self.execute(request, token).await
    }

    pub async fn delete_booking(
        &self,
        token: Option<&str>,
        booking_uuid: &str,
    ) -> Result<BookingResponse> {
        let request = self
            .http
            .delete(self.endpoint(&format!("bookings/{booking_uuid}")));
        self.execute(request, token).await
    }

    // ─────────────────────────────────────────────────────────
    // Profile
    // ─────────────────────────────────────────────────────────

    pub async fn contribution_stats(
        &self,
        token: Option<&str>,
        user_uuid: &str,
    ) -> Result<ContributionStatsResponse> {
        let request = self
            .http
            .get(self.endpoint(&format!("contributions/stats/{user_uuid}")));
        self.execute(request, token).await
    }

    // ─────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T> {
        let builder = match bearer_header(token) {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(format!("request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("server rejected authorization");
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "server returned error status");
            return Err(Error::transport(format!(
                "server returned status {}",
                status.as_u16()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::transport(format!("malformed response body: {e}")))
    }
}

/// `Bearer <token>` when a non-empty token is supplied; absent/blank tokens
/// send no Authorization header at all.
fn bearer_header(token: Option<&str>) -> Option<String> {
    let token = token?.trim();
    if token.is_empty() {
        None
    } else {
        Some(format!("Bearer {token}"))
    }
}
