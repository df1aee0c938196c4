//! Backend seam for the orchestrators.
//!
//! [`Gateway`] mirrors the handful of backend calls the orchestration layer
//! depends on. Production wires in [`ApiClient`]; tests substitute a
//! scripted fake so debounce and cancellation races can be driven
//! deterministically.

use svchub_api::ApiClient;
use svchub_core::models::{
    BookingListResponse, BookingRequest, BookingResponse, BusinessHoursResponse,
    CatalogListResponse, CompanyDetailResponse, CompanyListResponse, ContributionStatsResponse,
    CreateAccountRequest, LoginRequest, PlaceResponse, ServiceAreasResponse, StatusResponse, User,
    UserResponse,
};
use svchub_core::{Result, SearchFilters};

#[trait_variant::make(Gateway: Send)]
pub trait LocalGateway {
    async fn search_companies(
        &self,
        token: Option<&str>,
        filters: &SearchFilters,
    ) -> Result<CompanyListResponse>;

    async fn find_places(&self, token: Option<&str>, query: &str) -> Result<PlaceResponse>;

    async fn fetch_catalogs(&self, token: Option<&str>, search: &str)
        -> Result<CatalogListResponse>;

    async fn company_detail(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<CompanyDetailResponse>;

    async fn business_hours(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<BusinessHoursResponse>;

    async fn service_areas(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<ServiceAreasResponse>;

    async fn login(&self, request: &LoginRequest) -> Result<UserResponse>;

    async fn create_account(&self, request: &CreateAccountRequest) -> Result<StatusResponse>;

    async fn update_user(&self, token: Option<&str>, user: &User) -> Result<UserResponse>;

    async fn save_booking(
        &self,
        token: Option<&str>,
        request: &BookingRequest,
    ) -> Result<BookingResponse>;

    async fn user_company_bookings(
        &self,
        token: Option<&str>,
        user_uuid: &str,
        company_uuid: &str,
    ) -> Result<BookingListResponse>;

    async fn user_bookings(
        &self,
        token: Option<&str>,
        user_uuid: &str,
        month: u32,
        year: i32,
    ) -> Result<BookingListResponse>;

    async fn delete_booking(
        &self,
        token: Option<&str>,
        booking_uuid: &str,
    ) -> Result<BookingResponse>;

    async fn contribution_stats(
        &self,
        token: Option<&str>,
        user_uuid: &str,
    ) -> Result<ContributionStatsResponse>;
}

impl Gateway for ApiClient {
    async fn search_companies(
        &self,
        token: Option<&str>,
        filters: &SearchFilters,
    ) -> Result<CompanyListResponse> {
        ApiClient::search_companies(self, token, filters).await
    }

    async fn find_places(&self, token: Option<&str>, query: &str) -> Result<PlaceResponse> {
        ApiClient::find_places(self, token, query).await
    }

    async fn fetch_catalogs(
        &self,
        token: Option<&str>,
        search: &str,
    ) -> Result<CatalogListResponse> {
        ApiClient::fetch_catalogs(self, token, search).await
    }

    async fn company_detail(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<CompanyDetailResponse> {
        ApiClient::company_detail(self, token, company_uuid).await
    }

    async fn business_hours(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<BusinessHoursResponse> {
        ApiClient::business_hours(self, token, company_uuid).await
    }

    async fn service_areas(
        &self,
        token: Option<&str>,
        company_uuid: &str,
    ) -> Result<ServiceAreasResponse> {
        ApiClient::service_areas(self, token, company_uuid).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<UserResponse> {
        ApiClient::login(self, request).await
    }

    async fn create_account(&self, request: &CreateAccountRequest) -> Result<StatusResponse> {
        ApiClient::create_account(self, request).await
    }

    async fn update_user(&self, token: Option<&str>, user: &User) -> Result<UserResponse> {
        ApiClient::update_user(self, token, user).await
    }

    async fn save_booking(
        &self,
        token: Option<&str>,
        request: &BookingRequest,
    ) -> Result<BookingResponse> {
        ApiClient::save_booking(self, token, request).await
    }

    async fn user_company_bookings(
        &self,
        token: Option<&str>,
        user_uuid: &str,
        company_uuid: &str,
    ) -> Result<BookingListResponse> {
        ApiClient::user_company_bookings(self, token, user_uuid, company_uuid).await
    }

    async fn user_bookings(
        &self,
        token: Option<&str>,
        user_uuid: &str,
        month: u32,
        year: i32,
    ) -> Result<BookingListResponse> {
        ApiClient::user_bookings(self, token, user_uuid, month, year).await
    }

    async fn delete_booking(
        &self,
        token: Option<&str>,
        booking_uuid: &str,
    ) -> Result<BookingResponse> {
        ApiClient::delete_booking(self, token, booking_uuid).await
    }

    async fn contribution_stats(
        &self,
        token: Option<&str>,
        user_uuid: &str,
    ) -> Result<ContributionStatsResponse> {
        ApiClient::contribution_stats(self, token, user_uuid).await
    }
}
