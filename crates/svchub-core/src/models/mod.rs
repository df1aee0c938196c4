//! Wire/data models shared across the gateway and orchestration layers

pub mod booking;
pub mod catalog;
pub mod company;
pub mod contribution;
pub mod envelope;
pub mod location;
pub mod user;

pub use booking::{
    Booking, BookingCompanySummary, BookingListResponse, BookingRequest, BookingResponse,
    BookingStatus, BookingUserSummary,
};
pub use catalog::{
    group_catalog_items, CatalogCategory, CatalogItem, CatalogListResponse, CatalogOption,
};
pub use company::{
    BusinessHour, BusinessHoursResponse, CompanyDetail, CompanyDetailResponse,
    CompanyListResponse, CompanyPage, CompanySummary, ServiceArea, ServiceAreasResponse,
};
pub use contribution::{
    ContributionAward, ContributionBadge, ContributionPlacement, ContributionStats,
    ContributionStatsResponse,
};
pub use envelope::{Envelope, ResponseCode};
pub use location::{Place, PlaceResponse};
pub use user::{
    CreateAccountRequest, LoginRequest, StatusResponse, User, UserResponse, UserStatus, UserType,
};
