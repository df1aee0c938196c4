//! # svchub-api - Backend Gateway
//!
//! Stateless HTTP transport for the service-hub client. [`ApiClient`] issues
//! every backend call (search, place lookup, catalogs, company detail
//! fan-out, accounts, bookings, contribution stats) and normalizes transport
//! failures into the core error taxonomy. Token handling is the caller's
//! concern: a token is passed per call and refreshed tokens come back inside
//! the response envelopes.

pub mod client;
pub mod requests;

pub use client::{ApiClient, BASE_URL_ENV};
pub use requests::CompanySearchRequest;
