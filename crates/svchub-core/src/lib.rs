//! # svchub-core - Core Domain Types
//!
//! Foundation crate for the service-hub client. Provides the wire/data
//! models, the error taxonomy, coordinate/map-region math, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Models (`models`)
//! - Response envelope convention ([`models::Envelope`], [`models::ResponseCode`])
//! - Company search results, detail, business hours, service areas
//! - Bookings with the timezone-naive timestamp wire format
//! - Catalog items and their grouped filter presentation
//! - Place lookups, users, contribution stats
//!
//! ### Error Handling (`error`)
//! - [`error::Error`] - transport / application / unauthorized / cancelled
//! - [`error::Result`] - type alias for `std::result::Result<T, Error>`
//!
//! ### Geo (`geo`)
//! - [`geo::Coordinate`], [`geo::MapRegion`] and the radius-from-zoom math
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use svchub_core::prelude::*;
//! ```

pub mod error;
pub mod filters;
pub mod geo;
pub mod logging;
pub mod models;
pub mod prelude;

pub use error::{Error, Result};
pub use filters::SearchFilters;
pub use geo::{Coordinate, MapRegion};
