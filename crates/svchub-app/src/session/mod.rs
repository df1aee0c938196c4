//! Token and user persistence plus the shared expiry policy.

pub mod expiry;
pub mod store;

pub use expiry::{is_session_expiring, ExpiryPolicy};
pub use store::SessionStore;
