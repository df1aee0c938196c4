//! Orchestration layer for the service-hub client.
//!
//! Sits between the UI and [`svchub_api`]: owns the session (token + user),
//! funnels every backend outcome through one expiry policy, and runs the
//! search, detail, booking, auth and contribution flows as cancellable
//! tasks publishing observable snapshots.

pub mod auth;
pub mod booking;
pub mod config;
pub mod contributions;
pub mod detail;
pub mod gateway;
pub mod search;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::AuthOrchestrator;
pub use booking::{BookingOrchestrator, MonthBookings};
pub use config::Tuning;
pub use contributions::ContributionsOrchestrator;
pub use detail::DetailOrchestrator;
pub use gateway::Gateway;
pub use search::SearchOrchestrator;
pub use session::{ExpiryPolicy, SessionStore};
pub use state::StateCell;
