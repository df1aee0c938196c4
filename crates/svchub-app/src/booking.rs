//! Booking orchestration.
//!
//! The backend owns the booking list; this layer never patches it locally.
//! Every successful create, update or delete is followed by a fresh list
//! fetch so the screen always shows the server's view. Booking times are
//! snapped to quarter hours before they are combined with the chosen date.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tokio::sync::watch;

use svchub_core::models::{Booking, BookingRequest, Envelope};
use svchub_core::prelude::*;

use crate::gateway::Gateway;
use crate::session::{ExpiryPolicy, SessionStore};
use crate::state::StateCell;

const BOOKINGS_FAILED_FALLBACK: &str = "Unable to load bookings.";
const BOOKING_SAVE_FALLBACK: &str = "Unable to save the booking.";
const BOOKING_DELETE_FALLBACK: &str = "Unable to cancel the booking.";

/// Round a time to the nearest quarter hour. Minute 60 carries into the
/// next hour; a carry past midnight wraps within the day, the date part is
/// supplied separately when the booking is built.
pub fn snap_to_quarter_hour(time: NaiveTime) -> NaiveTime {
    let rounded = ((f64::from(time.minute()) / 15.0).round() as u32) * 15;
    if rounded == 60 {
        NaiveTime::from_hms_opt((time.hour() + 1) % 24, 0, 0).unwrap_or(time)
    } else {
        NaiveTime::from_hms_opt(time.hour(), rounded, 0).unwrap_or(time)
    }
}

/// Combine a calendar date with a snapped wall-clock time, discarding any
/// seconds the time carried.
pub fn booking_timestamp(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(snap_to_quarter_hour(time))
}

#[derive(Debug, Clone)]
pub struct BookingSnapshot {
    pub bookings: Vec<Booking>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Booking being edited; `None` while composing a new one.
    pub editing: Option<Booking>,
    pub selected_date: NaiveDate,
    pub selected_time: NaiveTime,
}

pub struct BookingOrchestrator<G> {
    inner: Arc<BookingInner<G>>,
}

impl<G> Clone for BookingOrchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct BookingInner<G> {
    gateway: G,
    store: SessionStore,
    policy: ExpiryPolicy,
    company_uuid: String,
    state: StateCell<BookingSnapshot>,
}

impl<G: Gateway + Send + Sync + 'static> BookingOrchestrator<G> {
    pub fn new(
        gateway: G,
        store: SessionStore,
        policy: ExpiryPolicy,
        company_uuid: impl Into<String>,
    ) -> Self {
        let now = Local::now().naive_local();
        Self {
            inner: Arc::new(BookingInner {
                gateway,
                store,
                policy,
                company_uuid: company_uuid.into(),
                state: StateCell::new(BookingSnapshot {
                    bookings: Vec::new(),
                    is_loading: false,
                    error: None,
                    editing: None,
                    selected_date: now.date(),
                    selected_time: snap_to_quarter_hour(now.time()),
                }),
            }),
        }
    }

    pub fn snapshot(&self) -> BookingSnapshot {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<BookingSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.inner.state.update(|s| s.selected_date = date);
    }

    /// Store a pick from the time control, snapped to the quarter hour.
    pub fn set_time(&self, time: NaiveTime) {
        let snapped = snap_to_quarter_hour(time);
        self.inner.state.update(|s| s.selected_time = snapped);
    }

    /// Load an existing booking into the date/time controls for editing.
    pub fn begin_edit(&self, booking: &Booking) {
        let booking = booking.clone();
        self.inner.state.update(move |s| {
            s.selected_date = booking.booking_time.date();
            s.selected_time = snap_to_quarter_hour(booking.booking_time.time());
            s.editing = Some(booking);
        });
    }

    /// Back out of editing without touching the selected date and time.
    pub fn clear_selection(&self) {
        self.inner.state.update(|s| s.editing = None);
    }

    /// Fetch this user's bookings with the company. Without a signed-in
    /// user the list is empty and no request is made.
    pub async fn load_bookings(&self) {
        let Some(user) = self.inner.store.user() else {
            self.inner.state.update(|s| s.bookings.clear());
            return;
        };
        self.inner.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let token = self.inner.store.token();
        let outcome = self
            .inner
            .gateway
            .user_company_bookings(token.as_deref(), &user.uuid, &self.inner.company_uuid)
            .await;
        if let Ok(envelope) = &outcome {
            self.inner.store.absorb(envelope);
        }
        if let Some(message) = self.inner.policy.intercept(&outcome) {
            self.inner.state.update(move |s| {
                s.is_loading = false;
                s.bookings.clear();
                s.error = Some(message);
            });
            return;
        }

        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                let bookings = envelope.booking_list.unwrap_or_default();
                self.inner.state.update(move |s| {
                    s.is_loading = false;
                    s.bookings = bookings;
                });
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(BOOKINGS_FAILED_FALLBACK)
                    .to_string();
                self.inner.state.update(move |s| {
                    s.is_loading = false;
                    s.bookings.clear();
                    s.error = Some(message);
                });
            }
            Err(err) => {
                warn!("booking list fetch failed: {err}");
                let message = err.to_string();
                self.inner.state.update(move |s| {
                    s.is_loading = false;
                    s.bookings.clear();
                    s.error = Some(message);
                });
            }
        }
    }

    /// Create a booking at the currently selected date and time.
    pub async fn create_booking(&self) {
        self.save(None).await;
    }

    /// Push the edited booking's new date and time to the backend.
    pub async fn update_booking(&self) {
        let editing = self.inner.state.read(|s| s.editing.clone());
        let Some(editing) = editing else {
            return;
        };
        self.save(Some(editing.uuid)).await;
    }

    pub async fn delete_booking(&self, booking: &Booking) {
        let token = self.inner.store.token();
        let outcome = self
            .inner
            .gateway
            .delete_booking(token.as_deref(), &booking.uuid)
            .await;
        if let Ok(envelope) = &outcome {
            self.inner.store.absorb(envelope);
        }
        if let Some(message) = self.inner.policy.intercept(&outcome) {
            self.inner.state.update(move |s| {
                s.bookings.clear();
                s.error = Some(message);
            });
            return;
        }

        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                let deleted = booking.uuid.clone();
                self.inner.state.update(move |s| {
                    if s.editing.as_ref().map(|b| b.uuid.as_str()) == Some(deleted.as_str()) {
                        s.editing = None;
                    }
                    s.error = None;
                });
                self.load_bookings().await;
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(BOOKING_DELETE_FALLBACK)
                    .to_string();
                self.inner.state.update(move |s| s.error = Some(message));
            }
            Err(err) => {
                warn!("booking delete failed: {err}");
                let message = err.to_string();
                self.inner.state.update(move |s| s.error = Some(message));
            }
        }
    }

    async fn save(&self, booking_uuid: Option<String>) {
        let Some(user) = self.inner.store.user() else {
            self.inner.state.update(|s| {
                s.error = Some("Please log in to make a booking.".to_string());
            });
            return;
        };
        let (date, time) = self
            .inner
            .state
            .read(|s| (s.selected_date, s.selected_time));
        let request = BookingRequest {
            booking_uuid,
            user_uuid: user.uuid,
            company_uuid: self.inner.company_uuid.clone(),
            booking_time: booking_timestamp(date, time),
        };

        let token = self.inner.store.token();
        let outcome = self
            .inner
            .gateway
            .save_booking(token.as_deref(), &request)
            .await;
        if let Ok(envelope) = &outcome {
            self.inner.store.absorb(envelope);
        }
        if let Some(message) = self.inner.policy.intercept(&outcome) {
            self.inner.state.update(move |s| {
                s.bookings.clear();
                s.error = Some(message);
            });
            return;
        }

        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                self.inner.state.update(|s| {
                    s.editing = None;
                    s.error = None;
                });
                self.load_bookings().await;
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(BOOKING_SAVE_FALLBACK)
                    .to_string();
                self.inner.state.update(move |s| s.error = Some(message));
            }
            Err(err) => {
                warn!("booking save failed: {err}");
                let message = err.to_string();
                self.inner.state.update(move |s| s.error = Some(message));
            }
        }
    }
}

/// The profile screen's user-wide booking list, scoped to one month.
#[derive(Debug, Clone, Default)]
pub struct MonthBookingsSnapshot {
    pub bookings: Vec<Booking>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct MonthBookings<G> {
    gateway: G,
    store: SessionStore,
    policy: ExpiryPolicy,
    state: StateCell<MonthBookingsSnapshot>,
}

impl<G: Gateway + Send + Sync + 'static> MonthBookings<G> {
    pub fn new(gateway: G, store: SessionStore, policy: ExpiryPolicy) -> Self {
        Self {
            gateway,
            store,
            policy,
            state: StateCell::new(MonthBookingsSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> MonthBookingsSnapshot {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<MonthBookingsSnapshot> {
        self.state.subscribe()
    }

    pub async fn load_current_month(&self) {
        let today = Local::now().date_naive();
        self.load_month(today.month(), today.year()).await;
    }

    pub async fn load_month(&self, month: u32, year: i32) {
        let Some(user) = self.store.user() else {
            self.state.update(|s| s.bookings.clear());
            return;
        };
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let token = self.store.token();
        let outcome = self
            .gateway
            .user_bookings(token.as_deref(), &user.uuid, month, year)
            .await;
        if let Ok(envelope) = &outcome {
            self.store.absorb(envelope);
        }
        if let Some(message) = self.policy.intercept(&outcome) {
            self.state.update(move |s| {
                s.is_loading = false;
                s.bookings.clear();
                s.error = Some(message);
            });
            return;
        }

        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                let bookings = envelope.booking_list.unwrap_or_default();
                self.state.update(move |s| {
                    s.is_loading = false;
                    s.bookings = bookings;
                });
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(BOOKINGS_FAILED_FALLBACK)
                    .to_string();
                self.state.update(move |s| {
                    s.is_loading = false;
                    s.bookings.clear();
                    s.error = Some(message);
                });
            }
            Err(err) => {
                warn!("month booking fetch failed: {err}");
                let message = err.to_string();
                self.state.update(move |s| {
                    s.is_loading = false;
                    s.bookings.clear();
                    s.error = Some(message);
                });
            }
        }
    }
}
