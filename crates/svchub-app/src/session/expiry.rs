//! Session-expiry detection and the single place it is acted on.
//!
//! Every orchestrator funnels backend outcomes through [`ExpiryPolicy`]:
//! when the backend reports a dead token, the session is cleared once, a
//! `needs_login` flag is raised for the UI, and the caller gets back the
//! message it should surface.

use std::sync::Arc;

use tokio::sync::watch;

use svchub_core::models::Envelope;
use svchub_core::prelude::*;

use super::store::SessionStore;

const EXPIRED_FALLBACK: &str = "Session expired. Please log in again.";

/// True when an outcome means the current token is no longer usable, either
/// as an HTTP 401 or as an in-envelope `TOKEN_EXPIRED` code.
pub fn is_session_expiring<E: Envelope>(outcome: &Result<E>) -> bool {
    match outcome {
        Ok(envelope) => envelope.token_expired(),
        Err(err) => err.is_unauthorized(),
    }
}

#[derive(Debug, Clone)]
pub struct ExpiryPolicy {
    store: SessionStore,
    needs_login: Arc<watch::Sender<bool>>,
}

impl ExpiryPolicy {
    pub fn new(store: SessionStore) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            store,
            needs_login: Arc::new(tx),
        }
    }

    /// Inspect an outcome. If the session is expiring, clear it, raise the
    /// login flag and return the message to show; otherwise return `None`
    /// and let the caller handle the outcome normally.
    pub fn intercept<E: Envelope>(&self, outcome: &Result<E>) -> Option<String> {
        if !is_session_expiring(outcome) {
            return None;
        }
        let message = match outcome {
            Ok(envelope) => envelope.description().map(str::to_string),
            Err(_) => None,
        }
        .unwrap_or_else(|| EXPIRED_FALLBACK.to_string());
        self.expire();
        Some(message)
    }

    /// Force-expire the session, e.g. on explicit sign-out.
    pub fn expire(&self) {
        info!("session expired, clearing stored credentials");
        self.store.clear();
        self.needs_login.send_replace(true);
    }

    pub fn needs_login(&self) -> bool {
        *self.needs_login.borrow()
    }

    /// Observe login-required transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.needs_login.subscribe()
    }

    /// Acknowledge that the login prompt was handled.
    pub fn acknowledge(&self) {
        self.needs_login.send_replace(false);
    }
}
