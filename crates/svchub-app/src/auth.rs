//! Login, account creation and profile updates.

use std::sync::Arc;

use tokio::sync::watch;

use svchub_core::models::{CreateAccountRequest, Envelope, LoginRequest, User};
use svchub_core::prelude::*;
use svchub_core::Error;

use crate::gateway::Gateway;
use crate::session::{ExpiryPolicy, SessionStore};
use crate::state::StateCell;

const BAD_CREDENTIALS: &str = "Invalid email or password.";
const LOGIN_FAILED_FALLBACK: &str = "Unable to log in.";
const SIGNUP_FAILED_FALLBACK: &str = "Unable to create the account.";
const UPDATE_FAILED_FALLBACK: &str = "Unable to update the profile.";

#[derive(Debug, Clone, Default)]
pub struct AuthSnapshot {
    pub is_loading: bool,
    pub error: Option<String>,
    /// Confirmation text from the last successful operation.
    pub notice: Option<String>,
}

pub struct AuthOrchestrator<G> {
    inner: Arc<AuthInner<G>>,
}

impl<G> Clone for AuthOrchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AuthInner<G> {
    gateway: G,
    store: SessionStore,
    policy: ExpiryPolicy,
    state: StateCell<AuthSnapshot>,
}

impl<G: Gateway + Send + Sync + 'static> AuthOrchestrator<G> {
    pub fn new(gateway: G, store: SessionStore, policy: ExpiryPolicy) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                gateway,
                store,
                policy,
                state: StateCell::new(AuthSnapshot::default()),
            }),
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }

    /// Exchange credentials for a token and user, persisting both on
    /// success. Returns true when the login succeeded.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.begin();
        let request = LoginRequest {
            email_address: email.trim().to_string(),
            password: password.to_string(),
        };

        match self.inner.gateway.login(&request).await {
            Ok(envelope) if envelope.did_succeed() && envelope.user.is_some() => {
                self.inner.store.absorb(&envelope);
                self.inner.store.set_user(envelope.user);
                self.inner.policy.acknowledge();
                self.finish(None);
                true
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(LOGIN_FAILED_FALLBACK)
                    .to_string();
                self.finish(Some(message));
                false
            }
            Err(Error::Unauthorized) => {
                self.finish(Some(BAD_CREDENTIALS.to_string()));
                false
            }
            Err(err) => {
                warn!("login failed: {err}");
                self.finish(Some(err.to_string()));
                false
            }
        }
    }

    /// Register a new account. The backend mails a verification link; no
    /// session is created here.
    pub async fn create_account(&self, request: &CreateAccountRequest) -> bool {
        self.begin();
        match self.inner.gateway.create_account(request).await {
            Ok(envelope) if envelope.did_succeed() => {
                let notice = envelope
                    .description()
                    .unwrap_or("Account created. Check your email to verify it.")
                    .to_string();
                self.inner.state.update(move |s| {
                    s.is_loading = false;
                    s.notice = Some(notice);
                });
                true
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(SIGNUP_FAILED_FALLBACK)
                    .to_string();
                self.finish(Some(message));
                false
            }
            Err(err) => {
                warn!("account creation failed: {err}");
                self.finish(Some(err.to_string()));
                false
            }
        }
    }

    /// Save profile edits, absorbing the refreshed user and token.
    pub async fn update_profile(&self, user: &User) -> bool {
        self.begin();
        let token = self.inner.store.token();
        let outcome = self.inner.gateway.update_user(token.as_deref(), user).await;
        if let Ok(envelope) = &outcome {
            self.inner.store.absorb(envelope);
        }
        if let Some(message) = self.inner.policy.intercept(&outcome) {
            self.finish(Some(message));
            return false;
        }

        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                if envelope.user.is_some() {
                    self.inner.store.set_user(envelope.user);
                } else {
                    self.inner.store.set_user(Some(user.clone()));
                }
                self.finish(None);
                true
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(UPDATE_FAILED_FALLBACK)
                    .to_string();
                self.finish(Some(message));
                false
            }
            Err(err) => {
                warn!("profile update failed: {err}");
                self.finish(Some(err.to_string()));
                false
            }
        }
    }

    /// Drop the session without a backend round trip.
    pub fn logout(&self) {
        self.inner.store.clear();
        self.inner.state.set(AuthSnapshot::default());
    }

    fn begin(&self) {
        self.inner.state.update(|s| {
            s.is_loading = true;
            s.error = None;
            s.notice = None;
        });
    }

    fn finish(&self, error: Option<String>) {
        self.inner.state.update(move |s| {
            s.is_loading = false;
            s.error = error;
        });
    }
}
