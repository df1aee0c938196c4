//! Persistent session state.
//!
//! The token and the signed-in user live in two independent files under the
//! platform data directory, so either can survive without the other. Disk
//! failures are logged and otherwise ignored; the in-memory copy is always
//! authoritative for the current process.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use svchub_core::models::{Envelope, User};
use svchub_core::prelude::*;

const SESSION_DIR: &str = "service-hub";
const TOKEN_FILE: &str = "session.token";
const USER_FILE: &str = "session-user.json";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Shared handle to the session. Cloning is cheap; all clones observe the
/// same token and user.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    dir: PathBuf,
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Load any persisted session from the platform data directory.
    pub fn load() -> Self {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(SESSION_DIR);
        Self::load_from(dir)
    }

    /// Load from an explicit directory. Used by tests and by callers that
    /// manage their own storage root.
    pub fn load_from(dir: PathBuf) -> Self {
        let token = match fs::read_to_string(dir.join(TOKEN_FILE)) {
            Ok(raw) => {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(_) => None,
        };
        let user = fs::read(dir.join(USER_FILE))
            .ok()
            .and_then(|bytes| match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!("discarding unreadable session user: {err}");
                    None
                }
            });
        Self {
            inner: Arc::new(Inner {
                dir,
                state: Mutex::new(SessionState { token, user }),
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    /// True when both a token and a user are present.
    pub fn is_authenticated(&self) -> bool {
        let state = self.lock();
        state.token.is_some() && state.user.is_some()
    }

    /// Store a new token. Empty or missing tokens are ignored so a response
    /// without a refreshed token never wipes the session.
    pub fn set_token(&self, token: Option<&str>) {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return;
        };
        self.lock().token = Some(token.to_string());
        self.persist_token(token);
    }

    /// Store the signed-in user. `None` is ignored, mirroring token updates.
    pub fn set_user(&self, user: Option<User>) {
        let Some(user) = user else { return };
        self.persist_user(&user);
        self.lock().user = Some(user);
    }

    /// Pick up a refreshed token from any backend envelope.
    pub fn absorb<E: Envelope>(&self, envelope: &E) {
        self.set_token(envelope.token());
    }

    /// Drop the token and user, in memory and on disk.
    pub fn clear(&self) {
        {
            let mut state = self.lock();
            state.token = None;
            state.user = None;
        }
        for file in [TOKEN_FILE, USER_FILE] {
            if let Err(err) = fs::remove_file(self.inner.dir.join(file)) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to remove session file {file}: {err}");
                }
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist_token(&self, token: &str) {
        if let Err(err) = fs::create_dir_all(&self.inner.dir)
            .and_then(|_| fs::write(self.inner.dir.join(TOKEN_FILE), token))
        {
            warn!("failed to persist session token: {err}");
        }
    }

    fn persist_user(&self, user: &User) {
        let bytes = match serde_json::to_vec_pretty(user) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("failed to encode session user: {err}");
                return;
            }
        };
        if let Err(err) = fs::create_dir_all(&self.inner.dir)
            .and_then(|_| fs::write(self.inner.dir.join(USER_FILE), bytes))
        {
            warn!("failed to persist session user: {err}");
        }
    }
}
