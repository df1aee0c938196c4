//! Client error taxonomy

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the gateway and orchestration layers.
///
/// `Cancelled` is internal bookkeeping for superseded work units and must
/// never reach presentation state.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Network/connectivity failure or a malformed response body.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A well-formed response that signals a business-level failure.
    #[error("{message}")]
    Application { message: String },

    /// HTTP 401 from the backend. An embedded token-expired response code is
    /// classified separately by the session expiry predicate.
    #[error("authorization was rejected by the server")]
    Unauthorized,

    /// The work unit was superseded and stopped cooperatively.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// True for failures that should be shown to the user as-is.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Application { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::transport(format!("malformed response body: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::transport("connection refused");
        assert_eq!(err.to_string(), "transport error: connection refused");

        let err = Error::application("Unable to load companies.");
        assert_eq!(err.to_string(), "Unable to load companies.");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::transport("timeout").is_user_visible());
        assert!(Error::application("nope").is_user_visible());
        assert!(!Error::Unauthorized.is_user_visible());
        assert!(!Error::Cancelled.is_user_visible());

        assert!(Error::Unauthorized.is_unauthorized());
        assert!(Error::Cancelled.is_cancelled());
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Transport { .. }));
    }
}
