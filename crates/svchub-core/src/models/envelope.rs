//! Response envelope conventions shared by every backend endpoint

use serde::Deserialize;

/// Status code carried by every backend response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ResponseCode {
    #[serde(rename = "SUCCESSFUL")]
    Successful,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "NO_RESPONSE")]
    NoResponse,
    #[serde(rename = "TOKEN_EXPIRED")]
    TokenExpired,
}

/// Common accessors over a typed response envelope.
///
/// Read-only list endpoints may omit the status field entirely; that is
/// treated as implicit success.
pub trait Envelope {
    fn response_code(&self) -> Option<ResponseCode>;
    fn token(&self) -> Option<&str>;
    fn description(&self) -> Option<&str>;

    fn did_succeed(&self) -> bool {
        matches!(
            self.response_code(),
            None | Some(ResponseCode::Successful)
        )
    }

    fn token_expired(&self) -> bool {
        self.response_code() == Some(ResponseCode::TokenExpired)
    }
}

/// Implements [`Envelope`] for response types carrying the conventional
/// `responseCode` / `token` / `description` fields.
macro_rules! impl_envelope {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::models::envelope::Envelope for $ty {
                fn response_code(&self) -> Option<$crate::models::envelope::ResponseCode> {
                    self.response_code
                }

                fn token(&self) -> Option<&str> {
                    self.token.as_deref()
                }

                fn description(&self) -> Option<&str> {
                    self.description.as_deref()
                }
            }
        )+
    };
}

pub(crate) use impl_envelope;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Probe {
        response_code: Option<ResponseCode>,
        token: Option<String>,
        description: Option<String>,
    }

    impl_envelope!(Probe);

    #[test]
    fn test_response_code_decoding() {
        let probe: Probe =
            serde_json::from_str(r#"{"responseCode":"TOKEN_EXPIRED","token":"t1"}"#).unwrap();
        assert_eq!(probe.response_code(), Some(ResponseCode::TokenExpired));
        assert!(probe.token_expired());
        assert!(!probe.did_succeed());
        assert_eq!(probe.token(), Some("t1"));
    }

    #[test]
    fn test_missing_code_is_implicit_success() {
        let probe: Probe = serde_json::from_str(r#"{"description":"ok"}"#).unwrap();
        assert!(probe.did_succeed());
        assert!(!probe.token_expired());
        assert_eq!(probe.description(), Some("ok"));
    }

    #[test]
    fn test_unknown_code_fails_decode() {
        let result = serde_json::from_str::<Probe>(r#"{"responseCode":"BANANA"}"#);
        assert!(result.is_err());
    }
}
