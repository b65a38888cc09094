use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::model::UserId;

/// The signed-in caller, as seen by the core.
pub trait Session: Send + Sync + std::fmt::Debug {
    fn user_id(&self) -> UserId;

    /// Bearer token to attach to outgoing requests, if the shell hands one over.
    fn bearer_token(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token payload is not valid base64: {0}")]
    Encoding(String),

    #[error("token payload is not valid JSON: {0}")]
    Payload(String),

    #[error("token has no usable nameid claim")]
    MissingUserId,
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    nameid: Option<serde_json::Value>,
}

/// Session backed by a JWT; the caller id comes from the `nameid` claim.
///
/// The signature is not verified here, the server does that on every request.
#[derive(Debug)]
pub struct TokenSession {
    user_id: UserId,
    token: SecretString,
}

impl TokenSession {
    pub fn from_jwt(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();
        let user_id = Self::decode_user_id(&token)?;
        Ok(Self {
            user_id,
            token: SecretString::new(token),
        })
    }

    fn decode_user_id(token: &str) -> Result<UserId, SessionError> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if !payload.is_empty() => payload,
            _ => {
                return Err(SessionError::Malformed(
                    "expected three dot-separated segments".into(),
                ))
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| SessionError::Encoding(e.to_string()))?;

        let claims: Claims =
            serde_json::from_slice(&bytes).map_err(|e| SessionError::Payload(e.to_string()))?;

        let id = match claims.nameid {
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        id.map(UserId).ok_or(SessionError::MissingUserId)
    }
}

impl Session for TokenSession {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn bearer_token(&self) -> Option<&str> {
        Some(self.token.expose_secret())
    }
}

/// Session for shells that already resolved the caller id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSession(pub UserId);

impl Session for FixedSession {
    fn user_id(&self) -> UserId {
        self.0
    }
}
