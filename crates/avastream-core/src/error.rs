//! Shared error type across avastream crates.

use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message or config.
    BadRequest,
    /// Bearer token rejected by the session API.
    AuthFailed,
    /// Unsupported protocol or config version.
    UnsupportedVersion,
    /// Network or HTTP failure talking to the session API.
    Upstream,
    /// Session API answered with a non-success business code.
    ApiRejected,
    /// Real-time channel operation failed.
    Channel,
    /// Operation not valid in the current session state.
    InvalidState,
    /// Channel credentials expired.
    SessionExpired,
    /// Internal error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::ApiRejected => "API_REJECTED",
            ClientCode::Channel => "CHANNEL",
            ClientCode::InvalidState => "INVALID_STATE",
            ClientCode::SessionExpired => "SESSION_EXPIRED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AvaError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum AvaError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("upstream: {0}")]
    Upstream(String),
    #[error("api rejected request (code {code}): {msg}")]
    ApiRejected { code: i64, msg: String },
    #[error("channel: {0}")]
    Channel(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("session expired")]
    SessionExpired,
    #[error("internal: {0}")]
    Internal(String),
}

impl AvaError {
    /// Map internal error to a stable caller-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            AvaError::BadRequest(_) => ClientCode::BadRequest,
            AvaError::AuthFailed => ClientCode::AuthFailed,
            AvaError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            AvaError::Upstream(_) => ClientCode::Upstream,
            AvaError::ApiRejected { .. } => ClientCode::ApiRejected,
            AvaError::Channel(_) => ClientCode::Channel,
            AvaError::InvalidState(_) => ClientCode::InvalidState,
            AvaError::SessionExpired => ClientCode::SessionExpired,
            AvaError::Internal(_) => ClientCode::Internal,
        }
    }
}
