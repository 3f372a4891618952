//! Unified application error model for the request-tracker core.
//! One enum is shared by the session manager and the request store, with
//! stable snake_case codes a frontend can map onto whatever transport it
//! fronts the core with.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreError {
    /// Login against the credential store found no matching account.
    InvalidCredentials { message: String },
    /// Registration collided with an existing username.
    UsernameTaken { message: String },
    /// Request creation named a category absent from the catalog.
    CategoryNotFound { message: String },
    /// Persisted principal and role marker disagree; the session was cleared.
    SessionTampered { message: String },
    /// A command named a request id that does not resolve.
    NotFound { message: String },
    Io { message: String },
}

impl CoreError {
    pub fn code_str(&self) -> &'static str {
        match self {
            CoreError::InvalidCredentials { .. } => "invalid_credentials",
            CoreError::UsernameTaken { .. } => "username_taken",
            CoreError::CategoryNotFound { .. } => "category_not_found",
            CoreError::SessionTampered { .. } => "session_tampered",
            CoreError::NotFound { .. } => "not_found",
            CoreError::Io { .. } => "io",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CoreError::InvalidCredentials { message }
            | CoreError::UsernameTaken { message }
            | CoreError::CategoryNotFound { message }
            | CoreError::SessionTampered { message }
            | CoreError::NotFound { message }
            | CoreError::Io { message } => message.as_str(),
        }
    }

    pub fn invalid_credentials<S: Into<String>>(msg: S) -> Self { CoreError::InvalidCredentials { message: msg.into() } }
    pub fn username_taken<S: Into<String>>(msg: S) -> Self { CoreError::UsernameTaken { message: msg.into() } }
    pub fn category_not_found<S: Into<String>>(msg: S) -> Self { CoreError::CategoryNotFound { message: msg.into() } }
    pub fn session_tampered<S: Into<String>>(msg: S) -> Self { CoreError::SessionTampered { message: msg.into() } }
    pub fn not_found<S: Into<String>>(msg: S) -> Self { CoreError::NotFound { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { CoreError::Io { message: msg.into() } }

    /// Map to HTTP status code for whatever HTTP layer fronts the core.
    pub fn http_status(&self) -> u16 {
        match self {
            CoreError::InvalidCredentials { .. } => 401,
            CoreError::UsernameTaken { .. } => 409,
            CoreError::CategoryNotFound { .. } => 404,
            CoreError::SessionTampered { .. } => 401,
            CoreError::NotFound { .. } => 404,
            CoreError::Io { .. } => 503,
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        // Default mapping: internal seams surface as Io unless typed earlier
        CoreError::Io { message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(CoreError::invalid_credentials("no match").http_status(), 401);
        assert_eq!(CoreError::username_taken("dup").http_status(), 409);
        assert_eq!(CoreError::category_not_found("missing").http_status(), 404);
        assert_eq!(CoreError::session_tampered("mismatch").http_status(), 401);
        assert_eq!(CoreError::not_found("no request").http_status(), 404);
        assert_eq!(CoreError::io("disk").http_status(), 503);
    }

    #[test]
    fn codes_and_display() {
        let e = CoreError::invalid_credentials("no matching account");
        assert_eq!(e.code_str(), "invalid_credentials");
        assert_eq!(format!("{}", e), "invalid_credentials: no matching account");
    }
}
