//! Error types shared by the session store, the api client and the controllers.
//!
//! Every api call resolves to `Result<T, ApiError>`; controllers branch on the
//! variant instead of looking at status codes.

use thiserror::Error;

use crate::auth::gate::Action;
use crate::model::role::Role;

/// Client-side validation failures. Raised before any request is sent, or when
/// a successful response does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("'{0}' is not a valid email address")]
    MalformedEmail(String),

    #[error("unexpected response from {endpoint}: {detail}")]
    UnexpectedResponse { endpoint: String, detail: String },
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 on an authenticated call. The session has already been cleared.
    #[error("Unauthorized: please login again")]
    Unauthorized,

    /// Login or register rejected by the backend. The session is left untouched.
    #[error("Invalid credentials{}", suffix(.0))]
    InvalidCredentials(Option<String>),

    /// 403: authenticated but the role is not sufficient. Session kept.
    #[error("Access denied{}", suffix(.message))]
    Forbidden { message: Option<String> },

    /// Blocked by the authorization gate, nothing was sent.
    #[error("Access denied: {action} is not permitted for role {}", role_name(.role))]
    Denied { action: Action, role: Option<Role> },

    #[error("Not found{}", suffix(.message))]
    NotFound { message: Option<String> },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The call succeeded but the session could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Any other status, or a transport level failure when `status` is `None`.
    #[error("Request failed{}: {message}", status_suffix(.status))]
    Failure { status: Option<u16>, message: String },
}

fn suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {m}"),
        _ => String::new(),
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

fn role_name(role: &Option<Role>) -> String {
    role.map(|r| r.to_string()).unwrap_or_else(|| "<none>".to_string())
}

impl ApiError {
    /// The caller has to send the user back to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn is_permission_error(&self) -> bool {
        matches!(self, ApiError::Forbidden { .. } | ApiError::Denied { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("could not reach the backend: {e}")
        } else {
            e.to_string()
        };
        ApiError::Failure {
            status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}
