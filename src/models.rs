use serde::{Deserialize, Serialize};

use crate::model::role::Role;

#[derive(Serialize)]
pub struct LoginReqDto<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// `{ "message": ... }` bodies, used by register.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct RoleChangeReq {
    pub role: Role,
}

/// Shape of error bodies. The backend is not consistent about which field it
/// fills, so both are optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    /// Best effort message out of a raw error body.
    pub fn extract(raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => body.message.or(body.error).filter(|m| !m.is_empty()),
            // plain text bodies are passed through, anything json but unknown is dropped
            Err(_) if !raw.starts_with('{') => Some(raw.to_string()),
            Err(_) => None,
        }
    }
}
