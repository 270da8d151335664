use serde::{Deserialize, Serialize};

use super::role::Role;

/// Entry of `GET /auth/users`. The backend sends the full user row; only the
/// username is used here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
}

/// Entry of `GET /employees/roles/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub role: Role,
}

/// A user joined with its current role. Rebuilt on every load, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleRecord {
    pub username: String,
    pub role: Role,
}
