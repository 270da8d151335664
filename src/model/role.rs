use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Role held by the logged in user. Wire form is the upper case name.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    /// Assumed for a user the backend has no role entry for.
    #[default]
    User,
    Manager,
    Admin,
}

impl Role {
    /// Parse a persisted role value. Anything outside the three known roles is
    /// treated as no role at all.
    pub fn from_stored(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}
