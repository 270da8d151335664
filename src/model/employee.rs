use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Server assigned employee identifier. Never changes once assigned.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct EmployeeId(pub u64);

/// Canonical employee record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Creator of the record. Assigned by the backend, read-only here.
    pub username: String,
}

/// Editable fields of an employee. This is the only shape ever sent to the
/// backend for create (POST) and full replace (PUT); id and username are not
/// part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&Employee> for EmployeeDraft {
    fn from(e: &Employee) -> Self {
        Self {
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            email: e.email.clone(),
        }
    }
}
