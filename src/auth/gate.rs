//! Role based gate for every action the console offers.
//!
//! All permission decisions live here. Callers ask the gate before rendering a
//! control and again before issuing the request, so a stale view can never
//! reach the backend with an action the role does not allow.

use strum_macros::Display;

use crate::errors::ApiError;
use crate::model::role::Role;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum Action {
    #[strum(serialize = "view employees")]
    ViewEmployees,
    /// Covers both adding and editing.
    #[strum(serialize = "add/edit employee")]
    EditEmployee,
    #[strum(serialize = "delete employee")]
    DeleteEmployee,
    #[strum(serialize = "view role management")]
    ViewRoles,
    /// `target` is the current role of the user whose role would change.
    #[strum(serialize = "change role")]
    ChangeRole { target: Role },
}

pub fn is_allowed(role: Option<Role>, action: Action) -> bool {
    match action {
        Action::ViewEmployees | Action::ViewRoles => true,
        Action::EditEmployee => matches!(role, Some(Role::Manager | Role::Admin)),
        Action::DeleteEmployee => role == Some(Role::Admin),
        // an admin can never be demoted from the console
        Action::ChangeRole { target } => role == Some(Role::Admin) && target != Role::Admin,
    }
}

/// Like [`is_allowed`] but shaped for `?`.
pub fn authorize(role: Option<Role>, action: Action) -> Result<(), ApiError> {
    if is_allowed(role, action) {
        Ok(())
    } else {
        tracing::debug!(%action, ?role, "action denied by gate");
        Err(ApiError::Denied { action, role })
    }
}

/// Actions without a target that `role` may perform, for deciding which
/// controls to show.
pub fn allowed_actions(role: Option<Role>) -> Vec<Action> {
    [
        Action::ViewEmployees,
        Action::EditEmployee,
        Action::DeleteEmployee,
        Action::ViewRoles,
        Action::ChangeRole { target: Role::User },
    ]
    .into_iter()
    .filter(|a| is_allowed(role, *a))
    .collect()
}
