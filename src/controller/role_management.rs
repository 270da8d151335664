use futures::future::join_all;
use tracing::{debug, info, instrument};

use crate::api::ApiClient;
use crate::auth::gate::{self, Action};
use crate::errors::ApiError;
use crate::model::role::Role;
use crate::model::user::UserRoleRecord;

/// Users joined with their roles, and role changes for admins.
pub struct RoleManagementController {
    api: ApiClient,
    users: Vec<UserRoleRecord>,
}

impl RoleManagementController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            users: Vec::new(),
        }
    }

    pub fn users(&self) -> &[UserRoleRecord] {
        &self.users
    }

    /// Whether the current session may change `record`'s role.
    pub fn can_change(&self, record: &UserRoleRecord) -> bool {
        gate::is_allowed(
            self.api.session().role(),
            Action::ChangeRole {
                target: record.role,
            },
        )
    }

    /// Fetch every user, then look up all roles concurrently. The list is
    /// replaced only once every lookup has finished and all of them succeeded.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&[UserRoleRecord], ApiError> {
        gate::authorize(self.api.session().role(), Action::ViewRoles)?;
        let users = self.api.list_users().await?;

        let api = &self.api;
        let lookups = users.into_iter().map(|user| {
            async move {
                let entries = api.get_roles_for_user(&user.username).await?;
                let role = entries.first().map(|e| e.role).unwrap_or_default();
                Ok::<_, ApiError>(UserRoleRecord {
                    username: user.username,
                    role,
                })
            }
        });
        let records = join_all(lookups)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        self.users = records;
        info!(count = self.users.len(), "user roles loaded");
        Ok(&self.users)
    }

    /// Change `username`'s role. Only an admin may do this, and never to
    /// another admin. The local record is updated once the backend accepts.
    /// Setting the role a user already has sends nothing.
    #[instrument(skip(self))]
    pub async fn promote(&mut self, username: &str, new_role: Role) -> Result<(), ApiError> {
        let role = self.api.session().role();
        gate::authorize(role, Action::ChangeRole { target: Role::User })?;

        let current = self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.role);
        let Some(current) = current else {
            return Err(ApiError::NotFound {
                message: Some(format!("user '{username}' is not in the loaded list")),
            });
        };
        gate::authorize(role, Action::ChangeRole { target: current })?;
        if current == new_role {
            debug!(%new_role, "role unchanged");
            return Ok(());
        }

        self.api.set_role(username, new_role).await?;

        if let Some(record) = self.users.iter_mut().find(|u| u.username == username) {
            record.role = new_role;
        }
        info!(%new_role, "role updated");
        Ok(())
    }
}
