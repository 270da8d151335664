use reqwest::Method;
use tracing::{debug, instrument};

use super::{ApiClient, Auth};
use crate::errors::ApiError;
use crate::model::role::Role;
use crate::model::user::RoleEntry;
use crate::models::RoleChangeReq;

impl ApiClient {
    /// `GET /employees/roles/{username}`. The backend answers 404 for a user
    /// without any role row, which is reported as an empty list.
    #[instrument(skip(self))]
    pub async fn get_roles_for_user(&self, username: &str) -> Result<Vec<RoleEntry>, ApiError> {
        let url = self.endpoint(&["employees", "roles", username]);
        match self.send(Method::GET, url, None::<&()>, Auth::Session).await {
            Err(ApiError::NotFound { .. }) => {
                debug!(username, "no role entries");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// `PUT /employees/roles/{username}`
    #[instrument(skip(self))]
    pub async fn set_role(&self, username: &str, role: Role) -> Result<(), ApiError> {
        let url = self.endpoint(&["employees", "roles", username]);
        let body = RoleChangeReq { role };
        self.send_no_content(Method::PUT, url, Some(&body), Auth::Session)
            .await
    }
}
