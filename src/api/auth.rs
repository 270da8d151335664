use reqwest::Method;
use tracing::{info, instrument};

use super::{ApiClient, Auth};
use crate::errors::ApiError;
use crate::model::role::Role;
use crate::model::user::UserSummary;
use crate::models::{LoginReqDto, LoginResponse, MessageResponse};

impl ApiClient {
    /// `POST /auth/login`. Stores the returned token and role in the session.
    /// A rejection leaves the current session as it was.
    #[instrument(name = "auth_login", skip(self, username, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Role, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        let body = LoginReqDto { username, password };
        let LoginResponse { token, role } = self
            .send(Method::POST, url, Some(&body), Auth::Anonymous)
            .await?;

        self.session().set(token, role)?;
        info!(%role, "login successful");
        Ok(role)
    }

    /// `POST /auth/register`. Returns the backend's confirmation message.
    #[instrument(name = "auth_register", skip(self, username, password), fields(username = %username))]
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["auth", "register"]);
        let body = LoginReqDto { username, password };
        let MessageResponse { message } = self
            .send(Method::POST, url, Some(&body), Auth::Anonymous)
            .await?;
        info!("registration accepted");
        Ok(message)
    }

    /// `GET /auth/users`
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let url = self.endpoint(&["auth", "users"]);
        self.send(Method::GET, url, None::<&()>, Auth::Session).await
    }
}
