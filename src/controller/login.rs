use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::auth::gate::{self, Action};
use crate::errors::ApiError;
use crate::model::role::Role;
use crate::session::Session;
use crate::utils::validation::validate_credentials;

/// Entry point of the console: establishes and ends sessions.
pub struct LoginController {
    api: ApiClient,
}

impl LoginController {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Role, ApiError> {
        validate_credentials(username, password)?;
        self.api.login(username.trim(), password).await
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        validate_credentials(username, password)?;
        self.api.register(username.trim(), password).await
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.api.session().clear()?;
        info!("logged out");
        Ok(())
    }

    /// Current session and the actions it unlocks.
    pub fn whoami(&self) -> (Session, Vec<Action>) {
        let session = self.api.session().get();
        let actions = gate::allowed_actions(session.role);
        (session, actions)
    }
}
