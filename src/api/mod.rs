//! Typed client for the employee backend.
//!
//! Every call goes through a single send path that attaches the bearer token,
//! classifies non-success statuses into [`ApiError`] and clears the session when
//! the backend answers 401 on an authenticated call.

pub mod auth;
pub mod employee;
pub mod role;

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{ApiError, ValidationError};
use crate::models::ErrorBody;
use crate::session::SessionStore;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Whether a call runs inside the session or is part of establishing one.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Auth {
    /// Bearer token attached when present; 401 ends the session.
    Session,
    /// Login and register: no token, and a rejection leaves the session alone.
    Anonymous,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionStore) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_base_url, config.request_timeout, session)
    }

    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::Failure {
            status: None,
            message: format!("invalid api base url '{base_url}': {e}"),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Failure {
                status: None,
                message: format!("api base url '{base_url}' cannot hold paths"),
            });
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Base url joined with `segments`, each one percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            // checked in the constructor, a base url always has segments
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode a JSON body of type `T`.
    pub(crate) async fn send<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let endpoint = format!("{} {}", method, url.path());
        let raw = self.send_raw(method, url, body, auth).await?;
        decode(&endpoint, &raw)
    }

    /// Send a request whose success body is irrelevant (204, empty 200).
    pub(crate) async fn send_no_content<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send_raw(method, url, body, auth).await.map(|_| ())
    }

    async fn send_raw<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request_id = Uuid::new_v4().to_string();
        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, &request_id);

        if auth == Auth::Session {
            if let Some(token) = self.session.token() {
                req = req.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!(%request_id, %method, url = %url, "sending request");
        let resp = req.send().await.map_err(|e| {
            warn!(%request_id, %method, url = %url, error = %e, "request failed");
            ApiError::from(e)
        })?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%request_id, status = status.as_u16(), "response received");

        if status.is_success() {
            return Ok(text);
        }

        let err = classify(status, &text, auth);
        if matches!(err, ApiError::Unauthorized) {
            warn!(%request_id, url = %url, "backend rejected the session, clearing it");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "failed to remove persisted session");
            }
        } else {
            warn!(%request_id, status = status.as_u16(), error = %err, "request rejected");
        }
        Err(err)
    }
}

/// Map a non-success status to the error taxonomy.
pub(crate) fn classify(status: StatusCode, body: &str, auth: Auth) -> ApiError {
    let message = ErrorBody::extract(body);
    match (status.as_u16(), auth) {
        (401 | 403, Auth::Anonymous) => ApiError::InvalidCredentials(message),
        (401, Auth::Session) => ApiError::Unauthorized,
        (403, Auth::Session) => ApiError::Forbidden { message },
        (404, _) => ApiError::NotFound { message },
        (code, _) => ApiError::Failure {
            status: Some(code),
            message: message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            }),
        },
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, raw: &str) -> Result<T, ApiError> {
    serde_json::from_str(raw).map_err(|e| {
        ValidationError::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            detail: e.to_string(),
        }
        .into()
    })
}
