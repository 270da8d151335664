use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::storage::{MemoryStorage, SessionStorage};
use crate::errors::StorageError;
use crate::model::role::Role;

const TOKEN_KEY: &str = "token";
const ROLE_KEY: &str = "role";
const ESTABLISHED_KEY: &str = "established_at";

/// Token and role held by the client. The token is opaque, its validity is
/// only ever decided by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub established_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Single owner of the session. Clones share the same state, and dependents
/// that need to react to a logout or an expired token can [`subscribe`].
///
/// [`subscribe`]: SessionStore::subscribe
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: Arc<watch::Sender<Session>>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Result<Self, StorageError> {
        let token = storage.get(TOKEN_KEY)?;
        if token.is_none() {
            let (state, _) = watch::channel(Session::default());
            return Ok(Self {
                storage,
                state: Arc::new(state),
            });
        }
        let role = match storage.get(ROLE_KEY)? {
            Some(raw) => {
                let role = Role::from_stored(&raw);
                if role.is_none() {
                    log::warn!("ignoring unknown stored role '{}'", raw);
                }
                role
            }
            None => None,
        };
        let established_at = storage
            .get(ESTABLISHED_KEY)?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let (state, _) = watch::channel(Session {
            token,
            role,
            established_at,
        });
        Ok(Self {
            storage,
            state: Arc::new(state),
        })
    }

    pub fn in_memory() -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            storage: Arc::new(MemoryStorage::new()),
            state: Arc::new(state),
        }
    }

    pub fn get(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role
    }

    /// Start a new session. The in-memory session is replaced even if
    /// persisting it fails.
    pub fn set(&self, token: impl Into<String>, role: Role) -> Result<(), StorageError> {
        let token = token.into();
        let established_at = Utc::now();
        self.state.send_replace(Session {
            token: Some(token.clone()),
            role: Some(role),
            established_at: Some(established_at),
        });

        self.storage.set(TOKEN_KEY, &token)?;
        self.storage.set(ROLE_KEY, role.as_ref())?;
        self.storage.set(ESTABLISHED_KEY, &established_at.to_rfc3339())?;
        log::info!("session established with role {}", role);
        Ok(())
    }

    /// Drop the session. Idempotent; subscribers are only woken when there
    /// was something to clear. Every key is removed even if an earlier
    /// removal fails, the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let cleared = self.state.send_if_modified(|session| {
            if *session == Session::default() {
                false
            } else {
                *session = Session::default();
                true
            }
        });
        if cleared {
            log::info!("session cleared");
        }

        [TOKEN_KEY, ROLE_KEY, ESTABLISHED_KEY]
            .into_iter()
            .map(|key| self.storage.remove(key))
            .fold(Ok(()), |first, result| first.and(result))
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}
