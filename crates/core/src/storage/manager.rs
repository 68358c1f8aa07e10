use parking_lot::RwLock;
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::session::{AccessToken, SessionState};

use super::persist::PersistStore;

/// Persisted key of the user profile (JSON).
pub const USER_KEY: &str = "user";

/// Persisted key of the access token (JSON `{value, expire}`).
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

#[derive(Debug, Clone, Default)]
struct Persisted {
    user: Option<Value>,
    token: Option<AccessToken>,
}

/// Session persistence: user profile + access token in a [`PersistStore`].
///
/// Lifecycle is explicit: [`init`](Self::init) hydrates from durable
/// storage, [`save`](Self::save) records a fresh login,
/// [`teardown`](Self::teardown) wipes everything on logout/unauthorized.
pub struct SessionStore {
    persist: Box<dyn PersistStore>,
    cached: RwLock<Persisted>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cached.read();
        f.debug_struct("SessionStore")
            .field("has_user", &cached.user.is_some())
            .field("has_token", &cached.token.is_some())
            .finish()
    }
}

impl SessionStore {
    /// An empty, not yet hydrated session store.
    pub fn new(persist: Box<dyn PersistStore>) -> Self {
        Self {
            persist,
            cached: RwLock::new(Persisted::default()),
        }
    }

    /// Load user and token from durable storage.
    ///
    /// Undecodable values and expired tokens are dropped (and logged), not
    /// treated as errors; only a failing backing store is.
    pub fn init(&self) -> Result<(), CoreError> {
        let user = self
            .persist
            .get(USER_KEY)?
            .and_then(|raw| match serde_json::from_str::<Value>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding undecodable persisted user");
                    None
                }
            });

        let token = self
            .persist
            .get(ACCESS_TOKEN_KEY)?
            .and_then(|raw| match serde_json::from_str::<AccessToken>(&raw) {
                Ok(token) => match AccessToken::new(token.value, token.expire) {
                    Ok(token) => Some(token),
                    Err(e) => {
                        tracing::info!(error = %e, "persisted access token expired");
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "discarding undecodable persisted access token");
                    None
                }
            });

        *self.cached.write() = Persisted { user, token };
        Ok(())
    }

    #[must_use]
    pub fn user(&self) -> Option<Value> {
        self.cached.read().user.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.cached.read().token.clone()
    }

    /// Record a successful login.
    pub fn save(&self, user: Option<&Value>, token: &AccessToken) -> Result<(), CoreError> {
        match user {
            Some(user) => self.persist.set(USER_KEY, &serde_json::to_string(user)?)?,
            None => self.persist.remove(USER_KEY)?,
        }
        self.persist
            .set(ACCESS_TOKEN_KEY, &serde_json::to_string(token)?)?;

        *self.cached.write() = Persisted {
            user: user.cloned(),
            token: Some(token.clone()),
        };
        Ok(())
    }

    /// Forget the session, in memory and on disk.
    pub fn teardown(&self) -> Result<(), CoreError> {
        *self.cached.write() = Persisted::default();
        self.persist.remove(USER_KEY)?;
        self.persist.remove(ACCESS_TOKEN_KEY)?;
        Ok(())
    }

    /// Session slice to seed a fresh state container with.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        let cached = self.cached.read();
        SessionState {
            user: cached.user.clone(),
            access_token: cached.token.clone(),
            ..SessionState::default()
        }
    }
}
