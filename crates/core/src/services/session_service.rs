use std::sync::Arc;

use crate::actions::{router, session};
use crate::client::{AuthClient, LoginResponse};
use crate::errors::CoreError;
use crate::models::resource::{errors_from_value, ErrorMap};
use crate::store::Store;

/// Login / logout flows.
pub struct SessionService {
    store: Arc<Store>,
    auth: Arc<dyn AuthClient>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionService {
    pub fn new(store: Arc<Store>, auth: Arc<dyn AuthClient>) -> Self {
        Self { store, auth }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.state().session.is_authenticated()
    }

    /// Authenticate and store the session.
    ///
    /// On success the store persists the token and resumes the pending
    /// `next` path. On failure `LOGIN_FAILED` is dispatched with the mapped
    /// errors and the error is returned as well.
    pub async fn login(&self, login: &str, password: &str) -> Result<(), CoreError> {
        self.store.dispatch(session::login_request(login));

        match self.auth.login(login, password).await {
            Ok(LoginResponse { user, token }) => {
                tracing::info!(login, "logged in");
                self.store.dispatch(session::login_response(user, &token));
                Ok(())
            }
            Err(e) => {
                tracing::info!(login, error = %e, "login failed");
                self.store.dispatch(session::login_failed(&login_errors(&e)));
                Err(e)
            }
        }
    }

    /// Drop the session (memory and disk) and go to the login page.
    pub fn logout(&self) {
        tracing::info!("logging out");
        self.store.dispatch(session::logout());
        self.store.dispatch(router::push("/login", None));
    }
}

/// 400 → the body's field errors; other statuses → `{status: status text}`;
/// no response → `{"network": message}`.
pub fn login_errors(error: &CoreError) -> ErrorMap {
    let mut errors = ErrorMap::new();
    match error {
        CoreError::Http(failure) if failure.status == 400 => {
            return errors_from_value(&failure.data);
        }
        CoreError::Http(failure) => {
            errors.insert(failure.status.to_string(), failure.status_text.clone());
        }
        CoreError::Network(message) => {
            errors.insert("network".to_string(), message.clone());
        }
        other => {
            errors.insert("login".to_string(), other.to_string());
        }
    }
    errors
}
