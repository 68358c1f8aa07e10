use std::sync::Arc;

use crate::actions::session::{LOGIN_RESPONSE, LOGOUT, UNAUTHORIZED};
use crate::actions::{router, Action};
use crate::models::kind::ResourceKind;
use crate::reducers::AppState;
use crate::storage::SessionStore;

/// Hook run after the reducers have applied an action.
///
/// Returned actions are dispatched next, in order, through the full
/// reducer + middleware pipeline.
pub trait Middleware: Send + Sync {
    fn after(&self, action: &Action, previous: &AppState, next: &AppState) -> Vec<Action>;
}

/// Logs every action and any collection status it changed.
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn after(&self, action: &Action, previous: &AppState, next: &AppState) -> Vec<Action> {
        tracing::debug!(action = action.action_type(), "dispatched");
        for kind in ResourceKind::ALL {
            let before = previous.collection(kind).status;
            let after = next.collection(kind).status;
            if before == after {
                continue;
            }
            if after.is_done() {
                tracing::debug!(collection = %kind, status = %after, "request finished");
            } else {
                tracing::debug!(collection = %kind, from = %before, to = %after, "status changed");
            }
        }
        Vec::new()
    }
}

/// Mirrors login/logout into the durable [`SessionStore`].
#[derive(Debug)]
pub struct PersistenceMiddleware {
    session: Arc<SessionStore>,
}

impl PersistenceMiddleware {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

impl Middleware for PersistenceMiddleware {
    fn after(&self, action: &Action, _previous: &AppState, next: &AppState) -> Vec<Action> {
        let result = match action.action_type() {
            LOGIN_RESPONSE => match &next.session.access_token {
                Some(token) => self.session.save(next.session.user.as_ref(), token),
                None => Ok(()),
            },
            LOGOUT | UNAUTHORIZED => self.session.teardown(),
            _ => Ok(()),
        };
        if let Err(e) = result {
            tracing::error!(action = action.action_type(), error = %e, "failed to persist session");
        }
        Vec::new()
    }
}

/// After a successful login, resume the path the user was bounced from.
#[derive(Debug, Default)]
pub struct LoginRedirectMiddleware;

impl Middleware for LoginRedirectMiddleware {
    fn after(&self, action: &Action, previous: &AppState, next: &AppState) -> Vec<Action> {
        if !action.is(LOGIN_RESPONSE) || !next.session.is_authenticated() {
            return Vec::new();
        }
        let target = previous
            .router
            .location
            .next
            .clone()
            .unwrap_or_else(|| "/".to_string());
        tracing::info!(to = %target, "logged in, redirecting");
        vec![router::push(&target, None)]
    }
}
