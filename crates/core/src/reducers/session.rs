use std::sync::Arc;

use crate::actions::session::{LOGIN_FAILED, LOGIN_REQUEST, LOGIN_RESPONSE, LOGOUT, UNAUTHORIZED};
use crate::actions::Action;
use crate::models::resource::{errors_from_value, ErrorMap};
use crate::models::session::{AccessToken, SessionState};

/// Session transitions. Persistence is not done here; the store's
/// persistence middleware reacts to the same actions.
pub fn reduce(state: &Arc<SessionState>, action: &Action) -> Arc<SessionState> {
    match action.action_type() {
        LOGIN_REQUEST => Arc::new(SessionState {
            is_fetching: true,
            ..(**state).clone()
        }),
        LOGIN_RESPONSE => {
            let access_token = action
                .field("accessToken")
                .and_then(|v| serde_json::from_value::<AccessToken>(v.clone()).ok());
            if access_token.is_none() {
                tracing::warn!("login response without a usable access token");
            }
            Arc::new(SessionState {
                user: action.field("user").cloned(),
                access_token,
                is_fetching: false,
                errors: ErrorMap::new(),
            })
        }
        LOGIN_FAILED => Arc::new(SessionState {
            user: None,
            access_token: None,
            is_fetching: false,
            errors: action.field("errors").map(errors_from_value).unwrap_or_default(),
        }),
        UNAUTHORIZED | LOGOUT => Arc::new(SessionState::default()),
        _ => Arc::clone(state),
    }
}
