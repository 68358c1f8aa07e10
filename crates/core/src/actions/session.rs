use serde_json::{json, Value};

use crate::models::resource::{errors_to_value, ErrorMap};
use crate::models::session::AccessToken;

use super::creator::Action;

pub const LOGIN_REQUEST: &str = "LOGIN_REQUEST";
pub const LOGIN_RESPONSE: &str = "LOGIN_RESPONSE";
pub const LOGIN_FAILED: &str = "LOGIN_FAILED";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const LOGOUT: &str = "LOGOUT";

/// Carries the login name only; the password never enters the action log.
pub fn login_request(username: &str) -> Action {
    Action::new(LOGIN_REQUEST).with("username", username)
}

pub fn login_response(user: Value, token: &AccessToken) -> Action {
    Action::new(LOGIN_RESPONSE)
        .with("user", user)
        .with(
            "accessToken",
            json!({ "value": token.value, "expire": token.expire }),
        )
}

pub fn login_failed(errors: &ErrorMap) -> Action {
    Action::new(LOGIN_FAILED).with("errors", errors_to_value(errors))
}

pub fn unauthorized() -> Action {
    Action::new(UNAUTHORIZED)
}

pub fn logout() -> Action {
    Action::new(LOGOUT)
}
