use super::creator::Action;

pub const ROUTE_PUSH: &str = "ROUTE_PUSH";

/// Navigate to `pathname`; `next` is the path to resume after login.
pub fn push(pathname: &str, next: Option<&str>) -> Action {
    let action = Action::new(ROUTE_PUSH).with("pathname", pathname);
    match next {
        Some(next) => action.with("next", next),
        None => action,
    }
}

/// Bounce to the login page, remembering where we were headed.
pub fn to_login(resume: &str) -> Action {
    push("/login", Some(resume))
}
