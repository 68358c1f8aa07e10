use std::sync::Arc;

use crate::actions::router::ROUTE_PUSH;
use crate::actions::Action;
use crate::models::router::{Location, RouterState};

pub fn reduce(state: &Arc<RouterState>, action: &Action) -> Arc<RouterState> {
    if !action.is(ROUTE_PUSH) {
        return Arc::clone(state);
    }
    let Some(pathname) = action.field("pathname").and_then(|v| v.as_str()) else {
        return Arc::clone(state);
    };
    Arc::new(RouterState {
        location: Location {
            pathname: pathname.to_string(),
            next: action
                .field("next")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        },
    })
}
