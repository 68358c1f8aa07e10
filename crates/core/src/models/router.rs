use serde::{Deserialize, Serialize};

/// Where the client currently "is".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    /// Path to resume after login, set when a guard bounced us to `/login`.
    pub next: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            next: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterState {
    pub location: Location,
}
