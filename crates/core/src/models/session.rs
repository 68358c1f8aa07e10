use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

use super::resource::ErrorMap;

/// Milliseconds since the Unix epoch, the unit of `X-ACCESS-TOKEN-EXPIRE`.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// API access token plus its expiry (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub value: String,
    pub expire: i64,
}

impl AccessToken {
    /// Build a token; rejects one that is already expired.
    pub fn new(value: impl Into<String>, expire: i64) -> Result<Self, CoreError> {
        if expire <= now_millis() {
            return Err(CoreError::InvalidToken(format!(
                "expiry {expire} is not in the future"
            )));
        }
        Ok(Self {
            value: value.into(),
            expire,
        })
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_millis())
    }

    #[must_use]
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        !self.value.is_empty() && now_ms < self.expire
    }
}

/// Authentication slice of the state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Opaque profile as returned by `/auth/login`.
    pub user: Option<Value>,
    pub access_token: Option<AccessToken>,
    pub is_fetching: bool,
    pub errors: ErrorMap,
}

impl SessionState {
    /// Token, but only while it is still valid.
    #[must_use]
    pub fn valid_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref().filter(|token| token.is_valid())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.valid_token().is_some()
    }
}
