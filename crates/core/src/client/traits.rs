use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::session::AccessToken;

/// A 2xx response, body already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    /// Header names are lowercase.
    pub headers: HashMap<String, String>,
    /// Parsed JSON, raw text, or `{}` for an empty body.
    pub data: Value,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
            data,
        }
    }
}

/// Trait abstraction over the wallet REST API's resource endpoints.
///
/// Implementations resolve with [`ApiResponse`] on 2xx, fail with
/// [`CoreError::Http`] carrying the same shape otherwise, and with any
/// other variant when no response was received at all. `url` is a path
/// such as `/api/accounts/3`.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn get_collection(&self, token: &str, url: &str) -> Result<ApiResponse, CoreError>;

    async fn get_resource(&self, token: &str, url: &str) -> Result<ApiResponse, CoreError>;

    async fn create_resource(
        &self,
        token: &str,
        url: &str,
        payload: &Value,
    ) -> Result<ApiResponse, CoreError>;

    async fn edit_resource(
        &self,
        token: &str,
        url: &str,
        payload: &Value,
    ) -> Result<ApiResponse, CoreError>;

    async fn remove_resource(&self, token: &str, url: &str) -> Result<ApiResponse, CoreError>;
}

/// Result of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub user: Value,
    pub token: AccessToken,
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn login(&self, login: &str, password: &str) -> Result<LoginResponse, CoreError>;
}
