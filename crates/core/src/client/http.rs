use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use crate::errors::{CoreError, HttpFailure};
use crate::models::session::AccessToken;

use super::traits::{ApiResponse, AuthClient, LoginResponse, ResourceClient};

pub const LOGIN_PATH: &str = "/auth/login";

/// Request and response header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-ACCESS-TOKEN";

/// Response header with the token expiry, epoch milliseconds.
pub const ACCESS_TOKEN_EXPIRE_HEADER: &str = "X-ACCESS-TOKEN-EXPIRE";

/// Correlation id sent with every request.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// reqwest-backed client for the wallet REST API.
///
/// - **Auth**: `X-ACCESS-TOKEN` header on every resource call.
/// - **Bodies**: JSON in, JSON out; non-JSON error bodies are kept as text.
/// - **Retries**: none. A failed request is reported once.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path; absolute inputs pass through.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        payload: Option<&Value>,
    ) -> Result<ApiResponse, CoreError> {
        let request_id = Uuid::new_v4();
        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = token {
            request = request.header(ACCESS_TOKEN_HEADER, token);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = collect_headers(response.headers());
        let text = response.text().await?;

        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            %request_id,
            "api request finished"
        );

        let data = parse_body(&text);
        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                status_text,
                headers,
                data,
            })
        } else {
            Err(CoreError::Http(HttpFailure {
                status: status.as_u16(),
                status_text,
                headers,
                data,
            }))
        }
    }
}

/// Decode a response body: JSON if it parses, the raw text otherwise,
/// `{}` when empty.
#[must_use]
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Build the access token from login response headers.
pub fn token_from_headers(headers: &HashMap<String, String>) -> Result<AccessToken, CoreError> {
    let value = headers
        .get(&ACCESS_TOKEN_HEADER.to_lowercase())
        .ok_or_else(|| CoreError::Payload(format!("missing {ACCESS_TOKEN_HEADER} header")))?;
    let expire = headers
        .get(&ACCESS_TOKEN_EXPIRE_HEADER.to_lowercase())
        .ok_or_else(|| CoreError::Payload(format!("missing {ACCESS_TOKEN_EXPIRE_HEADER} header")))?
        .trim()
        .parse::<i64>()
        .map_err(|e| CoreError::Payload(format!("bad {ACCESS_TOKEN_EXPIRE_HEADER} header: {e}")))?;
    AccessToken::new(value.clone(), expire)
}

#[async_trait]
impl ResourceClient for HttpApiClient {
    async fn get_collection(&self, token: &str, url: &str) -> Result<ApiResponse, CoreError> {
        self.send(Method::GET, url, Some(token), None).await
    }

    async fn get_resource(&self, token: &str, url: &str) -> Result<ApiResponse, CoreError> {
        self.send(Method::GET, url, Some(token), None).await
    }

    async fn create_resource(
        &self,
        token: &str,
        url: &str,
        payload: &Value,
    ) -> Result<ApiResponse, CoreError> {
        self.send(Method::POST, url, Some(token), Some(payload)).await
    }

    async fn edit_resource(
        &self,
        token: &str,
        url: &str,
        payload: &Value,
    ) -> Result<ApiResponse, CoreError> {
        self.send(Method::PUT, url, Some(token), Some(payload)).await
    }

    async fn remove_resource(&self, token: &str, url: &str) -> Result<ApiResponse, CoreError> {
        self.send(Method::DELETE, url, Some(token), None).await
    }
}

#[async_trait]
impl AuthClient for HttpApiClient {
    async fn login(&self, login: &str, password: &str) -> Result<LoginResponse, CoreError> {
        let body = json!({ "login": login, "password": password });
        let response = self.send(Method::POST, LOGIN_PATH, None, Some(&body)).await?;
        let token = token_from_headers(&response.headers)?;
        let user = response.data.get("user").cloned().unwrap_or(Value::Null);
        Ok(LoginResponse { user, token })
    }
}
