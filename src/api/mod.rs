//! HTTP client for the bank REST API
//!
//! This module owns the request/response boundary:
//! - URL building against the configured base URL
//! - JSON bodies in and out
//! - Status-to-error mapping
//! - Running the interceptor chain on every call

pub mod interceptor;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use interceptor::{AuthInterceptor, Interceptor};

/// API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session expired or not authorized: {0}")]
    Unauthorized(String),

    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Validation(String),

    #[error("Session storage error: {0}")]
    Session(#[from] crate::session::SessionError),
}

impl ApiError {
    /// Map a non-success response to an error, keeping the backend's message
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized(message)
        } else {
            ApiError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// HTTP status carried by the error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Gateway errors look like `{"status": "error", "message": "..."}`
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string()),
        Err(_) => Some(body.to_string()),
    }
}

/// Thin JSON client with an interceptor chain
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ApiClient {
    /// Create a client; `timeout` of `None` means requests never time out
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            interceptors: Vec::new(),
        })
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        for interceptor in &self.interceptors {
            request = interceptor.on_request(request);
        }

        let result = execute(request).await;

        if let Err(error) = &result {
            for interceptor in &self.interceptors {
                interceptor.on_error(error);
            }
        }

        result
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, &body));
    }

    let bytes = response.bytes().await?;
    let payload: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

    serde_json::from_slice(payload).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
