//! REST API Wrappers
//!
//! Frontend bindings to the backend, organized by domain. Every call is a
//! JSON request with the bearer token from local storage.

mod auth;
mod admin;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::storage;

pub use auth::*;
pub use admin::*;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("No backend configured")]
    Offline,
    #[error("Not signed in")]
    MissingToken,
    #[error("Network error: {0}")]
    Network(String),
    #[error("{message} ({status})")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The backend could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Offline | ApiError::Network(_))
    }
}

/// Error body sent by the backend: `{"error": "...", "message": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Encode one path segment
pub fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base = config.api_base_url.clone().ok_or(ApiError::Offline)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    fn request(&self, method: Method, path: &str, authed: bool) -> Result<RequestBuilder, ApiError> {
        let url = format!("{}{}", self.base, path);
        let builder = self.http.request(method, url);
        if !authed {
            return Ok(builder);
        }
        let token = storage::get(storage::TOKEN_KEY).ok_or(ApiError::MissingToken)?;
        Ok(builder.bearer_auth(token))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let rb = self.request(Method::GET, path, true)?;
        decode(send(rb).await?).await
    }

    pub async fn get_query<Q: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, query: &Q) -> Result<T, ApiError> {
        let rb = self.request(Method::GET, path, true)?.query(query);
        decode(send(rb).await?).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let rb = self.request(Method::POST, path, true)?.json(body);
        decode(send(rb).await?).await
    }

    /// POST without a bearer token (login, register)
    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let rb = self.request(Method::POST, path, false)?.json(body);
        decode(send(rb).await?).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let rb = self.request(Method::PUT, path, true)?.json(body);
        decode(send(rb).await?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let rb = self.request(Method::DELETE, path, true)?;
        send(rb).await.map(|_| ())
    }
}

async fn send(rb: RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let response = rb.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| reason(status));
    log::warn!("[API] {} {}", status.as_u16(), message);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
