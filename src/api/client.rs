//! HTTP plumbing shared by every gateway implementation.
//!
//! Response status codes are folded into [`ApiError`] here so the per-entity
//! modules only deal with typed payloads.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};

/// Wrapper used by the backend for single-resource responses.
#[derive(Debug, serde::Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Error body returned by the backend on rejected requests.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin wrapper around `reqwest::Client` bound to the backend base URL.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    /// Build a client with the given base URL and per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, token: Option<&str>, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute(builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        check_status(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        Ok(response.json::<T>().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> ApiResult<T> {
        let response = Self::execute(self.builder(Method::GET, Some(token), path)).await?;
        Self::decode(response).await
    }

    pub async fn get_json_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        token: &str,
        path: &str,
        query: &Q,
    ) -> ApiResult<T> {
        let builder = self.builder(Method::GET, Some(token), path).query(query);
        let response = Self::execute(builder).await?;
        Self::decode(response).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        token: Option<&str>,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.builder(Method::POST, token, path).json(body);
        let response = Self::execute(builder).await?;
        Self::decode(response).await
    }

    pub async fn post_json_empty<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> ApiResult<T> {
        let response = Self::execute(self.builder(Method::POST, Some(token), path)).await?;
        Self::decode(response).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.builder(Method::PUT, Some(token), path).json(body);
        let response = Self::execute(builder).await?;
        Self::decode(response).await
    }

    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.builder(Method::PATCH, Some(token), path).json(body);
        let response = Self::execute(builder).await?;
        Self::decode(response).await
    }

    pub async fn patch_json_empty<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> ApiResult<T> {
        let response = Self::execute(self.builder(Method::PATCH, Some(token), path)).await?;
        Self::decode(response).await
    }

    /// POST whose response body does not matter, e.g. logout.
    pub async fn post_unit(&self, token: &str, path: &str) -> ApiResult<()> {
        Self::execute(self.builder(Method::POST, Some(token), path)).await?;
        Ok(())
    }

    /// DELETE whose response body does not matter.
    pub async fn delete_unit(&self, token: &str, path: &str) -> ApiResult<()> {
        Self::execute(self.builder(Method::DELETE, Some(token), path)).await?;
        Ok(())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Passes successful responses through and folds the rest into [`ApiError`].
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = if wants_message(status) {
        let bytes = response.bytes().await.unwrap_or_default();
        extract_message(&bytes)
    } else {
        None
    };
    Err(status_error(status, message))
}

fn wants_message(status: StatusCode) -> bool {
    status.is_client_error()
        && status != StatusCode::UNAUTHORIZED
        && status != StatusCode::NOT_FOUND
}

fn extract_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.message)
}

fn status_error(status: StatusCode, message: Option<String>) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        s if s.is_client_error() => ApiError::Validation(message.unwrap_or_else(|| {
            s.canonical_reason().unwrap_or("request failed").to_string()
        })),
        s => ApiError::Server(s.as_u16()),
    }
}
