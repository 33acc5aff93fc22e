//! HTTP client for the vendor backend.
//!
//! # Responsibilities
//! - Attach the static `x-api-key` header to every request
//! - Turn non-2xx responses into [`ApiError::Status`]
//! - Record one metric per call, labelled by route
//!
//! # Design Decisions
//! - Bodies are read as text first so error bodies can be kept verbatim
//! - Status-sensitive endpoints get the raw status back and check it
//!   themselves

use alloy::primitives::Address;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::observability::metrics;

pub const API_KEY_HEADER: &str = "x-api-key";

/// `{ "data": T }` wrapper used by most endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
}

impl<T> DataEnvelope<T> {
    /// Unwrap `data`, or fail with `missing` as the message.
    pub fn require(self, missing: &str) -> ApiResult<T> {
        self.data
            .ok_or_else(|| ApiError::MissingData(missing.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct VendorClient {
    http: reqwest::Client,
    base_url: String,
}

impl VendorClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        if config.api_key.is_empty() {
            return Err(ApiError::Validation("API key is required".to_string()));
        }
        if config.base_url.is_empty() {
            return Err(ApiError::Validation("Base url is required".to_string()));
        }

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| ApiError::Validation(format!("Invalid API key: {}", e)))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, route: &'static str, path: &str) -> ApiResult<T> {
        let (_, body) = self.execute(route, self.http.get(self.url(path))).await?;
        decode(&body)
    }

    /// GET `path` with query parameters and decode the JSON body.
    pub async fn get_with_query<T, Q>(&self, route: &'static str, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(self.url(path)).query(query);
        let (_, body) = self.execute(route, request).await?;
        decode(&body)
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub async fn post<B, T>(&self, route: &'static str, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        let (_, body) = self.execute(route, request).await?;
        decode(&body)
    }

    /// POST and return the 2xx status with the raw body, for endpoints that
    /// require a specific success status.
    pub async fn post_raw<B>(
        &self,
        route: &'static str,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<(StatusCode, String)>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(route, request).await
    }

    async fn execute(&self, route: &'static str, request: RequestBuilder) -> ApiResult<(StatusCode, String)> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_http_request(route, "error");
                tracing::debug!(route, error = %e, "Vendor request failed");
                return Err(ApiError::Http(e));
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            metrics::record_http_request(route, "error");
            ApiError::Http(e)
        })?;

        if !status.is_success() {
            metrics::record_http_request(route, "status");
            tracing::debug!(route, status = status.as_u16(), "Vendor request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
                body,
            });
        }

        metrics::record_http_request(route, "ok");
        Ok((status, body))
    }
}

/// Check a 2xx status against the one an endpoint contract requires.
pub fn expect_status(actual: StatusCode, expected: StatusCode) -> ApiResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(ApiError::UnexpectedStatus {
            expected: expected.as_u16(),
            actual: actual.as_u16(),
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(ApiError::Decode)
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_owned)
}

/// Reject the zero address for a required address argument.
pub fn require_address(address: Address, message: &str) -> ApiResult<()> {
    if address.is_zero() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

/// Reject an empty string for a required id argument.
pub fn require_id(id: &str, message: &str) -> ApiResult<()> {
    if id.trim().is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

/// Reject chain id 0.
pub fn require_chain_id(chain_id: u64, message: &str) -> ApiResult<()> {
    if chain_id == 0 {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}
