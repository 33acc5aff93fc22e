//! Request and response envelopes exchanged with the parent context.
//!
//! Responses are a union discriminated by the `success` boolean, which serde
//! cannot tag on directly, so they round-trip through [`RawResponse`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messaging::request_id::generate_request_id;

/// Version reported in every request's `env`.
pub const SDK_VERSION: &str = "1.0.0";

/// Methods the parent context understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    GetClientFactory,
    AddToTxnBuilder,
    AddAutomation,
    CancelAutomation,
}

/// Environment block attached to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnv {
    pub sdk_version: String,
}

/// Outbound request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope<P = Value> {
    pub id: String,
    pub method: Method,
    pub params: P,
    pub env: RequestEnv,
}

impl<P> RequestEnvelope<P> {
    /// Build a request with a fresh correlation id.
    pub fn new(method: Method, params: P) -> Self {
        Self::with_id(generate_request_id(), method, params)
    }

    /// Build a request with a caller-chosen correlation id.
    pub fn with_id(id: impl Into<String>, method: Method, params: P) -> Self {
        Self {
            id: id.into(),
            method,
            params,
            env: RequestEnv {
                sdk_version: SDK_VERSION.to_string(),
            },
        }
    }
}

/// Inbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResponse", into = "RawResponse")]
pub enum Response {
    Success {
        id: String,
        data: Value,
        version: Option<String>,
    },
    Error {
        id: String,
        error: String,
        version: Option<String>,
    },
}

impl Response {
    pub fn success(id: impl Into<String>, data: Value, version: impl Into<String>) -> Self {
        Response::Success {
            id: id.into(),
            data,
            version: Some(version.into()),
        }
    }

    pub fn error(id: impl Into<String>, error: impl Into<String>, version: impl Into<String>) -> Self {
        Response::Error {
            id: id.into(),
            error: error.into(),
            version: Some(version.into()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Response::Success { id, .. } | Response::Error { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }
}

/// Flat wire form of [`Response`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResponse {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl TryFrom<RawResponse> for Response {
    type Error = String;

    fn try_from(raw: RawResponse) -> Result<Self, String> {
        if raw.success {
            Ok(Response::Success {
                id: raw.id,
                data: raw.data.unwrap_or(Value::Null),
                version: raw.version,
            })
        } else {
            let error = raw
                .error
                .ok_or_else(|| format!("error response {} has no error field", raw.id))?;
            Ok(Response::Error {
                id: raw.id,
                error,
                version: raw.version,
            })
        }
    }
}

impl From<Response> for RawResponse {
    fn from(response: Response) -> Self {
        match response {
            Response::Success { id, data, version } => RawResponse {
                id,
                success: true,
                data: Some(data),
                error: None,
                version,
            },
            Response::Error { id, error, version } => RawResponse {
                id,
                success: false,
                data: None,
                error: Some(error),
                version,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = RequestEnvelope::new(Method::AddToTxnBuilder, json!({"a": 1}));
        let wire = serde_json::to_value(&request).unwrap();

        assert_eq!(wire["method"], "addToTxnBuilder");
        assert_eq!(wire["params"], json!({"a": 1}));
        assert_eq!(wire["env"]["sdkVersion"], SDK_VERSION);
        assert_eq!(wire["id"].as_str().unwrap().len(), 10);
    }

    #[test]
    fn test_fresh_id_per_request() {
        let a = RequestEnvelope::new(Method::GetClientFactory, ());
        let b = RequestEnvelope::new(Method::GetClientFactory, ());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_parse_success_response() {
        let response: Response =
            serde_json::from_value(json!({"id": "abc", "success": true, "data": {"foo": 1}}))
                .unwrap();
        assert_eq!(
            response,
            Response::Success {
                id: "abc".to_string(),
                data: json!({"foo": 1}),
                version: None,
            }
        );
    }

    #[test]
    fn test_parse_error_response() {
        let response: Response = serde_json::from_value(
            json!({"id": "abc", "success": false, "error": "denied", "version": "2.1.0"}),
        )
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.id(), "abc");
        assert!(matches!(response, Response::Error { ref error, .. } if error == "denied"));
    }

    #[test]
    fn test_error_response_requires_error_field() {
        let result: Result<Response, _> =
            serde_json::from_value(json!({"id": "abc", "success": false}));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_constructors_serialize_flat() {
        let wire = serde_json::to_value(Response::error("x1", "boom", "1.0.0")).unwrap();
        assert_eq!(
            wire,
            json!({"id": "x1", "success": false, "error": "boom", "version": "1.0.0"})
        );

        let wire = serde_json::to_value(Response::success("x2", json!([1, 2]), "1.0.0")).unwrap();
        assert_eq!(
            wire,
            json!({"id": "x2", "success": true, "data": [1, 2], "version": "1.0.0"})
        );
    }
}
