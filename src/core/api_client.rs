//! Client for the remote metadata-generation service.
//!
//! All HTTP traffic to the service goes through the `MetadataApi` trait so the
//! controller can be driven by a test double.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use super::{CoreError, Metadata, Result, TreeNode};

/// Path of the generation endpoint, relative to the service base URL.
pub const GENERATE_PATH: &str = "/api/generate";

/// The JSON body posted to the generation endpoint.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub tree: &'a TreeNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'a str>,
}

#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Sends `tree` to the service and returns the metadata it generated.
    async fn generate_metadata(&self, tree: &TreeNode) -> Result<Metadata>;
}

/// The production `MetadataApi`, backed by `reqwest`.
pub struct HttpMetadataClient {
    client: reqwest::Client,
    endpoint: String,
    hint: Option<String>,
}

impl HttpMetadataClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("folder-metadata/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Transport {
                status: None,
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH),
            hint: None,
        })
    }

    /// Attaches a free-form hint that is sent alongside the tree.
    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint.filter(|h| !h.trim().is_empty());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MetadataApi for HttpMetadataClient {
    async fn generate_metadata(&self, tree: &TreeNode) -> Result<Metadata> {
        let request = GenerateRequest {
            tree,
            hint: self.hint.as_deref(),
        };

        tracing::info!(
            "Requesting metadata from {} for {} files",
            self.endpoint,
            tree.file_count()
        );

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!("Metadata service answered {} ({} bytes)", status, body.len());
        interpret_response(status, &body)
    }
}

/// Turns a raw service response into metadata or a classified error.
///
/// A non-success status is a transport failure whatever the body says. A
/// success body whose `error` field is set to any truthy value is an
/// application error.
pub fn interpret_response(status: StatusCode, body: &[u8]) -> Result<Metadata> {
    if !status.is_success() {
        return Err(CoreError::from_status(status));
    }

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| CoreError::Transport {
            status: Some(status.as_u16()),
            message: format!("Invalid response body: {e}"),
        })?;

    if let Some(message) = value.get("error").and_then(error_message) {
        return Err(CoreError::Application(message));
    }

    serde_json::from_value(value).map_err(|e| CoreError::Transport {
        status: Some(status.as_u16()),
        message: format!("Unexpected response shape: {e}"),
    })
}

/// The message carried by an `error` field, or `None` when the field is falsy
/// (`null`, `false`, `0` or `""`).
fn error_message(error: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_status_is_transport_failure() {
        let err = interpret_response(StatusCode::INTERNAL_SERVER_ERROR, b"{\"title\":\"x\"}")
            .unwrap_err();
        assert!(matches!(err, CoreError::Transport { status: Some(500), .. }));
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn error_field_is_application_failure() {
        let err = interpret_response(StatusCode::OK, br#"{"error":"bad tree"}"#).unwrap_err();
        match err {
            CoreError::Application(message) => assert_eq!(message, "bad tree"),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn non_string_error_field_is_application_failure() {
        let err = interpret_response(StatusCode::OK, br#"{"error":{"message":"bad tree"}}"#)
            .unwrap_err();
        match err {
            CoreError::Application(message) => assert_eq!(message, r#"{"message":"bad tree"}"#),
            other => panic!("expected application error, got {other:?}"),
        }

        let err = interpret_response(StatusCode::OK, br#"{"error":true}"#).unwrap_err();
        assert!(matches!(err, CoreError::Application(ref m) if m == "true"), "{err:?}");
    }

    #[test]
    fn falsy_error_field_is_not_a_failure() {
        for body in [
            r#"{"title":"Docs","error":null}"#,
            r#"{"title":"Docs","error":false}"#,
            r#"{"title":"Docs","error":""}"#,
            r#"{"title":"Docs","error":0}"#,
        ] {
            let metadata = interpret_response(StatusCode::OK, body.as_bytes()).unwrap();
            assert_eq!(metadata.title.as_deref(), Some("Docs"), "{body}");
        }
    }

    #[test]
    fn success_body_is_returned_unchanged() {
        let metadata =
            interpret_response(StatusCode::OK, br#"{"title":"Docs","tags":["a"]}"#).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Docs"));
        assert_eq!(metadata.tags().to_vec(), vec!["a"]);
        assert!(metadata.description.is_none());
        assert!(metadata.files.is_none());
    }

    #[test]
    fn malformed_body_is_transport_failure() {
        let err = interpret_response(StatusCode::OK, b"<html>").unwrap_err();
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn request_omits_missing_hint() {
        let tree = TreeNode::Folder {
            name: "/".to_string(),
            children: Vec::new(),
        };
        let body = serde_json::to_value(GenerateRequest {
            tree: &tree,
            hint: None,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "tree": { "type": "folder", "name": "/", "children": [] } })
        );
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = HttpMetadataClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/api/generate");
    }
}
