//! Transport to the summarization service.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{Result, TldwError},
    session::ChatMessage,
    source::{Origin, SourceKind},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(origin: &Origin) -> Self {
        let input = origin.input.trim().to_string();
        match origin.kind {
            SourceKind::Youtube | SourceKind::Web => Self {
                source: origin.kind,
                url: Some(input),
                text: None,
            },
            SourceKind::Text => Self {
                source: origin.kind,
                url: None,
                text: Some(input),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub url: String,
    pub history: Vec<ChatMessage>,
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Raw, unnormalized analysis payload.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Value>;
    async fn chat(&self, request: &ChatRequest) -> Result<String>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let body = response.json::<Value>().await?;

        if !status.is_success() {
            return Err(backend_error(status, &body));
        }
        Ok(body)
    }
}

/// Map a `{error, detail}` body to an error, falling back to the status code.
pub fn backend_error(status: StatusCode, body: &Value) -> TldwError {
    let code = body["error"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());
    let detail = body["detail"]
        .as_str()
        .map(str::to_string)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();
    TldwError::Backend { code, detail }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Value> {
        self.post("/api/analyze", request).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let body = self.post("/api/chat", request).await?;
        body["answer"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TldwError::Backend {
                code: "invalid_response".to_string(),
                detail: format!("Chat response has no answer: {}", body),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_analyze_request_shape() {
        let video = AnalyzeRequest::new(&Origin::new(SourceKind::Youtube, " https://youtu.be/x "));
        assert_eq!(
            serde_json::to_value(&video).unwrap(),
            json!({ "source": "youtube", "url": "https://youtu.be/x" })
        );

        let text = AnalyzeRequest::new(&Origin::new(SourceKind::Text, "pasted"));
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({ "source": "text", "text": "pasted" })
        );
    }

    #[test]
    fn test_backend_error_from_body() {
        let err = backend_error(
            StatusCode::BAD_REQUEST,
            &json!({ "error": "invalid_url", "detail": "Could not extract YouTube video id" }),
        );
        assert!(matches!(
            err,
            TldwError::Backend { ref code, ref detail }
                if code == "invalid_url" && detail == "Could not extract YouTube video id"
        ));
    }

    #[test]
    fn test_backend_error_without_body() {
        let err = backend_error(StatusCode::INTERNAL_SERVER_ERROR, &Value::Null);
        assert_eq!(
            err.to_string(),
            "Backend rejected the request (500): Internal Server Error"
        );
    }
}
