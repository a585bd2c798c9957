//! HTTP seam
//!
//! The client issues REST calls through [`HttpClient`]; [`ReqwestHttp`] is the
//! production implementation.

use async_trait::async_trait;
use chord_common::{ClientError, ClientResult};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::options::FileAttachment;

/// Header carrying the audit log reason
pub const AUDIT_LOG_REASON_HEADER: &str = "X-Audit-Log-Reason";

/// Fully assembled REST request
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub files: Vec<FileAttachment>,
    pub reason: Option<String>,
}

impl RestRequest {
    /// Header value, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response status and decoded body
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    pub status: u16,
    /// JSON body; non-JSON text is kept as a string value
    pub body: Option<Value>,
}

impl RestResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| ClientError::protocol(format!("Empty response body (status {})", self.status)))?;
        Ok(serde_json::from_value(body)?)
    }

    /// Error text for a failed response
    pub fn error_message(&self) -> String {
        match &self.body {
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| Value::Object(map.clone()).to_string(), str::to_string),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => format!("HTTP {}", self.status),
        }
    }
}

/// Outbound HTTP primitive
///
/// Returns every response the server sends, successful or not; `Err` means the
/// request never completed.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: RestRequest) -> ClientResult<RestResponse>;
}

/// `reqwest` implementation
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttp {
    async fn execute(&self, request: RestRequest) -> ClientResult<RestResponse> {
        let RestRequest {
            method,
            url,
            headers,
            body,
            files,
            reason,
        } = request;

        let mut builder = self.client.request(method, &url);

        for (name, value) in &headers {
            builder = builder.header(name, value);
        }
        if let Some(reason) = reason {
            builder = builder.header(AUDIT_LOG_REASON_HEADER, reason);
        }

        if files.is_empty() {
            if let Some(body) = &body {
                builder = builder.json(body);
            }
        } else {
            builder = builder.multipart(multipart_form(body.as_ref(), files)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::request(None, e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::request(Some(status), e))?;

        let body = if text.is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        };

        tracing::debug!(url = %url, status, "Request completed");
        Ok(RestResponse { status, body })
    }
}

/// `payload_json` plus one `files[n]` part per attachment
fn multipart_form(body: Option<&Value>, files: Vec<FileAttachment>) -> ClientResult<Form> {
    let mut form = Form::new();

    if let Some(body) = body {
        form = form.text("payload_json", body.to_string());
    }

    for (index, file) in files.into_iter().enumerate() {
        let mut part = Part::bytes(file.data).file_name(file.name);
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ClientError::request(None, e))?;
        }
        form = form.part(format!("files[{index}]"), part);
    }

    Ok(form)
}
