//! Request and response shapes for the dispatcher.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ClientError;

pub use reqwest::Method;

/// One outgoing call, owned by the caller until handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Target path, or a full URL when it already carries a scheme.
    pub url: String,
    /// HTTP method.
    pub method: Method,
    /// Request payload.
    pub body: RequestBody,
    /// Caller-supplied query parameters.
    pub params: Vec<(String, String)>,
    /// Caller-supplied headers; override the dispatcher's defaults.
    pub headers: Vec<(String, String)>,
    /// Per-request timeout override in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl RequestDescriptor {
    /// Create a descriptor with an empty payload.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: RequestBody::Empty,
            params: Vec::new(),
            headers: Vec::new(),
            timeout_ms: None,
        }
    }

    /// GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST request with a JSON body.
    #[must_use]
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        let mut descriptor = Self::new(Method::POST, url);
        descriptor.body = RequestBody::Json(body);
        descriptor
    }

    /// POST request with a multipart payload.
    #[must_use]
    pub fn post_multipart(url: impl Into<String>, parts: Vec<FilePart>) -> Self {
        let mut descriptor = Self::new(Method::POST, url);
        descriptor.body = RequestBody::Multipart(parts);
        descriptor
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add a header, overriding the dispatcher's default for that name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the default request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Request payload.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// No payload.
    Empty,
    /// JSON payload.
    Json(serde_json::Value),
    /// Multipart file-upload payload. Modeled as data so request building
    /// stays pure; converted to a transport form at send time.
    Multipart(Vec<FilePart>),
}

impl RequestBody {
    /// Whether the payload counts as "present" for parameter placement.
    ///
    /// Mirrors the legacy truthiness check: `null` and empty-string bodies
    /// do not count.
    #[must_use]
    pub fn has_json_payload(&self) -> bool {
        match self {
            Self::Json(value) => !value.is_null() && value.as_str() != Some(""),
            Self::Empty | Self::Multipart(_) => false,
        }
    }
}

/// One part of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub name: String,
    /// Uploaded file name.
    pub file_name: String,
    /// MIME type, when known.
    pub mime: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// A fully built request, ready for the transport.
///
/// Produced by the pure prepare step; carries the final URL (query
/// parameters applied), the effective headers, the body after context
/// merging, and the resolved timeout.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: Url,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl PreparedRequest {
    /// Look up a header by name, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The uniform response shape returned regardless of transport.
///
/// Callers never branch on platform: every response, success or error,
/// arrives in this shape. A non-200 status is data, not an exception.
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, JSON-decoded when possible, raw text otherwise.
    pub data: serde_json::Value,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// The descriptor this response answers.
    pub config: RequestDescriptor,
}

impl NormalizedResponse {
    /// Whether the call succeeded at the HTTP level.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decode the response body into a typed shape.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` when the body does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}
