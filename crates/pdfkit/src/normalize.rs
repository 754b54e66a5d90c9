//! Response normalization
//!
//! Every invocation ends in exactly one string. This module owns the
//! flattening from `Result<ConvertResponse, ConvertError>` to that string;
//! everything before it stays structured.

use crate::error::ConvertError;
use crate::operations::OperationDescriptor;
use bytes::Bytes;
use serde_json::Value;

/// Prefixes used when flattening errors for one descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLabels {
    /// Prefix for responses with status >= 400
    pub http: &'static str,
    /// Prefix for transport-level failures
    pub transport: &'static str,
}

impl ErrorLabels {
    /// Labels used by body-encoded (POST) operations
    pub const POST: ErrorLabels = ErrorLabels {
        http: "Failed to read response body",
        transport: "Failed to create request",
    };

    /// Labels used by query-string (GET) operations
    pub const GET: ErrorLabels = ErrorLabels {
        http: "Failed to format JSON",
        transport: "Request failed",
    };
}

/// Raw response body, rendered as pretty JSON when it parses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBody(Bytes);

impl ResponseBody {
    pub fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.0).ok()
    }

    /// Body as (lossy) UTF-8 text, untouched otherwise
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Pretty-printed JSON if the body parses, raw text otherwise
    pub fn render(&self) -> String {
        match self.json() {
            Some(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| self.text()),
            None => self.text(),
        }
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<&'static str> for ResponseBody {
    fn from(s: &'static str) -> Self {
        Self(Bytes::from_static(s.as_bytes()))
    }
}

impl From<String> for ResponseBody {
    fn from(s: String) -> Self {
        Self(Bytes::from(s))
    }
}

/// Successful (status < 400) response from the conversion service
#[derive(Debug, Clone, Default)]
pub struct ConvertResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Response body
    pub body: ResponseBody,
}

impl ConvertResponse {
    /// Parse the body as JSON
    pub fn json(&self) -> Option<Value> {
        self.body.json()
    }

    /// The flattened success text
    pub fn to_text(&self) -> String {
        self.body.render()
    }
}

/// Flatten an error into the string contract, using the descriptor's labels
pub fn render_error(labels: ErrorLabels, err: &ConvertError) -> String {
    match err {
        ConvertError::MissingConfig => err.to_string(),
        ConvertError::UnknownOperation(_) => format!("Error: {}", err),
        ConvertError::HttpStatus { body, .. } => format!("{}: {}", labels.http, body.render()),
        ConvertError::ClientBuildError(_)
        | ConvertError::InvalidUrl(_)
        | ConvertError::ConnectError(_)
        | ConvertError::Timeout(_)
        | ConvertError::RequestError(_) => format!("{}: {}", labels.transport, err),
        ConvertError::Unexpected(msg) => format!("Unexpected error: {}", msg),
    }
}

/// Flatten the outcome of one invocation
pub fn render(
    descriptor: &OperationDescriptor,
    outcome: &Result<ConvertResponse, ConvertError>,
) -> String {
    match outcome {
        Ok(response) => response.to_text(),
        Err(err) => render_error(descriptor.labels, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_keeps_key_order() {
        let body = ResponseBody::from(r#"{"success":true,"pdf":"https://x/y.pdf","mbIn":0.1}"#);
        assert_eq!(
            body.render(),
            "{\n  \"success\": true,\n  \"pdf\": \"https://x/y.pdf\",\n  \"mbIn\": 0.1\n}"
        );
    }

    #[test]
    fn test_render_non_json_verbatim() {
        let body = ResponseBody::from("%PDF-1.7 not json");
        assert_eq!(body.render(), "%PDF-1.7 not json");

        let empty = ResponseBody::default();
        assert_eq!(empty.render(), "");
    }

    #[test]
    fn test_render_binary_lossy() {
        let body = ResponseBody::new(Bytes::from_static(&[0x25, 0x50, 0x44, 0x46, 0xFF]));
        assert_eq!(body.render(), "%PDF\u{FFFD}");
    }

    #[test]
    fn test_render_http_error_labels() {
        let err = ConvertError::HttpStatus {
            status: 401,
            body: ResponseBody::from(r#"{"success":false,"reason":"bad key"}"#),
        };
        assert_eq!(
            render_error(ErrorLabels::POST, &err),
            "Failed to read response body: {\n  \"success\": false,\n  \"reason\": \"bad key\"\n}"
        );

        let err = ConvertError::HttpStatus {
            status: 502,
            body: ResponseBody::from("Bad Gateway"),
        };
        assert_eq!(
            render_error(ErrorLabels::GET, &err),
            "Failed to format JSON: Bad Gateway"
        );
    }

    #[test]
    fn test_render_other_errors() {
        assert_eq!(
            render_error(ErrorLabels::POST, &ConvertError::MissingConfig),
            crate::error::MISSING_CONFIG_MESSAGE
        );
        assert_eq!(
            render_error(
                ErrorLabels::GET,
                &ConvertError::RequestError("stream closed".to_string())
            ),
            "Request failed: stream closed"
        );
        assert_eq!(
            render_error(
                ErrorLabels::POST,
                &ConvertError::Unexpected("oops".to_string())
            ),
            "Unexpected error: oops"
        );
        assert_eq!(
            render_error(
                ErrorLabels::POST,
                &ConvertError::UnknownOperation("nope".to_string())
            ),
            "Error: Unknown operation: nope"
        );
    }
}
