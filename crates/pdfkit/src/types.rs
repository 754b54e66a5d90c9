//! Core types for PdfKit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments for one operation call, keyed by wire field name
pub type OperationArgs = Map<String, Value>;

/// HTTP method of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters go into the query string
    Get,
    /// Parameters go into a JSON body
    Post,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Convert raw HTML to PDF
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HtmlToPdfRequest {
    /// Name of the generated PDF file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Raw HTML to render
    pub html: String,

    /// Open the PDF in the browser instead of downloading it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_pdf: Option<String>,

    /// Renderer options, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl HtmlToPdfRequest {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn inline_pdf(mut self, inline: impl Into<String>) -> Self {
        self.inline_pdf = Some(inline.into());
        self
    }

    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}

/// Convert the page at a URL to PDF
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlToPdfRequest {
    /// Url of the page to convert to PDF. Must start with http:// or https://.
    pub url: String,

    /// Name of the generated PDF file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Open the PDF in the browser instead of downloading it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_pdf: Option<String>,

    /// Renderer options, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl UrlToPdfRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn inline_pdf(mut self, inline: impl Into<String>) -> Self {
        self.inline_pdf = Some(inline.into());
        self
    }

    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}

/// Query-string form of URL to PDF
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UrlToPdfQuery {
    /// Url of the page to convert to PDF. Must start with http:// or https://.
    pub url: String,

    /// Specify output=json to receive a JSON output. Defaults to PDF file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl UrlToPdfQuery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output: None,
        }
    }

    /// Ask for a JSON envelope instead of the PDF itself
    pub fn json_output(mut self) -> Self {
        self.output = Some("json".to_string());
        self
    }
}

/// Merge multiple PDFs together
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    /// Name of the merged PDF file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Open the PDF in the browser instead of downloading it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_pdf: Option<String>,

    /// URLs of the PDFs to merge, in order
    pub urls: String,
}

impl MergeRequest {
    pub fn new(urls: impl Into<String>) -> Self {
        Self {
            urls: urls.into(),
            ..Default::default()
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn inline_pdf(mut self, inline: impl Into<String>) -> Self {
        self.inline_pdf = Some(inline.into());
        self
    }
}

/// Convert an office document or image to PDF
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficeConvertRequest {
    /// Name of the generated PDF file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Url of the document or image to convert
    pub url: String,

    /// Open the PDF in the browser instead of downloading it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_pdf: Option<String>,
}

impl OfficeConvertRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn inline_pdf(mut self, inline: impl Into<String>) -> Self {
        self.inline_pdf = Some(inline.into());
        self
    }
}

/// Serialize a typed request into operation arguments
///
/// Returns an empty map if `request` does not serialize to a JSON object.
pub fn to_args<T: Serialize>(request: &T) -> OperationArgs {
    match serde_json::to_value(request) {
        Ok(Value::Object(map)) => map,
        _ => OperationArgs::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Post.as_reqwest(), reqwest::Method::POST);
    }

    #[test]
    fn test_merge_request_args() {
        let args = to_args(
            &MergeRequest::new(r#"["a","b"]"#)
                .file_name("out.pdf")
                .inline_pdf("true"),
        );
        assert_eq!(args["fileName"], "out.pdf");
        assert_eq!(args["inlinePdf"], "true");
        assert_eq!(args["urls"], r#"["a","b"]"#);
    }

    #[test]
    fn test_unset_fields_omitted() {
        let args = to_args(&HtmlToPdfRequest::new("<p>hi</p>"));
        assert_eq!(args.len(), 1);
        assert_eq!(args["html"], "<p>hi</p>");

        let args = to_args(&UrlToPdfQuery::new("https://example.com").json_output());
        assert_eq!(args["output"], "json");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let req: UrlToPdfRequest = serde_json::from_str(
            r#"{"url":"https://example.com","fileName":"page.pdf","inlinePdf":"false"}"#,
        )
        .unwrap();
        assert_eq!(req.file_name.as_deref(), Some("page.pdf"));
        assert_eq!(req.inline_pdf.as_deref(), Some("false"));
        assert!(req.options.is_none());
    }
}
