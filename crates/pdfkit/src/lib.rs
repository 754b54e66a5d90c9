//! PdfKit - AI-friendly tool surface for remote PDF conversion APIs
//!
//! This crate exposes HTML-to-PDF, URL-to-PDF, PDF merge and office
//! document conversion endpoints of a hosted conversion service as tool
//! operations for agent hosts. It does no document processing itself: it
//! shapes requests and normalizes responses.
//!
//! ## Operations
//!
//! Every endpoint is an [`OperationDescriptor`] in the [`OperationRegistry`].
//! A single adapter executes any descriptor:
//!
//! - [`Tool::call`] returns a structured `Result<ConvertResponse, ConvertError>`
//! - [`Tool::invoke`] flattens the same outcome into one string and never fails
//!
//! ## Configuration
//!
//! Credentials come from `API_BASE_URL` / `API_BEARER_TOKEN`, falling back to
//! `~/.api/config.json` (`baseURL`, `bearerToken`). They are resolved again on
//! every call. Pass a [`Config`] to [`ToolBuilder::config`] to inject them
//! instead.

pub mod client;
pub mod config;
mod error;
pub mod normalize;
pub mod operations;
mod tool;
mod types;

pub use client::ConvertOptions;
pub use config::{Config, ConfigSnapshot, ConfigSource, EnvConfigSource};
pub use error::{ConvertError, ErrorKind, MISSING_CONFIG_MESSAGE};
pub use normalize::{ConvertResponse, ErrorLabels, ResponseBody};
pub use operations::{OperationDescriptor, OperationRegistry, OPERATIONS};
pub use tool::{Tool, ToolBuilder};
pub use types::{
    to_args, HtmlToPdfRequest, HttpMethod, MergeRequest, OfficeConvertRequest, OperationArgs,
    UrlToPdfQuery, UrlToPdfRequest,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Everruns PdfKit/1.0";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Converts HTML, web pages, office documents and images to PDF, and merges PDFs, through a hosted conversion API.

- HTML and URL rendering with wkhtmltopdf or headless Chrome
- Office documents and images through LibreOffice
- Merging several PDFs into one
- Every call returns a single text result"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# PdfKit Tools

Converts documents to PDF through a hosted conversion API. Each operation is a
separate tool; every tool returns one text result.

## Operations
- `post_wkhtmltopdf_html`: raw HTML to PDF (wkhtmltopdf). Fields: fileName, html, inlinePdf, options
- `get_wkhtmltopdf_url`: URL to PDF (wkhtmltopdf, query string). Fields: url, output
- `post_wkhtmltopdf_url`: URL to PDF (wkhtmltopdf). Fields: url, fileName, inlinePdf, options
- `post_merge`: merge PDFs. Fields: fileName, inlinePdf, urls
- `post_libreoffice_convert`: office document or image to PDF. Fields: fileName, url, inlinePdf
- `post_chrome_url`: URL to PDF (headless Chrome). Fields: url, fileName, inlinePdf, options
- `get_chrome_url`: URL to PDF (headless Chrome, query string). Fields: url, output
- `post_chrome_html`: raw HTML to PDF (headless Chrome). Fields: fileName, html, inlinePdf, options

All values are strings and are passed through unchanged.

## Configuration
- `API_BASE_URL`: base URL of the conversion service
- `API_BEARER_TOKEN`: bearer token
- Fallback: `~/.api/config.json` with `baseURL` and `bearerToken`

The `config://settings` resource shows the active base URL; the token is
always masked.

## Examples

### Render HTML
```json
{"html": "<h1>Invoice</h1>", "fileName": "invoice.pdf", "inlinePdf": "true"}
```

### Merge PDFs
```json
{"urls": "[\"https://example.com/a.pdf\",\"https://example.com/b.pdf\"]", "fileName": "merged.pdf"}
```

## Results
- Success: the service response as pretty-printed JSON, or the raw body if it is not JSON
- HTTP error: `Failed to read response body: ...` (POST tools) or `Failed to format JSON: ...` (GET tools)
- Network error: `Failed to create request: ...` (POST tools) or `Request failed: ...` (GET tools),
  with `Connection error` or `Request timeout` where applicable
- Missing configuration: `Error: Missing API configuration. ...`
"#;
