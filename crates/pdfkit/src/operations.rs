//! Operation descriptors
//!
//! Design: every remote endpoint is a row in one table. A descriptor says
//! which method and path to use and how arguments are routed (query string
//! or JSON body). The request adapter in [`client`](crate::client) is the
//! only code that executes them.

use crate::normalize::ErrorLabels;
use crate::types::{
    HtmlToPdfRequest, HttpMethod, MergeRequest, OfficeConvertRequest, UrlToPdfQuery,
    UrlToPdfRequest,
};
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};

/// Static definition of one remote operation
#[derive(Debug, Clone, Copy)]
pub struct OperationDescriptor {
    /// Tool name exposed to the host
    pub name: &'static str,
    /// One-line description for the host
    pub description: &'static str,
    /// HTTP method
    pub method: HttpMethod,
    /// Path appended to the base URL
    pub path: &'static str,
    /// Argument names routed to the query string, in order
    pub query_fields: &'static [&'static str],
    /// Argument names routed to the JSON body, in order
    pub body_fields: &'static [&'static str],
    /// Prefixes used when flattening errors
    pub labels: ErrorLabels,
    /// JSON schema of the accepted arguments
    pub input_schema: fn() -> RootSchema,
}

impl OperationDescriptor {
    /// Descriptor for a body-encoded POST operation
    pub const fn post(
        name: &'static str,
        description: &'static str,
        path: &'static str,
        body_fields: &'static [&'static str],
        input_schema: fn() -> RootSchema,
    ) -> Self {
        Self {
            name,
            description,
            method: HttpMethod::Post,
            path,
            query_fields: &[],
            body_fields,
            labels: ErrorLabels::POST,
            input_schema,
        }
    }

    /// Descriptor for a query-string GET operation
    pub const fn get(
        name: &'static str,
        description: &'static str,
        path: &'static str,
        query_fields: &'static [&'static str],
        input_schema: fn() -> RootSchema,
    ) -> Self {
        Self {
            name,
            description,
            method: HttpMethod::Get,
            path,
            query_fields,
            body_fields: &[],
            labels: ErrorLabels::GET,
            input_schema,
        }
    }

    /// Input schema as JSON
    pub fn schema_json(&self) -> serde_json::Value {
        serde_json::to_value((self.input_schema)()).unwrap_or_default()
    }
}

fn schema_of<T: JsonSchema>() -> RootSchema {
    schema_for!(T)
}

const HTML_FIELDS: &[&str] = &["fileName", "html", "inlinePdf", "options"];
const URL_FIELDS: &[&str] = &["url", "fileName", "inlinePdf", "options"];
const URL_QUERY_FIELDS: &[&str] = &["url", "output"];
const MERGE_FIELDS: &[&str] = &["fileName", "inlinePdf", "urls"];
const OFFICE_FIELDS: &[&str] = &["fileName", "url", "inlinePdf"];

/// Built-in conversion operations
pub const OPERATIONS: &[OperationDescriptor] = &[
    OperationDescriptor::post(
        "post_wkhtmltopdf_html",
        "Convert raw HTML to PDF",
        "/wkhtmltopdf/html",
        HTML_FIELDS,
        schema_of::<HtmlToPdfRequest>,
    ),
    OperationDescriptor::get(
        "get_wkhtmltopdf_url",
        "Convert URL to PDF",
        "/wkhtmltopdf/url",
        URL_QUERY_FIELDS,
        schema_of::<UrlToPdfQuery>,
    ),
    OperationDescriptor::post(
        "post_wkhtmltopdf_url",
        "Convert URL to PDF",
        "/wkhtmltopdf/url",
        URL_FIELDS,
        schema_of::<UrlToPdfRequest>,
    ),
    OperationDescriptor::post(
        "post_merge",
        "Merge multiple PDFs together",
        "/merge",
        MERGE_FIELDS,
        schema_of::<MergeRequest>,
    ),
    OperationDescriptor::post(
        "post_libreoffice_convert",
        "Convert office document or image to PDF",
        "/libreoffice/convert",
        OFFICE_FIELDS,
        schema_of::<OfficeConvertRequest>,
    ),
    OperationDescriptor::post(
        "post_chrome_url",
        "Convert URL to PDF",
        "/chrome/url",
        URL_FIELDS,
        schema_of::<UrlToPdfRequest>,
    ),
    OperationDescriptor::get(
        "get_chrome_url",
        "Convert URL to PDF",
        "/chrome/url",
        URL_QUERY_FIELDS,
        schema_of::<UrlToPdfQuery>,
    ),
    OperationDescriptor::post(
        "post_chrome_html",
        "Convert raw HTML to PDF",
        "/chrome/html",
        HTML_FIELDS,
        schema_of::<HtmlToPdfRequest>,
    ),
];

/// Registry of operations, looked up by tool name
///
/// Keeps registration order so listings are stable.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    operations: Vec<OperationDescriptor>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Create a registry with the built-in operations
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for descriptor in OPERATIONS {
            registry.register(*descriptor);
        }
        registry
    }

    /// Register an operation
    ///
    /// Replaces an existing operation with the same name in place.
    pub fn register(&mut self, descriptor: OperationDescriptor) {
        match self
            .operations
            .iter_mut()
            .find(|existing| existing.name == descriptor.name)
        {
            Some(existing) => *existing = descriptor,
            None => self.operations.push(descriptor),
        }
    }

    /// Look up an operation by name
    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
