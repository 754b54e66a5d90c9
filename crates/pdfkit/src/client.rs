//! HTTP request adapter for PdfKit
//!
//! One generic adapter executes every [`OperationDescriptor`]: check config,
//! route arguments, send a single request, classify the response. No retry
//! and no backoff; the only deadline is the optional per-call timeout.

use crate::config::Config;
use crate::error::ConvertError;
use crate::normalize::{ConvertResponse, ResponseBody};
use crate::operations::OperationDescriptor;
use crate::types::{HttpMethod, OperationArgs};
use crate::DEFAULT_USER_AGENT;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Per-call options that can be configured via tool builder
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Deadline for the whole call; `None` means no deadline
    pub timeout: Option<Duration>,
}

/// Execute one operation against the configured service
pub async fn execute(
    descriptor: &OperationDescriptor,
    args: &OperationArgs,
    config: &Config,
    options: &ConvertOptions,
) -> Result<ConvertResponse, ConvertError> {
    let (base_url, token) = config.credentials().ok_or(ConvertError::MissingConfig)?;

    log_ignored_args(descriptor, args);

    let url = build_url(base_url, descriptor.path, &query_pairs(descriptor, args))?;
    let headers = build_headers(token, options)?;

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(ConvertError::ClientBuildError)?;

    let mut http_request = client.request(descriptor.method.as_reqwest(), url.clone());
    if descriptor.method == HttpMethod::Post {
        let body = serde_json::to_vec(&body_object(descriptor, args))
            .map_err(|e| ConvertError::Unexpected(e.to_string()))?;
        http_request = http_request.body(body);
    }

    debug!(operation = descriptor.name, method = %descriptor.method, url = %url, "Sending request");

    let response = http_request
        .send()
        .await
        .map_err(ConvertError::from_reqwest)?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let body = response
        .bytes()
        .await
        .map_err(ConvertError::from_reqwest)?;

    if status >= 400 {
        warn!(operation = descriptor.name, status, "Conversion service returned an error");
        return Err(ConvertError::HttpStatus {
            status,
            body: ResponseBody::new(body),
        });
    }

    debug!(operation = descriptor.name, status, size = body.len(), "Received response");

    Ok(ConvertResponse {
        status_code: status,
        content_type,
        body: ResponseBody::new(body),
    })
}

/// Query pairs for a GET descriptor
///
/// Only non-empty string values are sent; anything else is silently omitted.
pub fn query_pairs<'a>(
    descriptor: &OperationDescriptor,
    args: &'a OperationArgs,
) -> Vec<(&'static str, &'a str)> {
    descriptor
        .query_fields
        .iter()
        .filter_map(|field| match args.get(*field) {
            Some(Value::String(s)) if !s.is_empty() => Some((*field, s.as_str())),
            _ => None,
        })
        .collect()
}

/// JSON body for a POST descriptor
///
/// Keeps descriptor field order. Absent and `null` values are dropped;
/// every other value, empty strings included, passes through untouched.
pub fn body_object(descriptor: &OperationDescriptor, args: &OperationArgs) -> Map<String, Value> {
    descriptor
        .body_fields
        .iter()
        .filter_map(|field| match args.get(*field) {
            None | Some(Value::Null) => None,
            Some(value) => Some((field.to_string(), value.clone())),
        })
        .collect()
}

/// Join base URL and path, then append query pairs
pub fn build_url(
    base_url: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<Url, ConvertError> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
    let mut url = Url::parse(&joined).map_err(|e| ConvertError::InvalidUrl(e.to_string()))?;

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter().copied());
    }

    Ok(url)
}

fn build_headers(token: &str, options: &ConvertOptions) -> Result<HeaderMap, ConvertError> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ConvertError::RequestError("Invalid bearer token".to_string()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );

    Ok(headers)
}

fn log_ignored_args(descriptor: &OperationDescriptor, args: &OperationArgs) {
    for key in args.keys() {
        let known = descriptor.query_fields.contains(&key.as_str())
            || descriptor.body_fields.contains(&key.as_str());
        if !known {
            debug!(operation = descriptor.name, argument = %key, "Ignoring unknown argument");
        }
    }
}
