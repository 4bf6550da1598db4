//! Executes call specs against the API under test
//!
//! The executor never returns an error to its caller. Anything that goes
//! wrong while building, sending, or reading a request becomes a failed
//! `CallResult`.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

use crate::common::{Error, Result};
use crate::session::Credentials;

use super::types::{Auth, CallResult, CallSpec};

/// HTTP client bound to one API base URL
#[derive(Debug, Clone)]
pub struct Executor {
    client: reqwest::Client,
    base_url: String,
}

impl Executor {
    /// Create an executor. `timeout` of `None` keeps the transport default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("lostfound-apitest");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint onto the base URL with exactly one slash
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Issue one call and classify the response
    pub async fn execute(&self, spec: &CallSpec, credentials: &Credentials) -> CallResult {
        let url = self.url(&spec.endpoint);

        let response = match self.send(spec, &url, credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%url, error = %e, "request did not complete");
                return CallResult::transport_failure(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(%url, status, error = %e, "failed to read response body");
                return CallResult::body_read_failure(status, e.to_string());
            }
        };

        tracing::debug!(%url, status, bytes = text.len(), "response received");
        CallResult::from_response(spec.expected_status, status, &text)
    }

    async fn send(
        &self,
        spec: &CallSpec,
        url: &str,
        credentials: &Credentials,
    ) -> Result<reqwest::Response> {
        let headers = build_headers(spec, credentials)?;
        tracing::debug!(
            method = %spec.method,
            %url,
            headers = ?headers.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
            "sending request"
        );

        let mut request = self.client.request(spec.method.into(), url).headers(headers);

        if spec.is_upload() {
            request = request.multipart(build_form(spec)?);
        } else if let Some(payload) = &spec.payload {
            request = request.body(serde_json::to_vec(payload)?);
        }

        Ok(request.send().await?)
    }
}

/// Resolve the headers a call is sent with
///
/// Starts from `Content-Type: application/json`, overlays the call's own
/// headers, then applies its auth selection. Uploads drop `Content-Type`
/// so the multipart boundary can be filled in by the transport.
pub fn build_headers(spec: &CallSpec, credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &spec.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::invalid_header(name, e))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| Error::invalid_header(name, e))?;
        headers.insert(header_name, header_value);
    }

    if let Some(token) = bearer_token(spec, credentials) {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::invalid_header("Authorization", e))?;
        headers.insert(AUTHORIZATION, value);
    }

    if spec.is_upload() {
        headers.remove(CONTENT_TYPE);
    }

    Ok(headers)
}

fn bearer_token<'a>(spec: &CallSpec, credentials: &'a Credentials) -> Option<&'a str> {
    match spec.auth {
        Auth::Default if spec.headers.is_empty() => credentials.admin(),
        Auth::Default | Auth::Anonymous => None,
        Auth::As(role) => credentials.get(role),
    }
}

fn build_form(spec: &CallSpec) -> Result<Form> {
    let mut form = Form::new();

    if let Some(Value::Object(fields)) = &spec.payload {
        for (key, value) in fields {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form = form.text(key.clone(), text);
        }
    }

    for attachment in &spec.attachments {
        let part = Part::bytes(attachment.data.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.mime)?;
        form = form.part(attachment.field.clone(), part);
    }

    Ok(form)
}
