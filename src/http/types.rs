//! Call descriptions and their outcomes

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::common::Error;
use crate::session::Role;

/// HTTP methods the harness knows how to issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Which bearer token, if any, a call carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Auth {
    /// Admin token when one is stored and the call has no header overrides
    #[default]
    Default,
    /// Never attach a token
    Anonymous,
    /// Attach the stored token for this role, if any
    As(Role),
}

/// A file sent as one part of a multipart upload
#[derive(Debug, Clone)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            data,
        }
    }
}

/// One HTTP call to issue
///
/// Built with the consuming `with_*` methods and handed to the executor.
#[derive(Debug, Clone)]
pub struct CallSpec {
    pub name: String,
    pub method: Method,
    pub endpoint: String,
    pub expected_status: u16,
    pub payload: Option<Value>,
    pub attachments: Vec<Attachment>,
    pub headers: Vec<(String, String)>,
    pub auth: Auth,
}

impl CallSpec {
    pub fn new(
        name: impl Into<String>,
        method: Method,
        endpoint: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            endpoint: endpoint.into(),
            expected_status,
            payload: None,
            attachments: Vec::new(),
            headers: Vec::new(),
            auth: Auth::Default,
        }
    }

    pub fn get(name: impl Into<String>, endpoint: impl Into<String>, expected_status: u16) -> Self {
        Self::new(name, Method::Get, endpoint, expected_status)
    }

    pub fn post(name: impl Into<String>, endpoint: impl Into<String>, expected_status: u16) -> Self {
        Self::new(name, Method::Post, endpoint, expected_status)
    }

    pub fn delete(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self::new(name, Method::Delete, endpoint, expected_status)
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn is_upload(&self) -> bool {
        !self.attachments.is_empty()
    }
}

/// Outcome of one executed call
#[derive(Debug, Clone)]
pub struct CallResult {
    /// True iff the observed status equals the expected status
    pub success: bool,
    /// Observed status, absent when the request never got a response
    pub status: Option<u16>,
    /// Parsed JSON body, or an empty object
    pub body: Value,
    /// Diagnostic detail for failed calls
    pub error: Option<String>,
}

impl CallResult {
    /// Classify a received response
    pub fn from_response(expected: u16, status: u16, text: &str) -> Self {
        if status == expected {
            Self {
                success: true,
                status: Some(status),
                body: parse_body(text).unwrap_or_else(empty_body),
                error: None,
            }
        } else {
            let detail = match parse_body(text) {
                Some(json) => json.to_string(),
                None => text.to_string(),
            };
            Self {
                success: false,
                status: Some(status),
                body: empty_body(),
                error: Some(detail),
            }
        }
    }

    /// A call that failed before a response arrived
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            status: None,
            body: empty_body(),
            error: Some(error.into()),
        }
    }

    /// A response arrived but its body could not be read
    pub fn body_read_failure(status: u16, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status: Some(status),
            body: empty_body(),
            error: Some(error.into()),
        }
    }

    /// String field from the body, if present
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }
}

fn parse_body(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

fn empty_body() -> Value {
    Value::Object(Map::new())
}
