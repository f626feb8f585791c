//! HTTP response types and utilities.

use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::parser::HttpRequest;
use crate::server::error::Error;
use crate::server::status::{status_string, StatusCode};
use crate::store::KeyValueStore;

const DEFAULT_VERSION: &str = "HTTP/1.1";

/// The body of a response.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl Body {
    /// Render the body to the bytes written on the wire.
    pub fn render(&self) -> Vec<u8> {
        match self {
            Body::Empty => Vec::new(),
            Body::Text(text) => text.clone().into_bytes(),
            Body::Bytes(bytes) => bytes.clone(),
            Body::Json(value) => value.to_string().into_bytes(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        body.map_or(Body::Empty, Into::into)
    }
}

// Numbers are sent as their decimal representation.
macro_rules! number_body {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Body {
            fn from(n: $ty) -> Self {
                Body::Text(n.to_string())
            }
        })*
    };
}

number_body!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Represents an HTTP response.
///
/// Built fluently by handlers and middleware:
///
/// ```
/// use goserve_rs::{HttpResponse, StatusCode};
///
/// let res = HttpResponse::new()
///     .set_status(StatusCode::CREATED)
///     .set_header("X-Request-Id", "42")
///     .send("created");
/// assert_eq!(res.status(), StatusCode::CREATED);
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    version: String,
    status: StatusCode,
    headers: KeyValueStore<String, String>,
    body: Body,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponse {
    /// Create an empty `200 OK` response for HTTP/1.1.
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            status: StatusCode::OK,
            headers: KeyValueStore::new(),
            body: Body::Empty,
        }
    }

    /// Create a response answering `req`, echoing its HTTP version.
    pub fn for_request(req: &HttpRequest) -> Self {
        Self {
            version: req.version().to_string(),
            ..Self::new()
        }
    }

    /// Set the status code. A code of 0 means `200 OK`.
    pub fn set_status(mut self, status: impl Into<StatusCode>) -> Self {
        let status = status.into();
        self.status = if status.as_u16() == 0 { StatusCode::OK } else { status };
        self
    }

    /// Add or replace a header.
    pub fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name.into(), value.into());
        self
    }

    /// Set the response body.
    ///
    /// This only records the body; the handler still has to return the
    /// response.
    pub fn send(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` to JSON and set it as the body.
    pub fn send_json<T: Serialize>(self, value: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(value)?;
        Ok(self.send(value))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &KeyValueStore<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Convert the response to bytes.
    ///
    /// `Content-Type` and `Content-Length` are always written last and
    /// replace any header of the same name. With `omit_body` (HEAD requests)
    /// the headers still describe the body held by the response, but the body
    /// bytes are not written.
    pub fn to_bytes(&self, omit_body: bool) -> Vec<u8> {
        if !self.status.is_registered() {
            warn!("Serializing unregistered status code {}", self.status.as_u16());
        }

        let body = self.body.render();
        let content_length = body.len().to_string();

        let mut bytes = Vec::with_capacity(128 + body.len());

        // Add the status line
        let status_line = format!("{} {}\r\n", self.version, status_string(self.status.as_u16()));
        bytes.extend_from_slice(status_line.as_bytes());

        let defaults = [("Content-Type", "application/json"), ("Content-Length", content_length.as_str())];
        let handler_headers = self
            .headers
            .iter()
            .filter(|(name, _)| !defaults.iter().any(|(d, _)| name.eq_ignore_ascii_case(d)))
            .map(|(name, value)| (name.as_str(), value.as_str()));

        for (name, value) in handler_headers.chain(defaults.iter().copied()) {
            let header_line = format!("{name}:{value}\r\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }

        // Add the empty line that separates headers from body
        bytes.extend_from_slice(b"\r\n");

        if !omit_body {
            bytes.extend_from_slice(&body);
        }

        bytes
    }
}
