//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP method in the request is not supported.
    #[error("invalid request: invalid request method {0}")]
    InvalidMethod(String),

    /// The request line is malformed (wrong format or missing components).
    #[error("invalid request: malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The request is empty.
    #[error("invalid request: missing request line")]
    EmptyRequest,

    /// A header line does not split into a name and a value.
    #[error("invalid request: invalid header: {0}")]
    InvalidHeaderFormat(String),

    /// The Host header is not a valid authority.
    #[error("invalid request: invalid host header: {0}")]
    InvalidHost(String),

    /// The body could not be decoded into the requested shape.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
