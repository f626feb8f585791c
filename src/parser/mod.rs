//! HTTP parser module.
//!
//! Turns the raw bytes read from a connection into an [`HttpRequest`].

mod request;
mod method;
mod error;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
