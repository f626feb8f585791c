//! HTTP server implementation for goserve-rs.
//!
//! Route registration and resolution, the middleware chain, built-in CORS
//! and HEAD middleware, response serialization, and the TCP accept loop.

mod response;
mod config;
mod error;
mod handler;
mod http_server;
mod middleware;
mod router;
mod status;

// Re-export public items
pub use response::{Body, HttpResponse};
pub use config::{ServerConfig, DEFAULT_MAX_REQUEST_SIZE, DEFAULT_PORT};
pub use error::Error;
pub use handler::{handler_fn, HandlerChain, HandlerFn, Route, ANY_PATH};
pub use http_server::HttpServer;
pub use middleware::{cors_middleware, head_middleware, ALLOW_HEADERS, ALLOW_METHODS};
pub use router::{match_route, parse_query_params};
pub use status::{lookup as lookup_status, status_string, HttpStatus, StatusCode};
