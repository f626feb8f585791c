//! A minimal HTTP/1.1 server framework.
//!
//! Each connection carries exactly one request. The request is parsed,
//! matched against the registered routes in registration order, and passed
//! through a chain of middleware ending in the route handler. Every element of
//! the chain decides whether to answer directly or to hand the request on with
//! [`HttpRequest::next`] and post-process what comes back.
//!
//! # Features
//!
//! - Path patterns with `:name` captures and query string parsing
//! - Server-wide and per-route middleware with a "next" continuation
//! - HEAD requests served by GET routes, automatic CORS preflight answers
//! - JSON request decoding and response encoding
//!
//! # Examples
//!
//! ## Routing and middleware
//!
//! ```
//! use goserve_rs::{handler_fn, parse_request, HttpServer, ServerConfig, StatusCode};
//! use serde_json::json;
//!
//! let mut server = HttpServer::new(ServerConfig::default());
//!
//! let auth = handler_fn(|req, res| {
//!     if !req.has_header("Authorization") {
//!         return res.set_status(StatusCode::UNAUTHORIZED).send(json!({"message": "unauthorized"}));
//!     }
//!     req.next(res)
//! });
//!
//! server.get("/tasks/:id", |req, res| {
//!     let id = req.path_param("id").unwrap_or_default().to_string();
//!     res.send(json!({ "id": id }))
//! }, vec![auth]);
//!
//! let mut request = parse_request(b"GET /tasks/7 HTTP/1.1\r\nHost: example.com\r\nAuthorization: t\r\n\r\n").unwrap();
//! let response = server.handle_request(&mut request);
//! assert_eq!(response.status(), StatusCode::OK);
//! ```
//!
//! ## Error handling
//!
//! ```
//! use goserve_rs::{parse_request, ParserError};
//!
//! let invalid_request = b"FOOBAR /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
//!
//! match parse_request(invalid_request) {
//!     Ok(_) => println!("Request parsed successfully"),
//!     Err(ParserError::InvalidMethod(method)) => println!("Invalid method: {}", method),
//!     Err(err) => println!("Other error: {}", err),
//! }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

pub mod store;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, HttpRequest, Method};
pub use server::{
    cors_middleware, handler_fn, head_middleware, Body, Error as ServerError, HandlerFn, HttpResponse, HttpServer,
    Route, ServerConfig, StatusCode,
};
pub use store::KeyValueStore;
