//! HTTP request handlers, routes, and the per-request handler chain.

use std::fmt;
use std::sync::Arc;

use crate::parser::{HttpRequest, Method};
use crate::server::middleware::cors_middleware;
use crate::server::response::HttpResponse;

/// Signature shared by middleware and route handlers.
///
/// A handler either returns a response directly, ending the chain, or calls
/// [`HttpRequest::next`] to run the rest of the chain and post-process the
/// response it gets back.
pub type HandlerFn = Arc<dyn Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync>;

/// Wrap a closure or function as a [`HandlerFn`].
pub fn handler_fn<F>(f: F) -> HandlerFn
where
    F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Pattern of the synthetic preflight route. Never matched segment-wise.
pub const ANY_PATH: &str = "*";

/// Represents a route in the HTTP server.
#[derive(Clone)]
pub struct Route {
    path: String,
    method: Method,
    handler: HandlerFn,
    middlewares: Vec<HandlerFn>,
}

impl Route {
    pub fn new(path: impl Into<String>, method: Method, handler: HandlerFn, middlewares: Vec<HandlerFn>) -> Self {
        Self {
            path: path.into(),
            method,
            handler,
            middlewares,
        }
    }

    /// The route answering browser preflight requests for paths that have no
    /// OPTIONS route of their own. Its handler is the CORS middleware itself.
    pub fn default_options(allowed_origins: Vec<String>) -> Self {
        Self::new(ANY_PATH, Method::OPTIONS, cors_middleware(allowed_origins), Vec::new())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    pub fn middlewares(&self) -> &[HandlerFn] {
        &self.middlewares
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

/// The ordered handlers for one request and a cursor that only moves forward.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<HandlerFn>,
    cursor: usize,
}

impl HandlerChain {
    pub fn new(handlers: Vec<HandlerFn>) -> Self {
        Self { handlers, cursor: 0 }
    }

    /// Take the handler at the cursor and move past it.
    pub fn advance(&mut self) -> Option<HandlerFn> {
        let handler = self.handlers.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(handler)
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
