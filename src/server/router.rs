//! Route resolution and request dispatch.

use std::iter;

use log::debug;

use crate::parser::{HttpRequest, Method};
use crate::server::handler::{HandlerChain, HandlerFn, Route};
use crate::server::http_server::HttpServer;
use crate::server::response::HttpResponse;
use crate::server::status::StatusCode;
use crate::store::KeyValueStore;

/// Match a request path against a route pattern.
///
/// Both are split on `/` and must have the same number of segments. A pattern
/// segment starting with `:` captures the path segment under the name that
/// follows the colon; every other segment must be equal. Trailing slashes
/// count as an extra empty segment, so `/a/` does not match `/a`.
pub fn match_route(path: &str, pattern: &str) -> Option<KeyValueStore<String, String>> {
    let path_parts: Vec<&str> = path.split('/').collect();
    let pattern_parts: Vec<&str> = pattern.split('/').collect();

    if path_parts.len() != pattern_parts.len() {
        return None;
    }

    let mut params = KeyValueStore::new();
    for (path_part, pattern_part) in path_parts.into_iter().zip(pattern_parts) {
        match pattern_part.strip_prefix(':') {
            Some(name) => params.set(name.to_string(), path_part.to_string()),
            None if pattern_part == path_part => {}
            None => return None,
        }
    }

    Some(params)
}

/// Parse a query string (without the leading `?`).
///
/// Pairs are split on the first `=`. Pairs without one are skipped.
pub fn parse_query_params(query: &str) -> KeyValueStore<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl HttpServer {
    /// Find the route for `req`, first match in registration order.
    ///
    /// HEAD requests are served by GET routes as well as HEAD routes. An
    /// OPTIONS request for a path whose first matching route is not an
    /// OPTIONS route gets the default preflight route instead.
    ///
    /// Path and query parameters are set on `req` only when a registered
    /// route is returned.
    pub fn get_route(&self, req: &mut HttpRequest) -> Option<Route> {
        let target = req.path().to_string();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target.as_str(), None),
        };
        let method = req.method();

        for route in self.routes() {
            let Some(path_params) = match_route(path, route.path()) else {
                continue;
            };

            if method == Method::OPTIONS && route.method() != Method::OPTIONS {
                return Some(Route::default_options(self.allowed_origins().to_vec()));
            }

            let method_match = match method {
                Method::HEAD => matches!(route.method(), Method::GET | Method::HEAD),
                _ => route.method() == method,
            };

            if method_match {
                let query_params = query.map(parse_query_params).unwrap_or_default();
                let route = route.clone();
                req.set_params(path_params, query_params);
                return Some(route);
            }
        }

        None
    }

    /// Resolve `req` and run its handler chain.
    ///
    /// The chain is the server middleware, then the route middleware, then
    /// the route handler. Requests that match no route get `404 Not Found`.
    pub fn handle_request(&self, req: &mut HttpRequest) -> HttpResponse {
        let res = HttpResponse::for_request(req);

        let Some(route) = self.get_route(req) else {
            debug!("No route for {} {}", req.method(), req.path());
            return res.set_status(StatusCode::NOT_FOUND).send("Path not found.");
        };

        let chain: Vec<HandlerFn> = self
            .middlewares()
            .iter()
            .chain(route.middlewares())
            .chain(iter::once(route.handler()))
            .cloned()
            .collect();
        req.set_handler_chain(HandlerChain::new(chain));

        req.next(res)
    }
}
