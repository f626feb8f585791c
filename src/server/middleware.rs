//! Built-in middleware.
//!
//! Middleware are ordinary [`HandlerFn`]s. They can be mounted on the server
//! with [`HttpServer::add_middleware`](crate::HttpServer::add_middleware), so
//! every request passes through them, or passed to a single route at
//! registration.

use std::sync::Arc;

use log::debug;

use crate::parser::{HttpRequest, Method};
use crate::server::handler::HandlerFn;
use crate::server::response::{Body, HttpResponse};
use crate::server::status::StatusCode;

pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Build a CORS middleware trusting `allowed_origins`.
///
/// A request is allowed when it carries both a `Host` header and an `Origin`
/// header that parses as a URL, and either the origin's hostname equals the
/// `Host` hostname or the literal origin is in `allowed_origins`. Disallowed requests get `403 Forbidden` and the chain
/// stops there. Allowed preflight (OPTIONS) requests are answered with
/// `200 OK` immediately; anything else continues down the chain with the
/// CORS headers set.
pub fn cors_middleware(allowed_origins: Vec<String>) -> HandlerFn {
    Arc::new(move |req: &mut HttpRequest, res: HttpResponse| {
        let Some(origin) = req.origin_str().filter(|_| is_allowed(req, &allowed_origins)) else {
            debug!(
                "CORS rejected {} {} from origin {:?}",
                req.method(),
                req.path(),
                req.origin_str()
            );
            return res.set_status(StatusCode::FORBIDDEN).send("Forbidden.");
        };

        let res = res
            .set_header("Access-Control-Allow-Origin", origin)
            .set_header("Access-Control-Allow-Methods", ALLOW_METHODS)
            .set_header("Access-Control-Allow-Headers", ALLOW_HEADERS);

        if req.method() == Method::OPTIONS {
            return res.set_status(StatusCode::OK).send(Body::Empty);
        }

        req.next(res)
    })
}

fn is_allowed(req: &HttpRequest, allowed_origins: &[String]) -> bool {
    let (Some(host), Some(origin), Some(raw_origin)) = (req.host(), req.origin(), req.origin_str()) else {
        return false;
    };

    let same_origin = host.host_str().is_some() && host.host_str() == origin.host_str();

    same_origin || allowed_origins.iter().any(|allowed| allowed == raw_origin)
}

/// Appended last to routes registered for HEAD.
///
/// Runs the rest of the chain, then drops the body it produced.
pub fn head_middleware(req: &mut HttpRequest, res: HttpResponse) -> HttpResponse {
    req.next(res).send(Body::Empty)
}
