//! HTTP request parsing and representation.

use std::net::SocketAddr;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::server::{HandlerChain, HttpResponse};
use crate::store::KeyValueStore;

/// Represents an HTTP request.
///
/// Everything parsed off the wire is read-only. The router fills in the path
/// and query parameters once a route is found, and installs the handler chain
/// that [`HttpRequest::next`] walks.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    version: String,
    headers: KeyValueStore<String, String>,
    host: Option<Url>,
    origin: Option<Url>,
    raw_origin: Option<String>,
    body: Vec<u8>,
    path_params: KeyValueStore<String, String>,
    query_params: KeyValueStore<String, String>,
    client_addr: Option<SocketAddr>,
    server_addr: Option<SocketAddr>,
    chain: HandlerChain,
    store: KeyValueStore<String, Value>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `path` - The request target, query string included
    /// * `version` - The HTTP version token, echoed back in the response
    /// * `headers` - The HTTP headers
    ///
    /// # Errors
    ///
    /// Fails when a `Host` header is present but cannot be parsed as an
    /// authority. An unparseable `Origin` (such as `null`) is kept as raw text
    /// only, leaving [`HttpRequest::origin`] empty.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        version: impl Into<String>,
        headers: KeyValueStore<String, String>,
    ) -> Result<Self, Error> {
        let host = match headers.get_ignore_case("Host") {
            Some(raw) => Some(
                Url::parse(&format!("http://{raw}")).map_err(|_| Error::InvalidHost(raw.clone()))?,
            ),
            None => None,
        };

        let raw_origin = headers.get_ignore_case("Origin").cloned();
        let origin = raw_origin.as_deref().and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Ignoring unparseable origin {raw:?}: {e}");
                None
            }
        });

        Ok(Self {
            method,
            path: path.into(),
            version: version.into(),
            headers,
            host,
            origin,
            raw_origin,
            body: Vec::new(),
            path_params: KeyValueStore::new(),
            query_params: KeyValueStore::new(),
            client_addr: None,
            server_addr: None,
            chain: HandlerChain::default(),
            store: KeyValueStore::new(),
        })
    }

    /// Attach a body to the request.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Record the peer and local addresses of the connection.
    pub fn with_addrs(mut self, client_addr: Option<SocketAddr>, server_addr: Option<SocketAddr>) -> Self {
        self.client_addr = client_addr;
        self.server_addr = server_addr;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The raw request target, including any query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &KeyValueStore<String, String> {
        &self.headers
    }

    /// Get a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_ignore_case(name).map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// The parsed `Host` header.
    pub fn host(&self) -> Option<&Url> {
        self.host.as_ref()
    }

    /// The parsed `Origin` header, if it is a valid URL.
    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// The `Origin` header exactly as the client sent it.
    pub fn origin_str(&self) -> Option<&str> {
        self.raw_origin.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the request body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the body is not valid JSON or does not
    /// fit the shape of `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Check if the request declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }

    /// Path parameters captured by the matched route pattern.
    ///
    /// Empty until a route has been resolved for this request.
    pub fn path_params(&self) -> &KeyValueStore<String, String> {
        &self.path_params
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Query parameters. Empty until a route has been resolved for this request.
    pub fn query_params(&self) -> &KeyValueStore<String, String> {
        &self.query_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    pub fn client_addr(&self) -> Option<SocketAddr> {
        self.client_addr
    }

    pub fn server_addr(&self) -> Option<SocketAddr> {
        self.server_addr
    }

    /// Scratch storage for passing data down the handler chain.
    pub fn store(&self) -> &KeyValueStore<String, Value> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut KeyValueStore<String, Value> {
        &mut self.store
    }

    /// Pass control to the next handler in the chain and return the response
    /// it produces.
    ///
    /// A middleware that returns without calling `next` ends the chain. Once
    /// the chain is exhausted, the response is returned unchanged.
    pub fn next(&mut self, res: HttpResponse) -> HttpResponse {
        match self.chain.advance() {
            Some(handler) => handler(self, res),
            None => {
                debug!("Handler chain exhausted for {} {}", self.method, self.path);
                res
            }
        }
    }

    pub(crate) fn set_params(
        &mut self,
        path_params: KeyValueStore<String, String>,
        query_params: KeyValueStore<String, String>,
    ) {
        self.path_params = path_params;
        self.query_params = query_params;
    }

    pub(crate) fn set_handler_chain(&mut self, chain: HandlerChain) {
        self.chain = chain;
    }
}

/// Parse an HTTP request from a byte slice.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is invalid. Only the
/// first line after the blank header terminator is kept as the body.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let input_str = String::from_utf8_lossy(input);

    // Split the input into lines
    let mut lines = input_str.lines();

    // Parse the request line
    let request_line = match lines.next() {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Err(Error::EmptyRequest),
    };

    // Split the request line into method, path, and version
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from_token(parts[0])?;
    let path = parts[1];
    let version = parts[2];

    // Parse the headers
    let mut headers = KeyValueStore::new();
    for line in lines.by_ref() {
        // Empty line indicates the end of headers
        if line.is_empty() {
            break;
        }

        match line.split_once(": ") {
            Some((name, value)) => headers.set(name.to_string(), value.to_string()),
            None => return Err(Error::InvalidHeaderFormat(line.to_string())),
        }
    }

    let body = lines.next().unwrap_or_default();

    Ok(HttpRequest::new(method, path, version, headers)?.with_body(body.as_bytes()))
}
