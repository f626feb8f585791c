//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 8000;

/// Default read buffer size in bytes.
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// Size of the buffer a request is read into. Longer requests are
    /// truncated.
    pub max_request_size: usize,
    /// Origins the CORS middleware trusts besides same-origin requests.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    pub fn with_max_request_size(mut self, max_request_size: usize) -> Self {
        self.max_request_size = max_request_size;
        self
    }

    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins.extend(origins.into_iter().map(Into::into));
        self
    }
}
