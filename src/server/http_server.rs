//! HTTP server implementation.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::parser::{parse_request, HttpRequest, Method};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::{handler_fn, HandlerFn, Route};
use crate::server::middleware::{cors_middleware, head_middleware};
use crate::server::response::HttpResponse;
use crate::server::status::StatusCode;

/// An HTTP server.
///
/// Routes and middleware are registered through `&mut self` before
/// [`HttpServer::start`] takes ownership, after which the route table is
/// shared read-only by every connection task.
pub struct HttpServer {
    config: ServerConfig,
    routes: Vec<Route>,
    middlewares: Vec<HandlerFn>,
    allowed_origins: Vec<String>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let allowed_origins = config.allowed_origins.clone();
        Self {
            config,
            routes: Vec::new(),
            middlewares: Vec::new(),
            allowed_origins,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Server-wide middleware, in registration order.
    pub fn middlewares(&self) -> &[HandlerFn] {
        &self.middlewares
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Register a route for a method given by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMethod`] when `method` is not one of GET, POST,
    /// PUT, PATCH, DELETE, OPTIONS or HEAD. Already registered routes are not
    /// affected.
    pub fn add_route(
        &mut self,
        path: impl Into<String>,
        method: &str,
        handler: HandlerFn,
        middlewares: Vec<HandlerFn>,
    ) -> Result<&Route, Error> {
        let method = Method::from_str(method).map_err(|_| Error::InvalidMethod(method.to_string()))?;
        Ok(self.push_route(path.into(), method, handler, middlewares))
    }

    fn push_route(&mut self, path: String, method: Method, handler: HandlerFn, middlewares: Vec<HandlerFn>) -> &Route {
        debug!("Registering route {method} {path}");
        self.routes.push(Route::new(path, method, handler, middlewares));
        &self.routes[self.routes.len() - 1]
    }

    pub fn get<F>(&mut self, path: impl Into<String>, handler: F, middlewares: Vec<HandlerFn>) -> &Route
    where
        F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        self.push_route(path.into(), Method::GET, handler_fn(handler), middlewares)
    }

    pub fn post<F>(&mut self, path: impl Into<String>, handler: F, middlewares: Vec<HandlerFn>) -> &Route
    where
        F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        self.push_route(path.into(), Method::POST, handler_fn(handler), middlewares)
    }

    pub fn put<F>(&mut self, path: impl Into<String>, handler: F, middlewares: Vec<HandlerFn>) -> &Route
    where
        F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        self.push_route(path.into(), Method::PUT, handler_fn(handler), middlewares)
    }

    pub fn patch<F>(&mut self, path: impl Into<String>, handler: F, middlewares: Vec<HandlerFn>) -> &Route
    where
        F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        self.push_route(path.into(), Method::PATCH, handler_fn(handler), middlewares)
    }

    pub fn delete<F>(&mut self, path: impl Into<String>, handler: F, middlewares: Vec<HandlerFn>) -> &Route
    where
        F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        self.push_route(path.into(), Method::DELETE, handler_fn(handler), middlewares)
    }

    pub fn options<F>(&mut self, path: impl Into<String>, handler: F, middlewares: Vec<HandlerFn>) -> &Route
    where
        F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        self.push_route(path.into(), Method::OPTIONS, handler_fn(handler), middlewares)
    }

    /// Register a HEAD route. The HEAD middleware is appended after
    /// `middlewares` so the body is dropped once the handler has run.
    pub fn head<F>(&mut self, path: impl Into<String>, handler: F, mut middlewares: Vec<HandlerFn>) -> &Route
    where
        F: Fn(&mut HttpRequest, HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        middlewares.push(Arc::new(head_middleware));
        self.push_route(path.into(), Method::HEAD, handler_fn(handler), middlewares)
    }

    /// Mount a middleware every request passes through.
    pub fn add_middleware(&mut self, middleware: HandlerFn) {
        self.middlewares.push(middleware);
    }

    /// Trust more origins for CORS.
    ///
    /// Only affects CORS middleware built afterwards, including the default
    /// preflight route.
    pub fn add_allowed_origins<I, S>(&mut self, origins: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins.extend(origins.into_iter().map(Into::into));
    }

    /// A CORS middleware trusting the server's current allowed origins.
    pub fn cors(&self) -> HandlerFn {
        cors_middleware(self.allowed_origins.clone())
    }

    /// Log the registered endpoints.
    fn display_server_info(&self) {
        info!("Registered endpoints:");
        for route in &self.routes {
            info!("  {} {}", route.method(), route.path());
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown_tx: mpsc::Sender<()>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Spawn a task serving one connection.
    fn handle_new_connection(server: Arc<Self>, mut socket: TcpStream, addr: SocketAddr, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            let server_addr = socket.local_addr().ok();
            if let Err(e) = server.handle_connection(&mut socket, Some(addr), server_addr).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections.
    ///
    /// Every connection is served by its own task. Returns once Ctrl+C has
    /// been received and in-flight connections are done.
    ///
    /// # Errors
    ///
    /// Fails if the listener cannot be bound.
    pub async fn start(self) -> Result<(), Error> {
        self.display_server_info();

        let listener = self.setup_listener().await?;
        let server = Arc::new(self);

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let mut tasks = JoinSet::new();

        Self::setup_ctrl_c_handler(shutdown_tx.clone(), &mut tasks);

        loop {
            // Reap finished connection tasks
            while tasks.try_join_next().is_some() {}

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(server.clone(), socket, addr, &mut tasks);
                        }
                        Err(e) => {
                            error!("Error accepting connection: {e}");
                        }
                    }
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Handle a single connection: read one request, dispatch it, write the
    /// response, and shut the stream down.
    pub async fn handle_connection(
        &self,
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        client_addr: Option<SocketAddr>,
        server_addr: Option<SocketAddr>,
    ) -> Result<(), Error> {
        let mut buf = vec![0; self.config.max_request_size];

        let n = match socket.read(&mut buf).await {
            Ok(0) => return Ok(()), // Connection closed
            Ok(n) => n,
            Err(e) => {
                let response = HttpResponse::new()
                    .set_status(StatusCode::BAD_REQUEST)
                    .send(format!("Error reading request: {e}"));
                let _ = socket.write_all(&response.to_bytes(false)).await;
                let _ = socket.shutdown().await;
                return Err(Error::IoError(e));
            }
        };

        let mut request = match parse_request(&buf[..n]) {
            Ok(req) => req.with_addrs(client_addr, server_addr),
            Err(e) => {
                let response = HttpResponse::new()
                    .set_status(StatusCode::BAD_REQUEST)
                    .send(format!("Error creating request instance: {e}"));
                socket.write_all(&response.to_bytes(false)).await?;
                socket.shutdown().await?;
                return Err(Error::ParseError(e));
            }
        };

        let response = self.handle_request(&mut request);
        debug!(
            "{} {} -> {}",
            request.method(),
            request.path(),
            response.status().as_u16()
        );

        let is_head = request.method() == Method::HEAD;
        socket.write_all(&response.to_bytes(is_head)).await?;
        socket.shutdown().await?;

        Ok(())
    }
}
