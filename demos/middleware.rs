//! Server-wide and per-route middleware.
//!
//! Try:
//!   curl -i http://127.0.0.1:8000/tasks
//!   curl -i -H 'Authorization: 7' http://127.0.0.1:8000/tasks

use std::time::Instant;

use goserve_rs::{handler_fn, HttpServer, ServerConfig, StatusCode};
use log::info;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut server = HttpServer::new(ServerConfig::default().with_port(8000));

    // Runs around every request: before and after the rest of the chain
    server.add_middleware(handler_fn(|req, res| {
        let started = Instant::now();
        let res = req.next(res);
        info!(
            "{} {} -> {} in {:?}",
            req.method(),
            req.path(),
            res.status().as_u16(),
            started.elapsed()
        );
        res
    }));

    let authenticate = handler_fn(|req, res| {
        let Some(token) = req.header("Authorization").map(str::to_string) else {
            return res
                .set_status(StatusCode::UNAUTHORIZED)
                .send(json!({ "message": "unauthorized" }));
        };
        req.store_mut().set("userId".to_string(), json!(token));
        req.next(res)
    });

    let cache_header = handler_fn(|req, res| req.next(res).set_header("Cache-Control", "no-store"));

    server.get(
        "/tasks",
        |req, res| {
            let user = req.store().get("userId").cloned().unwrap_or_default();
            res.send(json!({ "message": "tasks", "user": user }))
        },
        vec![authenticate, cache_header],
    );

    server.start().await?;

    Ok(())
}
