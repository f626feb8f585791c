//! A small todo API with CORS and token authentication.
//!
//! The Authorization header is taken as the user id directly; use 1 or 2.
//!
//!   curl -i -H 'Host: 127.0.0.1' -H 'Origin: http://127.0.0.1' -H 'Authorization: 1' http://127.0.0.1:8000/tasks

use std::sync::{Arc, Mutex};

use goserve_rs::{handler_fn, Body, HttpRequest, HttpResponse, HttpServer, KeyValueStore, ServerConfig, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Task {
    #[serde(default)]
    id: u64,
    title: String,
    #[serde(default, rename = "userId")]
    user_id: u64,
}

type Db = Arc<Mutex<KeyValueStore<u64, Task>>>;

fn seed() -> Db {
    let mut tasks = KeyValueStore::new();
    tasks.set(1, Task { id: 1, title: "Buy groceries".to_string(), user_id: 1 });
    tasks.set(2, Task { id: 2, title: "Read a book".to_string(), user_id: 2 });
    Arc::new(Mutex::new(tasks))
}

fn user_id(req: &HttpRequest) -> u64 {
    req.store().get("userId").and_then(|v| v.as_u64()).unwrap_or_default()
}

fn task_id(req: &HttpRequest) -> Option<u64> {
    req.path_param("id").and_then(|id| id.parse().ok())
}

fn not_found(res: HttpResponse) -> HttpResponse {
    res.set_status(StatusCode::NOT_FOUND).send(json!({ "error": "Not Found" }))
}

fn invalid_id(res: HttpResponse) -> HttpResponse {
    res.set_status(StatusCode::BAD_REQUEST).send(json!({ "error": "Invalid id" }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut server = HttpServer::new(
        ServerConfig::default()
            .with_port(8000)
            .with_max_request_size(10 * 1024)
            .with_allowed_origins(["http://127.0.0.1"]),
    );
    let db = seed();

    let cors = server.cors();
    server.add_middleware(cors);
    server.add_middleware(handler_fn(|req, res| {
        let Some(id) = req.header("Authorization").and_then(|token| token.parse::<u64>().ok()) else {
            return res
                .set_status(StatusCode::UNAUTHORIZED)
                .send(json!({ "message": "unauthorized" }));
        };
        req.store_mut().set("userId".to_string(), json!(id));
        req.next(res)
    }));

    let tasks = db.clone();
    server.get(
        "/tasks",
        move |req, res| {
            let user = user_id(req);
            let Ok(tasks) = tasks.lock() else {
                return res.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            };
            let mine: Vec<&Task> = tasks.iter().map(|(_, t)| t).filter(|t| t.user_id == user).collect();
            res.send(json!({ "tasks": mine }))
        },
        vec![],
    );

    let tasks = db.clone();
    server.post(
        "/tasks",
        move |req, res| {
            let mut task: Task = match req.json() {
                Ok(task) => task,
                Err(e) => {
                    return res
                        .set_status(StatusCode::BAD_REQUEST)
                        .send(json!({ "error": format!("invalid body: {e}") }))
                }
            };
            let Ok(mut tasks) = tasks.lock() else {
                return res.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            };
            task.id = tasks.iter().map(|(id, _)| *id).max().unwrap_or_default() + 1;
            task.user_id = user_id(req);
            tasks.set(task.id, task.clone());
            res.set_status(StatusCode::CREATED).send(json!({ "task": task }))
        },
        vec![],
    );

    let tasks = db.clone();
    server.get(
        "/tasks/:id",
        move |req, res| {
            let Some(id) = task_id(req) else {
                return invalid_id(res);
            };
            let user = user_id(req);
            let Ok(tasks) = tasks.lock() else {
                return res.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            };
            match tasks.get(&id).filter(|t| t.user_id == user) {
                Some(task) => res.send(json!({ "task": task })),
                None => not_found(res),
            }
        },
        vec![],
    );

    let tasks = db;
    server.delete(
        "/tasks/:id",
        move |req, res| {
            let Some(id) = task_id(req) else {
                return invalid_id(res);
            };
            let user = user_id(req);
            let Ok(mut tasks) = tasks.lock() else {
                return res.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            };
            if tasks.get(&id).is_some_and(|t| t.user_id == user) {
                tasks.delete(&id);
                return res.set_status(StatusCode::NO_CONTENT).send(Body::Empty);
            }
            not_found(res)
        },
        vec![],
    );

    server.start().await?;

    Ok(())
}
