//! HTTP API Integration Tests
//!
//! Runs the real `HttpApi` against an in-process axum server on an
//! ephemeral port and checks what actually goes over the wire:
//! 1. Raw text config fetch and `text/plain` save
//! 2. Memory query parameters and page decoding
//! 3. Scoped delete/edit with a percent-encoded id
//! 4. Server error bodies surfaced verbatim, or dropped if unreadable
//! 5. Named SSE events decoded into `StreamEvent`s

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{delete, get},
    Json, Router,
};
use mnemon_dash::{
    stream::{EventStream, ReconnectSettings},
    DashError, DashboardApi, HttpApi, MemoryQuery, StreamEvent,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_stream::StreamExt;

/// One request as the server saw it
#[derive(Debug, Clone, PartialEq)]
struct Seen {
    method: &'static str,
    path: String,
    query: HashMap<String, String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct Backend {
    seen: Arc<Mutex<Vec<Seen>>>,
    config: Arc<Mutex<String>>,
}

impl Backend {
    fn record(&self, seen: Seen) {
        self.seen.lock().unwrap().push(seen);
    }

    fn last(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().expect("no request seen")
    }
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn get_config(State(backend): State<Backend>) -> String {
    backend.config.lock().unwrap().clone()
}

async fn post_config(
    State(backend): State<Backend>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body = String::from_utf8_lossy(&body).to_string();
    backend.record(Seen {
        method: "POST",
        path: "/api/config".to_string(),
        query: HashMap::new(),
        content_type: content_type(&headers),
        body: body.clone(),
    });

    if body.contains("[[broken") {
        return (StatusCode::BAD_REQUEST, "invalid TOML at line 1".to_string());
    }
    *backend.config.lock().unwrap() = body;
    (StatusCode::OK, String::new())
}

async fn list_memories(
    State(backend): State<Backend>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    backend.record(Seen {
        method: "GET",
        path: "/api/memories".to_string(),
        query: query.clone(),
        content_type: None,
        body: String::new(),
    });

    match query.get("server_id").map(String::as_str) {
        Some("empty") => Json(json!({"total": 0, "memories": null})),
        _ => Json(json!({
            "total": 2,
            "memories": [
                {
                    "ID": "abcdef1234",
                    "Content": "<b>hi</b>",
                    "ServerID": "s1",
                    "UserID": "",
                    "CreatedAt": null
                },
                {
                    "ID": "0123456789",
                    "Content": "likes tea",
                    "ServerID": "s1",
                    "UserID": "u1",
                    "CreatedAt": "2024-05-01T12:00:00Z"
                }
            ]
        })),
    }
}

async fn delete_memory(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    backend.record(Seen {
        method: "DELETE",
        path: id.clone(),
        query,
        content_type: None,
        body: String::new(),
    });

    if id == "missing" {
        (StatusCode::NOT_FOUND, "memory not found")
    } else {
        (StatusCode::NO_CONTENT, "")
    }
}

async fn patch_memory(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record(Seen {
        method: "PATCH",
        path: id,
        query,
        content_type: content_type(&headers),
        body: body.to_string(),
    });
    StatusCode::OK
}

async fn events() -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let agents = json!([
        {"channel_id": "c1", "server_id": "s1", "last_active": "2024-05-01T12:00:00Z", "queue_depth": 2},
        {"channel_id": "c2", "server_id": "s1", "last_active": null, "queue_depth": 0}
    ]);
    let events = vec![
        Ok(Event::default().event("status").data(agents.to_string())),
        Ok(Event::default().event("ignored").data("x")),
        Ok(Event::default().event("config_reloaded").data("")),
        Ok(Event::default().event("status").data("null")),
    ];
    let stream = tokio_stream::iter(events).chain(tokio_stream::pending());
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Start the fake bot; returns its base URL and recorded state
async fn start_backend() -> (String, Backend) {
    let backend = Backend::default();
    *backend.config.lock().unwrap() = "[bot]\nname = \"mnemon\"\n".to_string();

    let app = Router::new()
        .route("/api/config", get(get_config).post(post_config))
        .route("/api/memories", get(list_memories))
        .route("/api/memories/:id", delete(delete_memory).patch(patch_memory))
        .route("/api/events", get(events))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), backend)
}

async fn next_event(events: &mut EventStream) -> StreamEvent {
    tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("timed out waiting for stream event")
        .expect("stream ended")
}

fn api(base_url: &str) -> HttpApi {
    let reconnect = ReconnectSettings {
        delay: Duration::from_millis(50),
        max_delay: Duration::from_millis(200),
    };
    HttpApi::new(base_url, reqwest::Client::new(), reconnect).unwrap()
}

#[tokio::test]
async fn test_config_round_trip_is_literal() {
    let (url, backend) = start_backend().await;
    let api = api(&url);

    assert_eq!(api.get_config().await.unwrap(), "[bot]\nname = \"mnemon\"\n");

    let edited = "[bot]\nname = \"<mnemon & co>\"\n\n";
    api.save_config(edited.to_string()).await.unwrap();

    let seen = backend.last();
    assert_eq!(seen.content_type.as_deref(), Some("text/plain"));
    assert_eq!(seen.body, edited);
    assert_eq!(api.get_config().await.unwrap(), edited);
}

#[tokio::test]
async fn test_save_error_body_is_kept() {
    let (url, _backend) = start_backend().await;
    let err = api(&url)
        .save_config("[[broken".to_string())
        .await
        .unwrap_err();

    match &err {
        DashError::Server { status, body } => {
            assert_eq!(*status, 400);
            assert_eq!(body, "invalid TOML at line 1");
        }
        other => panic!("Expected Server error, got {:?}", other),
    }
    assert_eq!(err.server_message(), Some("invalid TOML at line 1"));
}

#[tokio::test]
async fn test_list_memories_query_and_decode() {
    let (url, backend) = start_backend().await;
    let api = api(&url);

    let query = MemoryQuery::for_server("s1").text(Some("tea".to_string()));
    let page = api.list_memories(&query).await.unwrap();

    let seen = backend.last();
    assert_eq!(seen.query.get("server_id").map(String::as_str), Some("s1"));
    assert_eq!(seen.query.get("q").map(String::as_str), Some("tea"));
    assert_eq!(seen.query.get("limit").map(String::as_str), Some("25"));
    assert_eq!(seen.query.get("offset").map(String::as_str), Some("0"));
    assert!(!seen.query.contains_key("user_id"));

    assert_eq!(page.total, 2);
    assert_eq!(page.memories[0].id, "abcdef1234");
    assert_eq!(page.memories[0].content, "<b>hi</b>");
    assert!(page.memories[0].created_at.is_none());
    assert!(page.memories[1].created_at.is_some());
}

#[tokio::test]
async fn test_null_memories_is_empty_page() {
    let (url, _backend) = start_backend().await;
    let page = api(&url)
        .list_memories(&MemoryQuery::for_server("empty"))
        .await
        .unwrap();

    assert_eq!(page.total, 0);
    assert!(page.memories.is_empty());
}

#[tokio::test]
async fn test_delete_is_scoped_and_encoded() {
    let (url, backend) = start_backend().await;
    api(&url).delete_memory("a/b c", "s&1").await.unwrap();

    let seen = backend.last();
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.path, "a/b c");
    assert_eq!(seen.query.get("server_id").map(String::as_str), Some("s&1"));
}

#[tokio::test]
async fn test_delete_failure_surfaces_body() {
    let (url, _backend) = start_backend().await;
    let err = api(&url).delete_memory("missing", "s1").await.unwrap_err();
    assert_eq!(err.server_message(), Some("memory not found"));
}

#[tokio::test]
async fn test_update_sends_json_content() {
    let (url, backend) = start_backend().await;
    api(&url)
        .update_memory("abcdef1234", "s1", String::new())
        .await
        .unwrap();

    let seen = backend.last();
    assert_eq!(seen.method, "PATCH");
    assert_eq!(seen.path, "abcdef1234");
    assert_eq!(seen.query.get("server_id").map(String::as_str), Some("s1"));
    assert!(seen
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("application/json")));
    assert_eq!(
        serde_json::from_str::<Value>(&seen.body).unwrap(),
        json!({"content": ""})
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = api(&format!("http://{}", addr))
        .get_config()
        .await
        .unwrap_err();
    assert!(matches!(err, DashError::Http(_)));
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\npartial")
            .await
            .unwrap();
    });

    let err = api(&format!("http://{}", addr))
        .get_config()
        .await
        .unwrap_err();
    match &err {
        DashError::Server { status, body } => {
            assert_eq!(*status, 502);
            assert!(body.is_empty());
        }
        other => panic!("Expected Server error, got {:?}", other),
    }
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn test_event_stream_decodes_named_events() {
    let (url, _backend) = start_backend().await;
    let mut events = api(&url).open_events().unwrap();

    assert_eq!(next_event(&mut events).await, StreamEvent::Opened);
    match next_event(&mut events).await {
        StreamEvent::Status(agents) => {
            assert_eq!(agents.len(), 2);
            assert_eq!(agents[0].channel_id, "c1");
            assert_eq!(agents[0].queue_depth, 2);
            assert!(agents[1].last_active.is_none());
        }
        other => panic!("Expected Status, got {:?}", other),
    }
    assert_eq!(next_event(&mut events).await, StreamEvent::ConfigReloaded);
    assert_eq!(
        next_event(&mut events).await,
        StreamEvent::Status(Vec::new())
    );
}
