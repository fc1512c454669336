use std::collections::HashSet;

use axum::body::{to_bytes, Body};
use axum::Router;
use serde_json::{json, Value};
use todo_api::{
    config::Config,
    domain::repository::TodoStore,
    http::routing,
    infrastructure::{memory_store::MemoryTodoStore, sqlite_store::SqliteTodoStore},
};

async fn sqlite_app() -> Router {
    // use in-memory sqlite for tests
    let store = SqliteTodoStore::connect("sqlite::memory:").await.unwrap();
    store.init().await.unwrap();
    routing::build_app(store, &Config::default()).unwrap()
}

fn memory_app() -> Router {
    routing::build_app(MemoryTodoStore::new(), &Config::default()).unwrap()
}

#[tokio::test]
async fn sqlite_create_list_toggle_delete() {
    crud_flow(&sqlite_app().await).await;
}

#[tokio::test]
async fn memory_create_list_toggle_delete() {
    crud_flow(&memory_app()).await;
}

async fn crud_flow(app: &Router) {
    // create
    let (status, created) = request(app, "POST", "/api/todos", Some(json!({ "body": "buy milk" }))).await;
    assert_eq!(status, 200);
    assert_eq!(created["body"], "buy milk");
    assert_eq!(created["completed"], false);
    let id = id_of(&created);

    // list
    let (status, list) = request(app, "GET", "/api/todos", None).await;
    assert_eq!(status, 200);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // get
    let (status, got) = request(app, "GET", &format!("/api/todos/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(got, created);

    // toggle twice
    let (status, body) = request(app, "PATCH", &format!("/api/todos/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true, "completed": true }));
    let (_, body) = request(app, "PATCH", &format!("/api/todos/{id}"), None).await;
    assert_eq!(body, json!({ "success": true, "completed": false }));

    // delete
    let (status, body) = request(app, "DELETE", &format!("/api/todos/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true }));

    // get 404
    let (status, body) = request(app, "GET", &format!("/api/todos/{id}"), None).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "Todo not found" }));

    // delete again stays successful
    let (status, _) = request(app, "DELETE", &format!("/api/todos/{id}"), None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn created_ids_are_unique() {
    for app in [sqlite_app().await, memory_app()] {
        let mut seen = HashSet::new();
        for i in 0..10 {
            let (_, created) = request(&app, "POST", "/api/todos", Some(json!({ "body": format!("task {i}") }))).await;
            assert!(seen.insert(id_of(&created)));
        }
    }
}

#[tokio::test]
async fn empty_body_is_rejected_without_insert() {
    for app in [sqlite_app().await, memory_app()] {
        request(&app, "POST", "/api/todos", Some(json!({ "body": "keep" }))).await;

        let (status, body) = request(&app, "POST", "/api/todos", Some(json!({ "body": "" }))).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({ "error": "Todo body cannot be empty" }));

        let (status, _) = request(&app, "POST", "/api/todos", Some(json!({}))).await;
        assert_eq!(status, 400);

        let (_, list) = request(&app, "GET", "/api/todos", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn toggle_missing_id_is_404_and_changes_nothing() {
    let cases = [(sqlite_app().await, uuid::Uuid::new_v4().to_string()), (memory_app(), "999".to_string())];
    for (app, missing) in cases {
        let (_, created) = request(&app, "POST", "/api/todos", Some(json!({ "body": "x" }))).await;

        let (status, body) = request(&app, "PATCH", &format!("/api/todos/{missing}"), None).await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({ "error": "Todo not found" }));

        let (_, list) = request(&app, "GET", "/api/todos", None).await;
        assert_eq!(list, json!([created]));
    }
}

#[tokio::test]
async fn malformed_ids_are_400() {
    for app in [sqlite_app().await, memory_app()] {
        for method in ["PATCH", "DELETE", "GET"] {
            let (status, body) = request(&app, method, "/api/todos/not-an-id", None).await;
            assert_eq!(status, 400, "{method}");
            assert_eq!(body, json!({ "error": "Invalid todo ID" }));
        }
    }
}

#[tokio::test]
async fn list_reflects_creates_minus_deletes() {
    for app in [sqlite_app().await, memory_app()] {
        let mut created = Vec::new();
        for i in 0..5 {
            let (_, todo) = request(&app, "POST", "/api/todos", Some(json!({ "body": format!("n{i}") }))).await;
            created.push(todo);
        }
        for todo in &created[..2] {
            let (status, _) = request(&app, "DELETE", &format!("/api/todos/{}", id_of(todo)), None).await;
            assert_eq!(status, 200);
        }

        let (_, list) = request(&app, "GET", "/api/todos", None).await;
        let list = list.as_array().unwrap().clone();
        assert_eq!(list.len(), 3);
        for todo in &created[2..] {
            assert!(list.contains(todo));
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_over_http() {
    for app in [sqlite_app().await, memory_app()] {
        let (_, created) = request(&app, "POST", "/api/todos", Some(json!({ "body": "race" }))).await;
        let path = format!("/api/todos/{}", id_of(&created));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let app = app.clone();
                let path = path.clone();
                tokio::spawn(async move { request(&app, "PATCH", &path, None).await.0 })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 200);
        }

        // even number of flips from false
        let (_, todo) = request(&app, "GET", &path, None).await;
        assert_eq!(todo["completed"], false);
    }
}

#[tokio::test]
async fn health_and_cors() {
    let app = memory_app();
    let res = raw_request(&app, "GET", "/health", None, Some("http://localhost:5173")).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "http://localhost:5173");
}

#[tokio::test]
async fn unreadable_create_bodies_get_json_errors() {
    let app = memory_app();
    let cases = [("{bad", Some("application/json")), (r#"{"body":5}"#, Some("application/json")), (r#"{"body":"x"}"#, None)];
    for (payload, content_type) in cases {
        let (status, body) = post_raw(&app, payload, content_type).await;
        assert_eq!(status, 400, "{payload}");
        assert!(body["error"].is_string(), "{payload}: {body}");
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    let (_, list) = request(&app, "GET", "/api/todos", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn padded_ids_are_malformed() {
    let app = memory_app();
    request(&app, "POST", "/api/todos", Some(json!({ "body": "x" }))).await;

    let (status, body) = request(&app, "PATCH", "/api/todos/%201", None).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "Invalid todo ID" }));

    let (_, todo) = request(&app, "GET", "/api/todos/1", None).await;
    assert_eq!(todo["completed"], false);
}

#[tokio::test]
async fn storage_failures_are_500() {
    let store = SqliteTodoStore::connect("sqlite::memory:").await.unwrap();
    store.init().await.unwrap();
    let app = routing::build_app(store.clone(), &Config::default()).unwrap();
    let (_, created) = request(&app, "POST", "/api/todos", Some(json!({ "body": "x" }))).await;
    let path = format!("/api/todos/{}", id_of(&created));
    store.close().await;

    let (status, body) = request(&app, "GET", "/api/todos", None).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to fetch todos" }));

    let (status, body) = request(&app, "POST", "/api/todos", Some(json!({ "body": "y" }))).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to create todo" }));

    let (status, body) = request(&app, "PATCH", &path, None).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to update todo" }));

    let (status, body) = request(&app, "DELETE", &path, None).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to delete todo" }));
}

fn id_of(todo: &Value) -> String {
    match &todo["id"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => panic!("unexpected id {other}"),
    }
}

async fn request(app: &Router, method: &str, path: &str, body: Option<Value>) -> (u16, Value) {
    let res = raw_request(app, method, path, body, None).await;
    let status = res.status().as_u16();
    let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn raw_request(app: &Router, method: &str, path: &str, body: Option<Value>, origin: Option<&str>) -> hyper::Response<Body> {
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let mut req = Request::builder().method(Method::from_bytes(method.as_bytes()).unwrap()).uri(path);
    if let Some(origin) = origin {
        req = req.header("origin", origin);
    }
    let req = match body {
        Some(json) => req.header("content-type", "application/json").body(Body::from(json.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
}

async fn post_raw(app: &Router, payload: &str, content_type: Option<&str>) -> (u16, Value) {
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let mut req = Request::builder().method(Method::POST).uri("/api/todos");
    if let Some(content_type) = content_type {
        req = req.header("content-type", content_type);
    }
    let res = app.clone().oneshot(req.body(Body::from(payload.to_string())).unwrap()).await.unwrap();
    let status = res.status().as_u16();
    let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
