//! Handler tests for the Tasks domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes, Location and pagination headers
//! - Error responses with entity name and error key
//!
//! They run against the in-memory repository, so no database is needed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_tasks::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

fn test_app() -> Router {
    let repo = InMemoryTaskRepository::new();
    let service = TaskService::new(repo);
    handlers::router(service)
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_task(title: &str, text: &str, answer: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "title": title,
                "text": text,
                "answer": answer
            }))
            .unwrap(),
        ))
        .unwrap()
}

async fn create_task(app: &Router, title: &str) -> Task {
    let response = app
        .clone()
        .oneshot(post_task(title, "What is the answer?", "42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_task_returns_201_with_location() {
    let app = test_app();

    let response = app
        .oneshot(post_task("Geography", "Capital of France?", "Paris"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get("location")
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string();

    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.title, "Geography");
    assert_eq!(task.text, "Capital of France?");
    assert_eq!(task.answer, "Paris");
    assert_eq!(location, format!("/api/tasks/{}", task.id));
}

#[tokio::test]
async fn test_create_task_validates_input() {
    let app = test_app();

    // Empty title fails validation
    let response = app
        .oneshot(post_task("", "Question?", "Answer"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_task_rejects_missing_field() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "title": "No question" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    // Missing fields are a 400, not axum's default 422
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_task_returns_200() {
    let app = test_app();
    let created = create_task(&app, "History").await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.id, created.id);
    assert_eq!(task.title, "History");
}

#[tokio::test]
async fn test_get_task_returns_404_for_missing() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_task_returns_400_for_malformed_id() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn put_task(id: Uuid, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/{}", id))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_update_task_replaces_all_fields() {
    let app = test_app();
    let created = create_task(&app, "Math").await;

    let response = app
        .oneshot(put_task(
            created.id,
            json!({
                "id": created.id,
                "title": "Advanced math",
                "text": "2 + 2?",
                "answer": "4"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.id, created.id);
    assert_eq!(task.title, "Advanced math");
    assert_eq!(task.text, "2 + 2?");
    assert_eq!(task.answer, "4");
}

#[tokio::test]
async fn test_update_task_without_body_id_returns_400_idnull() {
    let app = test_app();
    let created = create_task(&app, "Math").await;

    let response = app
        .oneshot(put_task(
            created.id,
            json!({
                "title": "Math",
                "text": "2 + 2?",
                "answer": "4"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["entity"], "task");
    assert_eq!(body["details"]["key"], "idnull");
}

#[tokio::test]
async fn test_update_task_with_mismatched_id_returns_400_idinvalid() {
    let app = test_app();
    let created = create_task(&app, "Math").await;

    let response = app
        .oneshot(put_task(
            created.id,
            json!({
                "id": Uuid::now_v7(),
                "title": "Math",
                "text": "2 + 2?",
                "answer": "4"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["entity"], "task");
    assert_eq!(body["details"]["key"], "idinvalid");
}

#[tokio::test]
async fn test_update_task_for_unknown_id_returns_404_idnotfound() {
    let app = test_app();
    let missing_id = Uuid::now_v7();

    let response = app
        .oneshot(put_task(
            missing_id,
            json!({
                "id": missing_id,
                "title": "Math",
                "text": "2 + 2?",
                "answer": "4"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["entity"], "task");
    assert_eq!(body["details"]["key"], "idnotfound");
}

fn patch_task(id: Uuid, body: Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(format!("/{}", id))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_patch_task_merges_provided_fields() {
    let app = test_app();
    let created = create_task(&app, "Science").await;

    let response = app
        .oneshot(patch_task(
            created.id,
            json!({
                "id": created.id,
                "answer": "Photosynthesis"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let task: Task = json_body(response.into_body()).await;
    // Absent fields keep their current values
    assert_eq!(task.title, "Science");
    assert_eq!(task.text, created.text);
    assert_eq!(task.answer, "Photosynthesis");
}

#[tokio::test]
async fn test_patch_task_applies_same_id_checks() {
    let app = test_app();
    let created = create_task(&app, "Science").await;

    let response = app
        .clone()
        .oneshot(patch_task(created.id, json!({ "answer": "x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing_id = Uuid::now_v7();
    let response = app
        .oneshot(patch_task(missing_id, json!({ "id": missing_id, "answer": "x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task_returns_204_then_404_on_get() {
    let app = test_app();
    let created = create_task(&app, "Ephemeral").await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task_is_idempotent() {
    let app = test_app();

    // Unknown id still deletes successfully
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_tasks_returns_total_count_header() {
    let app = test_app();
    for i in 0..3 {
        create_task(&app, &format!("task-{}", i)).await;
    }

    let request = Request::builder()
        .method("GET")
        .uri("/?page=0&size=2")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-total-count").unwrap(), "3");

    let tasks: Vec<Task> = json_body(response.into_body()).await;
    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn test_list_tasks_sorts_by_requested_field() {
    let app = test_app();
    for title in ["bravo", "alpha", "charlie"] {
        create_task(&app, title).await;
    }

    let request = Request::builder()
        .method("GET")
        .uri("/?sort=title,asc")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let tasks: Vec<Task> = json_body(response.into_body()).await;
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["alpha", "bravo", "charlie"]);
}

#[tokio::test]
async fn test_list_tasks_rejects_unknown_sort_field() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/?sort=priority,asc")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
