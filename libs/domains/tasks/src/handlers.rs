use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::extractors::{UuidPath, ValidatedJson};
use axum_helpers::pagination::{pagination_headers, PageParams};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::TaskResult;
use crate::models::{CreateTask, PatchTask, Task, UpdateTask};
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// OpenAPI documentation for the Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, get_task, create_task, update_task, patch_task, delete_task),
    components(schemas(Task, CreateTask, UpdateTask, PatchTask)),
    tags(
        (name = "tasks", description = "Task management operations")
    )
)]
pub struct ApiDoc;

/// Create the tasks router with its service state applied
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route(
            "/{id}",
            get(get_task)
                .put(update_task)
                .patch(patch_task)
                .delete(delete_task),
        )
        .with_state(shared_service)
}

/// List one page of tasks
///
/// The total number of tasks across all pages is returned in the
/// `X-Total-Count` response header.
#[utoipa::path(
    get,
    path = "",
    tag = "tasks",
    params(PageParams),
    responses(
        (status = 200, description = "One page of tasks", body = Vec<Task>,
            headers(("x-total-count" = String, description = "Total number of tasks"))),
        (status = 400, description = "Invalid pagination or sort parameters"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(params): Query<PageParams>,
) -> TaskResult<impl IntoResponse> {
    let page = service.list_tasks(params).await?;
    Ok((pagination_headers(page.total), Json(page.items)))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, description = "Invalid task ID"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<impl IntoResponse> {
    let task = service.get_task(id).await?;
    Ok(Json(task))
}

/// Create a new task
///
/// The location of the created task is returned in the `Location` header.
#[utoipa::path(
    post,
    path = "",
    tag = "tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task,
            headers(("location" = String, description = "URL of the created task"))),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(input).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/tasks/{}", task.id).parse() {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(task)))
}

/// Fully replace a task
///
/// The body must carry the task id matching the path id, and the task
/// must already exist.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, description = "Invalid request or mismatched id"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.update_task(id, input).await?;
    Ok(Json(task))
}

/// Partially update a task
///
/// Only fields present in the body are applied; absent fields keep
/// their current values.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = PatchTask,
    responses(
        (status = 200, description = "Task patched successfully", body = Task),
        (status = 400, description = "Invalid request or mismatched id"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn patch_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<PatchTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.patch_task(id, input).await?;
    Ok(Json(task))
}

/// Delete a task
///
/// Deletion is idempotent: deleting an unknown id still returns 204.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid task ID"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<impl IntoResponse> {
    service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
