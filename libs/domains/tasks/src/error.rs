use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::errors::{error_response_with_details, ErrorCode};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Entity name reported in keyed error responses.
pub const ENTITY_NAME: &str = "task";

/// Error key for update requests without an id in the body.
pub const KEY_ID_NULL: &str = "idnull";
/// Error key for update requests whose body id differs from the path id.
pub const KEY_ID_INVALID: &str = "idinvalid";
/// Error key for update requests targeting a task that does not exist.
pub const KEY_ID_NOT_FOUND: &str = "idnotfound";

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid id: a task id is required")]
    IdMissing,

    #[error("Invalid id: body id does not match path id")]
    IdMismatch,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    /// Error key reported to clients for id-related failures.
    fn error_key(&self) -> Option<&'static str> {
        match self {
            TaskError::NotFound(_) => Some(KEY_ID_NOT_FOUND),
            TaskError::IdMissing => Some(KEY_ID_NULL),
            TaskError::IdMismatch => Some(KEY_ID_INVALID),
            _ => None,
        }
    }
}

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => AppError::NotFound(format!("Task {} not found", id)),
            TaskError::IdMissing | TaskError::IdMismatch => {
                AppError::BadRequest(err.to_string())
            }
            TaskError::Validation(msg) => AppError::BadRequest(msg),
            TaskError::Internal(msg) => AppError::InternalServerError(msg),
            TaskError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        // Id-related failures carry the entity name and error key so clients
        // can react to the specific failure rather than parsing messages.
        if let Some(key) = self.error_key() {
            let (status, code) = match self {
                TaskError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
                _ => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            };

            tracing::info!(entity = ENTITY_NAME, key, "Task request rejected: {}", self);
            return error_response_with_details(
                status,
                self.to_string(),
                code,
                Some(serde_json::json!({ "entity": ENTITY_NAME, "key": key })),
            );
        }

        // Everything else uses the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Implement From for sea_orm::DbErr
impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaskError::Database(err.to_string())
    }
}
