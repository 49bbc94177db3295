use axum_helpers::pagination::{PageParams, SortDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};

/// Task entity - a question with its expected answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Task title
    pub title: String,
    /// Task text (the question)
    pub text: String,
    /// Expected answer
    pub answer: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new task
///
/// The server assigns the identifier; clients must not send one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub answer: String,
}

/// DTO for fully replacing an existing task
///
/// The body carries the task id so it can be checked against the path;
/// a missing or mismatching id is rejected before any lookup.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub answer: String,
}

/// DTO for partially updating a task
///
/// Only fields present in the body are applied; absent fields keep
/// their current values.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PatchTask {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(length(min = 1))]
    pub answer: Option<String>,
}

/// Fields tasks can be sorted by in list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    Id,
    Title,
    Text,
    Answer,
    CreatedAt,
    UpdatedAt,
}

impl TaskSortField {
    /// Parse a sort field name from a query string.
    ///
    /// Accepts both camelCase (as clients commonly send) and snake_case.
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "text" => Some(Self::Text),
            "answer" => Some(Self::Answer),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

/// Validated pagination and sorting for task list queries.
///
/// Built from raw [`PageParams`]; an unknown sort field is a validation
/// error. When no sort is requested, newest tasks come first.
#[derive(Debug, Clone, Copy)]
pub struct TaskQuery {
    pub limit: u64,
    pub offset: u64,
    pub sort: (TaskSortField, SortDirection),
}

impl TaskQuery {
    pub fn from_params(params: &PageParams) -> TaskResult<Self> {
        let sort = match params.sort_spec() {
            Some((field, direction)) => {
                let field = TaskSortField::parse(field).ok_or_else(|| {
                    TaskError::Validation(format!("Unknown sort field: {}", field))
                })?;
                (field, direction)
            }
            None => (TaskSortField::CreatedAt, SortDirection::Desc),
        };

        Ok(Self {
            limit: params.limit(),
            offset: params.offset(),
            sort,
        })
    }
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            limit: axum_helpers::pagination::DEFAULT_PAGE_SIZE,
            offset: 0,
            sort: (TaskSortField::CreatedAt, SortDirection::Desc),
        }
    }
}

impl Task {
    /// Replace all client-editable fields from an UpdateTask DTO
    pub fn apply_replace(&mut self, update: UpdateTask) {
        self.title = update.title;
        self.text = update.text;
        self.answer = update.answer;
        self.updated_at = chrono::Utc::now();
    }

    /// Apply only the fields present in a PatchTask DTO
    pub fn apply_patch(&mut self, patch: PatchTask) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
        self.updated_at = chrono::Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: Uuid::now_v7(),
            title: "Geography".to_string(),
            text: "Capital of France?".to_string(),
            answer: "Paris".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_replace_overwrites_all_fields() {
        let mut task = sample_task();
        task.apply_replace(UpdateTask {
            id: Some(task.id),
            title: "Math".to_string(),
            text: "2 + 2?".to_string(),
            answer: "4".to_string(),
        });

        assert_eq!(task.title, "Math");
        assert_eq!(task.text, "2 + 2?");
        assert_eq!(task.answer, "4");
    }

    #[test]
    fn test_apply_patch_keeps_absent_fields() {
        let mut task = sample_task();
        task.apply_patch(PatchTask {
            answer: Some("Lyon".to_string()),
            ..Default::default()
        });

        assert_eq!(task.title, "Geography");
        assert_eq!(task.text, "Capital of France?");
        assert_eq!(task.answer, "Lyon");
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!(TaskSortField::parse("title"), Some(TaskSortField::Title));
        assert_eq!(
            TaskSortField::parse("createdAt"),
            Some(TaskSortField::CreatedAt)
        );
        assert_eq!(
            TaskSortField::parse("created_at"),
            Some(TaskSortField::CreatedAt)
        );
        assert_eq!(TaskSortField::parse("priority"), None);
    }

    #[test]
    fn test_task_query_rejects_unknown_sort_field() {
        let params = PageParams {
            sort: Some("priority,desc".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            TaskQuery::from_params(&params),
            Err(TaskError::Validation(_))
        ));
    }

    #[test]
    fn test_task_query_defaults_to_newest_first() {
        let query = TaskQuery::from_params(&PageParams::default()).unwrap();
        assert_eq!(query.sort, (TaskSortField::CreatedAt, SortDirection::Desc));
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
    }
}
