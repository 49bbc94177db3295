use axum_helpers::pagination::{Page, PageParams};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, PatchTask, Task, TaskQuery, UpdateTask};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new task with validation
    #[instrument(skip(self, input), fields(task_title = %input.title))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        // Validate input
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a task by ID
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get_task(&self, id: Uuid) -> TaskResult<Task> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// List one page of tasks
    pub async fn list_tasks(&self, params: PageParams) -> TaskResult<Page<Task>> {
        let query = TaskQuery::from_params(&params)?;
        self.repository.list(query).await
    }

    /// Fully replace a task
    ///
    /// The body id must be present and equal to the path id, and the task
    /// must already exist.
    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn update_task(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;
        self.check_id(id, input.id).await?;

        self.repository.replace(id, input).await
    }

    /// Partially update a task
    ///
    /// Only fields present in the body are changed. The same id checks as
    /// for full updates apply.
    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn patch_task(&self, id: Uuid, input: PatchTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;
        self.check_id(id, input.id).await?;

        self.repository.merge(id, input).await
    }

    /// Delete a task
    ///
    /// Deleting an unknown id is not an error; the operation is idempotent.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: Uuid) -> TaskResult<()> {
        let deleted = self.repository.delete(id).await?;
        if !deleted {
            tracing::debug!(task_id = %id, "Delete for unknown task id");
        }

        Ok(())
    }

    /// Verify that an update body targets the task addressed by the path.
    async fn check_id(&self, path_id: Uuid, body_id: Option<Uuid>) -> TaskResult<()> {
        let body_id = body_id.ok_or(TaskError::IdMissing)?;
        if body_id != path_id {
            return Err(TaskError::IdMismatch);
        }
        if !self.repository.exists(path_id).await? {
            return Err(TaskError::NotFound(path_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockTaskRepository;
    use chrono::Utc;

    fn sample_task(id: Uuid) -> Task {
        Task {
            id,
            title: "Geography".to_string(),
            text: "Capital of France?".to_string(),
            answer: "Paris".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn update_input(id: Option<Uuid>) -> UpdateTask {
        UpdateTask {
            id,
            title: "Geography".to_string(),
            text: "Capital of Spain?".to_string(),
            answer: "Madrid".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_task_rejects_invalid_input() {
        let repo = MockTaskRepository::new();
        let service = TaskService::new(repo);

        let result = service
            .create_task(CreateTask {
                title: String::new(),
                text: "q".to_string(),
                answer: "a".to_string(),
            })
            .await;

        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_task_maps_missing_to_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        let service = TaskService::new(repo);

        let result = service.get_task(Uuid::now_v7()).await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_task_requires_body_id() {
        let repo = MockTaskRepository::new();
        let service = TaskService::new(repo);

        let result = service.update_task(Uuid::now_v7(), update_input(None)).await;
        assert!(matches!(result, Err(TaskError::IdMissing)));
    }

    #[tokio::test]
    async fn test_update_task_rejects_mismatched_id() {
        let repo = MockTaskRepository::new();
        let service = TaskService::new(repo);

        let result = service
            .update_task(Uuid::now_v7(), update_input(Some(Uuid::now_v7())))
            .await;
        assert!(matches!(result, Err(TaskError::IdMismatch)));
    }

    #[tokio::test]
    async fn test_update_task_rejects_unknown_id() {
        let mut repo = MockTaskRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        let service = TaskService::new(repo);

        let id = Uuid::now_v7();
        let result = service.update_task(id, update_input(Some(id))).await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_task_replaces_existing() {
        let id = Uuid::now_v7();
        let mut repo = MockTaskRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_replace().returning(move |id, input| {
            let mut task = sample_task(id);
            task.apply_replace(input);
            Ok(task)
        });
        let service = TaskService::new(repo);

        let task = service.update_task(id, update_input(Some(id))).await.unwrap();
        assert_eq!(task.answer, "Madrid");
    }

    #[tokio::test]
    async fn test_patch_task_applies_id_checks() {
        let repo = MockTaskRepository::new();
        let service = TaskService::new(repo);

        let result = service
            .patch_task(Uuid::now_v7(), PatchTask::default())
            .await;
        assert!(matches!(result, Err(TaskError::IdMissing)));
    }

    #[tokio::test]
    async fn test_patch_task_merges_fields() {
        let id = Uuid::now_v7();
        let mut repo = MockTaskRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_merge().returning(move |id, input| {
            let mut task = sample_task(id);
            task.apply_patch(input);
            Ok(task)
        });
        let service = TaskService::new(repo);

        let task = service
            .patch_task(
                id,
                PatchTask {
                    id: Some(id),
                    answer: Some("Lyon".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(task.answer, "Lyon");
        assert_eq!(task.title, "Geography");
    }

    #[tokio::test]
    async fn test_delete_task_is_idempotent() {
        let mut repo = MockTaskRepository::new();
        repo.expect_delete().returning(|_| Ok(false));
        let service = TaskService::new(repo);

        // Unknown ids still delete successfully
        assert!(service.delete_task(Uuid::now_v7()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_tasks_rejects_unknown_sort_field() {
        let repo = MockTaskRepository::new();
        let service = TaskService::new(repo);

        let params = PageParams {
            sort: Some("priority,asc".to_string()),
            ..Default::default()
        };
        let result = service.list_tasks(params).await;
        assert!(matches!(result, Err(TaskError::Validation(_))));
    }
}
