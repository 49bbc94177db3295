use async_trait::async_trait;
use axum_helpers::pagination::{Page, SortDirection};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, PatchTask, Task, TaskQuery, TaskSortField, UpdateTask};

/// Repository trait for Task persistence
///
/// This trait defines the data access interface for tasks.
/// Implementations can use different storage backends (PostgreSQL, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// Get a task by ID
    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// Check whether a task with the given ID exists
    async fn exists(&self, id: Uuid) -> TaskResult<bool>;

    /// List one page of tasks together with the total count
    async fn list(&self, query: TaskQuery) -> TaskResult<Page<Task>>;

    /// Replace all fields of an existing task
    async fn replace(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task>;

    /// Merge the provided fields into an existing task
    async fn merge(&self, id: Uuid, input: PatchTask) -> TaskResult<Task>;

    /// Delete a task by ID, returning whether a record was removed
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}

/// In-memory implementation of TaskRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn compare_tasks(a: &Task, b: &Task, field: TaskSortField) -> std::cmp::Ordering {
    match field {
        TaskSortField::Id => a.id.cmp(&b.id),
        TaskSortField::Title => a.title.cmp(&b.title),
        TaskSortField::Text => a.text.cmp(&b.text),
        TaskSortField::Answer => a.answer.cmp(&b.answer),
        TaskSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        TaskSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let now = chrono::Utc::now();
        let task = Task {
            id: Uuid::now_v7(),
            title: input.title,
            text: input.text,
            answer: input.answer,
            created_at: now,
            updated_at: now,
        };
        tasks.insert(task.id, task.clone());

        tracing::info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> TaskResult<bool> {
        let tasks = self.tasks.read().await;
        Ok(tasks.contains_key(&id))
    }

    async fn list(&self, query: TaskQuery) -> TaskResult<Page<Task>> {
        let tasks = self.tasks.read().await;

        let total = tasks.len() as u64;
        let mut result: Vec<Task> = tasks.values().cloned().collect();

        let (field, direction) = query.sort;
        result.sort_by(|a, b| {
            let ordering = compare_tasks(a, b, field);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let items: Vec<Task> = result
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();

        Ok(Page::new(items, total))
    }

    async fn replace(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        task.apply_replace(input);
        let updated = task.clone();

        tracing::info!(task_id = %id, "Updated task");
        Ok(updated)
    }

    async fn merge(&self, id: Uuid, input: PatchTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        task.apply_patch(input);
        let updated = task.clone();

        tracing::info!(task_id = %id, "Patched task");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;

        if tasks.remove(&id).is_some() {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
