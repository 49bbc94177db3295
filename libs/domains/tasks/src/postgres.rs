use async_trait::async_trait;
use axum_helpers::pagination::{Page, SortDirection};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{CreateTask, PatchTask, Task, TaskQuery, TaskSortField, UpdateTask},
    repository::TaskRepository,
};

/// PostgreSQL-backed implementation of [`TaskRepository`]
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> TaskResult<Option<entity::Model>> {
        entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))
    }

    /// Persist a fully materialized domain task over its stored row.
    async fn save(&self, task: &Task) -> TaskResult<Task> {
        let active_model = entity::ActiveModel {
            id: Set(task.id),
            title: Set(task.title.clone()),
            text: Set(task.text.clone()),
            answer: Set(task.answer.clone()),
            created_at: Set(task.created_at.into()),
            updated_at: Set(task.updated_at.into()),
        };

        let updated = entity::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        Ok(updated.into())
    }
}

fn apply_sort(query: Select<entity::Entity>, sort: (TaskSortField, SortDirection)) -> Select<entity::Entity> {
    let (field, direction) = sort;
    let column = match field {
        TaskSortField::Id => entity::Column::Id,
        TaskSortField::Title => entity::Column::Title,
        TaskSortField::Text => entity::Column::Text,
        TaskSortField::Answer => entity::Column::Answer,
        TaskSortField::CreatedAt => entity::Column::CreatedAt,
        TaskSortField::UpdatedAt => entity::Column::UpdatedAt,
    };

    match direction {
        SortDirection::Asc => query.order_by_asc(column),
        SortDirection::Desc => query.order_by_desc(column),
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = input.into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        tracing::info!(task_id = %model.id, "Created task");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let model = self.find_model(id).await?;
        Ok(model.map(|m| m.into()))
    }

    async fn exists(&self, id: Uuid) -> TaskResult<bool> {
        let count = entity::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn list(&self, query: TaskQuery) -> TaskResult<Page<Task>> {
        let total = entity::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        let select = apply_sort(entity::Entity::find(), query.sort)
            .limit(query.limit)
            .offset(query.offset);

        let models = select
            .all(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        Ok(Page::new(
            models.into_iter().map(|m| m.into()).collect(),
            total,
        ))
    }

    async fn replace(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        let model = self.find_model(id).await?.ok_or(TaskError::NotFound(id))?;

        let mut task: Task = model.into();
        task.apply_replace(input);

        let updated = self.save(&task).await?;
        tracing::info!(task_id = %id, "Updated task");
        Ok(updated)
    }

    async fn merge(&self, id: Uuid, input: PatchTask) -> TaskResult<Task> {
        let model = self.find_model(id).await?.ok_or(TaskError::NotFound(id))?;

        let mut task: Task = model.into();
        task.apply_patch(input);

        let updated = self.save(&task).await?;
        tracing::info!(task_id = %id, "Patched task");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
