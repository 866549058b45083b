use crate::error::CoreError;
use crate::models::{
    CompletionResult, Element, NewTaskData, Task, TaskStatus, UpdateTaskData,
};
use crate::query::Query;
use crate::recurrence::next_occurrence_after;
use crate::repository::query_builder::SqlQueryBuilder;
use crate::repository::{short_id_like_pattern, SqliteRepository, TaskRow, TimelineRepository};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        if data.repeat.is_some() && data.due_on.is_none() {
            return Err(CoreError::InvalidInput(
                "A recurring task needs a due date to anchor its occurrences.".to_string(),
            ));
        }
        if data.repeat.is_none() && data.repeat_until.is_some() {
            return Err(CoreError::InvalidInput(
                "'until' only applies to recurring tasks.".to_string(),
            ));
        }

        let mut tx = self.pool().begin().await?;
        let task = Self::add_task_in_transaction(&mut tx, data).await?;
        tx.commit().await?;

        // Recurring templates materialize their window up front so the next
        // list/timeline query sees the occurrences immediately.
        if task.is_template() {
            self.refresh_timeline(self.window(), Utc::now().date_naive())
                .await?;
        }

        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks_by_short_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError> {
        let tasks: Vec<Task> = sqlx::query_as("SELECT * FROM tasks WHERE hex(id) LIKE $1")
            .bind(short_id_like_pattern(prefix))
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_tasks_with_details(&self, query: &Query) -> Result<Vec<TaskRow>, CoreError> {
        // Materialize before any query so recurring occurrences are never
        // missing from the result set.
        self.refresh_timeline(self.window(), Utc::now().date_naive())
            .await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"SELECT t.*, e.name AS element_name
            FROM tasks t
            LEFT JOIN elements e ON t.element_id = e.id
            WHERE "#,
        );
        SqlQueryBuilder::build_sql_where_clause(query, &mut qb);
        qb.push(" ORDER BY t.due_on IS NULL, t.due_on, t.created_at");

        let tasks = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        let mut task: Task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let recurrence_changed =
            data.due_on.is_some() || data.repeat.is_some() || data.repeat_until.is_some();

        if let Some(name) = data.name {
            task.name = name;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(due_on) = data.due_on {
            task.due_on = due_on;
        }
        if let Some(status) = data.status {
            task.status = status.clone();
            task.completed_at = match status {
                TaskStatus::Completed => Some(Utc::now()),
                _ => None,
            };
        }
        if let Some(repeat) = data.repeat {
            task.repeat = repeat;
            if task.repeat.is_none() {
                task.repeat_until = None;
            }
        }
        if let Some(repeat_until) = data.repeat_until {
            task.repeat_until = repeat_until;
        }
        if let Some(element_name) = data.element_name {
            task.element_id = match element_name {
                Some(name) => Some(Self::element_id_by_name(&mut tx, &name).await?),
                None => None,
            };
        }

        if task.repeat.is_some() && task.due_on.is_none() {
            return Err(CoreError::InvalidInput(
                "A recurring task needs a due date to anchor its occurrences.".to_string(),
            ));
        }

        task.updated_at = Utc::now();

        let updated: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET name = $1, description = $2, status = $3, due_on = $4,
                repeat = $5, repeat_until = $6, completed_at = $7,
                updated_at = $8, element_id = $9
            WHERE id = $10
            RETURNING *"#,
        )
        .bind(&task.name)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.due_on)
        .bind(task.repeat)
        .bind(task.repeat_until)
        .bind(task.completed_at)
        .bind(task.updated_at)
        .bind(task.element_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        // A changed anchor, cadence, or end bound invalidates pending
        // occurrences; drop them and let the next refresh rebuild the window.
        if recurrence_changed && updated.origin_task_id.is_none() {
            sqlx::query(
                "DELETE FROM tasks WHERE origin_task_id = $1 AND status = 'pending'",
            )
            .bind(updated.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn complete_task(&self, id: Uuid) -> Result<CompletionResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task: Task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let completed: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET status = $1, completed_at = $2, updated_at = $2
            WHERE id = $3
            RETURNING *"#,
        )
        .bind(TaskStatus::Completed)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        // Series-aware completion: find the template this task belongs to
        // and materialize the next occurrence when it is still in range.
        let template_id = task.origin_task_id.or_else(|| task.repeat.map(|_| task.id));
        let Some(template_id) = template_id else {
            tx.commit().await?;
            return Ok(CompletionResult::Single(completed));
        };

        let template: Task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(template_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(template_id.to_string()))?;

        let (Some(cadence), Some(anchor)) = (template.repeat, template.due_on) else {
            tx.commit().await?;
            return Ok(CompletionResult::Single(completed));
        };

        let today = Utc::now().date_naive();
        let (_, window_end) = self.window().range_from(today);
        let after = completed.due_on.unwrap_or(anchor);

        let next = match next_occurrence_after(anchor, cadence, after) {
            Some(next_date)
                if next_date <= window_end
                    && template.repeat_until.map_or(true, |until| next_date <= until) =>
            {
                let existing: Option<Task> = sqlx::query_as(
                    "SELECT * FROM tasks WHERE origin_task_id = $1 AND due_on = $2",
                )
                .bind(template.id)
                .bind(next_date)
                .fetch_optional(&mut *tx)
                .await?;

                match existing {
                    Some(task) => Some(task),
                    None => {
                        let instance =
                            Self::insert_occurrence(&mut tx, &template, next_date).await?;
                        Some(instance)
                    }
                }
            }
            _ => None,
        };

        tx.commit().await?;
        Ok(CompletionResult::Recurring { completed, next })
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl SqliteRepository {
    pub(crate) async fn add_task_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        mut data: NewTaskData,
    ) -> Result<Task, CoreError> {
        if data.element_id.is_none() {
            if let Some(element_name) = &data.element_name {
                data.element_id = Some(Self::element_id_by_name(tx, element_name).await?);
            }
        }

        let task = Task {
            id: Uuid::now_v7(),
            name: data.name,
            description: data.description,
            status: TaskStatus::Pending,
            due_on: data.due_on,
            repeat: data.repeat,
            repeat_until: data.repeat_until,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            element_id: data.element_id,
            origin_task_id: None,
        };

        sqlx::query(
            r#"INSERT INTO tasks (id, name, description, status, due_on, repeat, repeat_until, completed_at, created_at, updated_at, element_id, origin_task_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.due_on)
        .bind(task.repeat)
        .bind(task.repeat_until)
        .bind(task.completed_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(task.element_id)
        .bind(task.origin_task_id)
        .execute(&mut **tx)
        .await?;

        Ok(task)
    }

    /// Inserts one materialized occurrence row for `template` on `due_on`.
    pub(crate) async fn insert_occurrence(
        tx: &mut Transaction<'_, Sqlite>,
        template: &Task,
        due_on: chrono::NaiveDate,
    ) -> Result<Task, CoreError> {
        let instance = Task {
            id: Uuid::now_v7(),
            name: template.name.clone(),
            description: template.description.clone(),
            status: TaskStatus::Pending,
            due_on: Some(due_on),
            repeat: None,
            repeat_until: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            element_id: template.element_id,
            origin_task_id: Some(template.id),
        };

        sqlx::query(
            r#"INSERT INTO tasks (id, name, description, status, due_on, repeat, repeat_until, completed_at, created_at, updated_at, element_id, origin_task_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(instance.id)
        .bind(&instance.name)
        .bind(&instance.description)
        .bind(&instance.status)
        .bind(instance.due_on)
        .bind(instance.repeat)
        .bind(instance.repeat_until)
        .bind(instance.completed_at)
        .bind(instance.created_at)
        .bind(instance.updated_at)
        .bind(instance.element_id)
        .bind(instance.origin_task_id)
        .execute(&mut **tx)
        .await?;

        Ok(instance)
    }

    async fn element_id_by_name(
        tx: &mut Transaction<'_, Sqlite>,
        name: &str,
    ) -> Result<Uuid, CoreError> {
        let element: Option<Element> = sqlx::query_as("SELECT * FROM elements WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
        element
            .map(|e| e.id)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))
    }
}
