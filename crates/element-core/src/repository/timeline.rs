use crate::error::CoreError;
use crate::models::Task;
use crate::query::Query;
use crate::recurrence::occurrences_between;
use crate::repository::query_builder::SqlQueryBuilder;
use crate::repository::{SqliteRepository, TaskRow};
use crate::timeline::TimelineWindow;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashSet;
use uuid::Uuid;

#[async_trait]
impl super::TimelineRepository for SqliteRepository {
    async fn refresh_timeline(
        &self,
        window: TimelineWindow,
        today: NaiveDate,
    ) -> Result<usize, CoreError> {
        let templates: Vec<Task> = sqlx::query_as(
            "SELECT * FROM tasks WHERE repeat IS NOT NULL AND status = 'pending'",
        )
        .fetch_all(self.pool())
        .await?;

        let mut created = 0;
        for template in templates {
            created += self
                .refresh_single_template(&template, window, today)
                .await?;
        }
        Ok(created)
    }

    async fn timeline_tasks(
        &self,
        window: TimelineWindow,
        today: NaiveDate,
        query: &Query,
    ) -> Result<Vec<TaskRow>, CoreError> {
        self.refresh_timeline(window, today).await?;

        let (window_start, window_end) = window.range_from(today);

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"SELECT t.*, e.name AS element_name
            FROM tasks t
            LEFT JOIN elements e ON t.element_id = e.id
            WHERE t.due_on IS NOT NULL
              AND t.due_on >= "#,
        );
        qb.push_bind(window_start);
        qb.push(" AND t.due_on <= ");
        qb.push_bind(window_end);
        qb.push(" AND (");
        SqlQueryBuilder::build_sql_where_clause(query, &mut qb);
        qb.push(") ORDER BY t.due_on, t.created_at");

        let tasks = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(tasks)
    }
}

impl SqliteRepository {
    /// Materializes the missing occurrences of a single template inside the
    /// window, deduplicating against rows that already exist. Safe to run
    /// any number of times.
    async fn refresh_single_template(
        &self,
        template: &Task,
        window: TimelineWindow,
        today: NaiveDate,
    ) -> Result<usize, CoreError> {
        let (window_start, window_end) = window.range_from(today);

        let (Some(cadence), Some(anchor)) = (template.repeat, template.due_on) else {
            return Ok(0);
        };

        let horizon = match template.repeat_until {
            Some(until) => until.min(window_end),
            None => window_end,
        };

        let mut tx = self.pool().begin().await?;

        let existing_dates: Vec<(NaiveDate,)> = sqlx::query_as(
            "SELECT due_on FROM tasks WHERE origin_task_id = $1 AND due_on IS NOT NULL",
        )
        .bind(template.id)
        .fetch_all(&mut *tx)
        .await?;
        let existing: HashSet<NaiveDate> = existing_dates.into_iter().map(|(d,)| d).collect();

        let mut created = 0;
        for occurrence in occurrences_between(anchor, horizon, cadence) {
            if occurrence < window_start {
                continue;
            }
            if existing.contains(&occurrence) {
                continue;
            }
            Self::insert_occurrence(&mut tx, template, occurrence).await?;
            created += 1;
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Occurrence rows currently materialized for a template, oldest first.
    pub async fn occurrences_for_template(&self, template_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            "SELECT * FROM tasks WHERE origin_task_id = $1 ORDER BY due_on",
        )
        .bind(template_id)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }
}
