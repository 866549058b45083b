use crate::error::CoreError;
use crate::models::{Habit, HabitMark, NewHabitData, RepeatCadence};
use crate::repository::{short_id_like_pattern, ElementRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

#[async_trait]
impl super::HabitRepository for SqliteRepository {
    async fn add_habit(&self, data: NewHabitData) -> Result<Habit, CoreError> {
        if data.name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "Habit name cannot be empty.".to_string(),
            ));
        }

        let element_id = match &data.element_name {
            Some(element_name) => Some(
                self.find_element_by_name(element_name)
                    .await?
                    .map(|e| e.id)
                    .ok_or_else(|| CoreError::NotFound(element_name.clone()))?,
            ),
            None => None,
        };

        let habit = Habit {
            id: Uuid::now_v7(),
            name: data.name,
            cadence: data.cadence.unwrap_or(RepeatCadence::Daily),
            element_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO habits (id, name, cadence, element_id, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(habit.id)
        .bind(&habit.name)
        .bind(habit.cadence)
        .bind(habit.element_id)
        .bind(habit.created_at)
        .execute(self.pool())
        .await?;

        Ok(habit)
    }

    async fn find_habits(&self) -> Result<Vec<Habit>, CoreError> {
        let habits = sqlx::query_as("SELECT * FROM habits ORDER BY created_at")
            .fetch_all(self.pool())
            .await?;
        Ok(habits)
    }

    async fn find_habits_by_short_id_prefix(&self, prefix: &str) -> Result<Vec<Habit>, CoreError> {
        let habits: Vec<Habit> = sqlx::query_as("SELECT * FROM habits WHERE hex(id) LIKE $1")
            .bind(short_id_like_pattern(prefix))
            .fetch_all(self.pool())
            .await?;
        Ok(habits)
    }

    async fn mark_habit(&self, id: Uuid, on: NaiveDate) -> Result<HabitMark, CoreError> {
        let habit: Option<Habit> = sqlx::query_as("SELECT * FROM habits WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        if habit.is_none() {
            return Err(CoreError::NotFound(id.to_string()));
        }

        // Marking the same date twice is a no-op, not an error.
        sqlx::query(
            "INSERT OR IGNORE INTO habit_marks (habit_id, marked_on) VALUES ($1, $2)",
        )
        .bind(id)
        .bind(on)
        .execute(self.pool())
        .await?;

        Ok(HabitMark {
            habit_id: id,
            marked_on: on,
        })
    }

    async fn habit_marks(&self, id: Uuid) -> Result<Vec<HabitMark>, CoreError> {
        let marks = sqlx::query_as(
            "SELECT * FROM habit_marks WHERE habit_id = $1 ORDER BY marked_on",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?;
        Ok(marks)
    }

    async fn delete_habit(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
