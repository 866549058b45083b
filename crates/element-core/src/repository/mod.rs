use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    CompletionResult, Element, Habit, HabitMark, NewHabitData, NewTaskData, RepeatCadence, Task,
    TaskStatus, UpdateTaskData,
};
use crate::query::Query;
use crate::timeline::TimelineWindow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export domain modules
pub mod elements;
pub mod habits;
pub mod query_builder;
pub mod tasks;
pub mod timeline;

// Traits are defined in this module and implemented in respective domain modules

/// Task row with its element name joined in, as rendered by list/timeline
/// views.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_on: Option<NaiveDate>,
    pub repeat: Option<RepeatCadence>,
    pub repeat_until: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub element_id: Option<Uuid>,
    pub origin_task_id: Option<Uuid>,
    pub element_name: Option<String>,
}

/// Element row with its depth in the hierarchy, from the tree query.
#[derive(Debug, Clone, FromRow)]
pub struct ElementNode {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub depth: i32,
}

/// Domain-specific trait for task operations
#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn find_tasks_by_short_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError>;
    async fn find_tasks_with_details(&self, query: &Query) -> Result<Vec<TaskRow>, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn complete_task(&self, id: Uuid) -> Result<CompletionResult, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for element (category hierarchy) operations
#[async_trait]
pub trait ElementRepository {
    async fn add_element(
        &self,
        name: String,
        parent: Option<String>,
        color: Option<String>,
    ) -> Result<Element, CoreError>;
    async fn find_element_by_name(&self, name: &str) -> Result<Option<Element>, CoreError>;
    async fn element_tree(&self) -> Result<Vec<ElementNode>, CoreError>;
    async fn move_element(&self, name: &str, new_parent: Option<&str>) -> Result<Element, CoreError>;
    async fn delete_element(&self, name: &str) -> Result<(), CoreError>;
}

/// Domain-specific trait for habit operations
#[async_trait]
pub trait HabitRepository {
    async fn add_habit(&self, data: NewHabitData) -> Result<Habit, CoreError>;
    async fn find_habits(&self) -> Result<Vec<Habit>, CoreError>;
    async fn find_habits_by_short_id_prefix(&self, prefix: &str) -> Result<Vec<Habit>, CoreError>;
    async fn mark_habit(&self, id: Uuid, on: NaiveDate) -> Result<HabitMark, CoreError>;
    async fn habit_marks(&self, id: Uuid) -> Result<Vec<HabitMark>, CoreError>;
    async fn delete_habit(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for timeline materialization and windowed fetch
#[async_trait]
pub trait TimelineRepository {
    /// Materializes occurrence rows for every pending recurring template
    /// inside the window. Idempotent; returns the number of rows created.
    async fn refresh_timeline(
        &self,
        window: TimelineWindow,
        today: NaiveDate,
    ) -> Result<usize, CoreError>;

    /// Refreshes, then fetches the tasks whose due date falls inside the
    /// window, filtered by `query` and ordered by date.
    async fn timeline_tasks(
        &self,
        window: TimelineWindow,
        today: NaiveDate,
        query: &Query,
    ) -> Result<Vec<TaskRow>, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository:
    TaskRepository + ElementRepository + HabitRepository + TimelineRepository
{
    // This trait automatically composes all domain-specific repositories
    // Individual domain operations are defined in their respective traits
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
    window: TimelineWindow,
}

impl SqliteRepository {
    pub fn new(pool: DbPool, window: TimelineWindow) -> Self {
        Self { pool, window }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// The window used when a caller does not supply one explicitly.
    pub fn window(&self) -> TimelineWindow {
        self.window
    }
}

// The main Repository trait implementation will automatically be available
// when all domain trait implementations are defined
impl Repository for SqliteRepository {}

/// Turns a hyphenated UUID prefix into a `hex(id) LIKE` pattern. Ids are
/// stored as 16-byte blobs, so prefix matching goes through sqlite's
/// `hex()`, which yields the uppercase simple form.
pub(crate) fn short_id_like_pattern(prefix: &str) -> String {
    let mut pattern: String = prefix
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    pattern.push('%');
    pattern
}
