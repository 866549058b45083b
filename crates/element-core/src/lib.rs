//! # Element Core Library
//!
//! Core library for the Element planner: a calendar-style task timeline with
//! hierarchical "elements" (categories), habits, and recurring tasks.
//!
//! ## Features
//!
//! - **Recurring Tasks**: a closed repeat-cadence set (daily, weekly,
//!   monthly, yearly) expanded into concrete occurrence dates with pure,
//!   deterministic calendar arithmetic
//! - **Timeline Windowing**: a backward/forward day range anchored at
//!   "today" bounds materialization and queries; caller overrides are
//!   parsed permissively and clamped
//! - **Element Hierarchy**: nested categories with cycle-safe re-parenting
//! - **Habits**: cadence-based tracking with streak computation
//! - **Type Safety**: compile-time checked models over sqlx/SQLite
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and schema management
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`recurrence`]: Occurrence expansion and streak arithmetic
//! - [`timeline`]: Timeline window policy
//! - [`error`]: Error types with context
//! - [`query`]: Filter AST for list/timeline queries
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use element_core::{
//!     db,
//!     models::{NewTaskData, RepeatCadence},
//!     repository::{SqliteRepository, TaskRepository},
//!     timeline::TimelineWindow,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("element.db").await?;
//!     let repo = SqliteRepository::new(pool, TimelineWindow::default());
//!
//!     let task = repo
//!         .add_task(NewTaskData {
//!             name: "Water the plants".to_string(),
//!             due_on: Some(chrono::Utc::now().date_naive()),
//!             repeat: Some(RepeatCadence::Weekly),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created task: {}", task.name);
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod recurrence;
pub mod repository;
pub mod timeline;
