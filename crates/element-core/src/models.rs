use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A hierarchical category ("element") that tasks and habits attach to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Element {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Repeat cadence for recurring tasks and habits.
///
/// A closed set: string parsing rejects anything outside it, and every
/// dispatch over the variants is exhaustive, so an unrecognized cadence is
/// a parse error at the boundary rather than a silent daily fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum RepeatCadence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid repeat cadence: '{0}'. Use daily, weekly, monthly, or yearly.")]
pub struct ParseRepeatCadenceError(String);

impl FromStr for RepeatCadence {
    type Err = ParseRepeatCadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(RepeatCadence::Daily),
            "weekly" | "week" => Ok(RepeatCadence::Weekly),
            "monthly" | "month" => Ok(RepeatCadence::Monthly),
            "yearly" | "year" => Ok(RepeatCadence::Yearly),
            _ => Err(ParseRepeatCadenceError(s.to_string())),
        }
    }
}

impl std::fmt::Display for RepeatCadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepeatCadence::Daily => write!(f, "daily"),
            RepeatCadence::Weekly => write!(f, "weekly"),
            RepeatCadence::Monthly => write!(f, "monthly"),
            RepeatCadence::Yearly => write!(f, "yearly"),
        }
    }
}

/// A task on the timeline.
///
/// A task with `repeat` set is a recurring template: its own `due_on` is the
/// anchor occurrence, and materialized occurrence rows point back at it via
/// `origin_task_id`. Plain tasks leave both fields empty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
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
}

impl Task {
    /// Whether this task is a recurring template.
    pub fn is_template(&self) -> bool {
        self.repeat.is_some()
    }

    /// Whether this task is a materialized occurrence of a template.
    pub fn is_occurrence(&self) -> bool {
        self.origin_task_id.is_some()
    }
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            name: "".to_string(),
            description: None,
            status: TaskStatus::Pending,
            due_on: None,
            repeat: None,
            repeat_until: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            element_id: None,
            origin_task_id: None,
        }
    }
}

/// A tracked habit. Completions are stored as [`HabitMark`] rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub cadence: RepeatCadence,
    pub element_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One completion of a habit on a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HabitMark {
    pub habit_id: Uuid,
    pub marked_on: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub name: String,
    pub description: Option<String>,
    pub due_on: Option<NaiveDate>,
    pub element_name: Option<String>, // Kept for CLI convenience
    pub element_id: Option<Uuid>,     // Used internally for transactions
    pub repeat: Option<RepeatCadence>,
    pub repeat_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub due_on: Option<Option<NaiveDate>>,
    pub status: Option<TaskStatus>,
    pub element_name: Option<Option<String>>,
    pub repeat: Option<Option<RepeatCadence>>,
    pub repeat_until: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewHabitData {
    pub name: String,
    pub cadence: Option<RepeatCadence>,
    pub element_name: Option<String>,
}

#[derive(Debug)]
pub enum CompletionResult {
    Single(Task),
    /// Completing an occurrence (or a template) of a recurring task; `next`
    /// is the next occurrence when one falls inside the timeline window.
    Recurring { completed: Task, next: Option<Task> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cadence_accepts_known_values() {
        assert_eq!("daily".parse::<RepeatCadence>(), Ok(RepeatCadence::Daily));
        assert_eq!("WEEKLY".parse::<RepeatCadence>(), Ok(RepeatCadence::Weekly));
        assert_eq!("month".parse::<RepeatCadence>(), Ok(RepeatCadence::Monthly));
        assert_eq!("Year".parse::<RepeatCadence>(), Ok(RepeatCadence::Yearly));
    }

    #[test]
    fn parse_cadence_rejects_unknown_values() {
        assert!("fortnightly".parse::<RepeatCadence>().is_err());
        assert!("".parse::<RepeatCadence>().is_err());
        assert!("dailyy".parse::<RepeatCadence>().is_err());
    }

    #[test]
    fn cadence_display_round_trips() {
        for cadence in [
            RepeatCadence::Daily,
            RepeatCadence::Weekly,
            RepeatCadence::Monthly,
            RepeatCadence::Yearly,
        ] {
            assert_eq!(cadence.to_string().parse::<RepeatCadence>(), Ok(cadence));
        }
    }

    #[test]
    fn template_and_occurrence_flags() {
        let template = Task {
            repeat: Some(RepeatCadence::Daily),
            ..Default::default()
        };
        assert!(template.is_template());
        assert!(!template.is_occurrence());

        let occurrence = Task {
            origin_task_id: Some(template.id),
            ..Default::default()
        };
        assert!(occurrence.is_occurrence());
        assert!(!occurrence.is_template());
    }
}
