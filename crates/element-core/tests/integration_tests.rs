use chrono::{Days, Utc};
use element_core::db::establish_connection;
use element_core::error::CoreError;
use element_core::models::*;
use element_core::query::{DueFilter, Filter, Query};
use element_core::repository::{
    ElementRepository, HabitRepository, SqliteRepository, TaskRepository, TimelineRepository,
};
use element_core::timeline::TimelineWindow;
use tempfile::TempDir;

/// Helper function to create a test database
async fn setup_test_db() -> (SqliteRepository, TempDir) {
    setup_test_db_with_window(TimelineWindow::default()).await
}

async fn setup_test_db_with_window(window: TimelineWindow) -> (SqliteRepository, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (SqliteRepository::new(pool, window), temp_dir)
}

/// Helper function to create a plain test task
async fn create_test_task(repo: &SqliteRepository, name: &str) -> Task {
    repo.add_task(NewTaskData {
        name: name.to_string(),
        description: Some(format!("Test task: {}", name)),
        due_on: Some(Utc::now().date_naive()),
        ..Default::default()
    })
    .await
    .expect("Failed to create test task")
}

#[tokio::test]
async fn test_basic_task_crud_workflow() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = create_test_task(&repo, "Test Task").await;
    assert_eq!(task.name, "Test Task");
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(!task.is_template());

    let updated = repo
        .update_task(
            task.id,
            UpdateTaskData {
                name: Some("Updated Task".to_string()),
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update task");
    assert_eq!(updated.name, "Updated Task");
    assert_eq!(updated.description, None);

    let completion = repo
        .complete_task(task.id)
        .await
        .expect("Failed to complete task");
    match completion {
        CompletionResult::Single(completed) => {
            assert_eq!(completed.status, TaskStatus::Completed);
            assert!(completed.completed_at.is_some());
        }
        _ => panic!("Expected single task completion"),
    }

    repo.delete_task(task.id).await.expect("Failed to delete");
    let found = repo.find_task_by_id(task.id).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_short_id_prefix_resolution() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = create_test_task(&repo, "Prefix Task").await;
    let prefix = &task.id.to_string()[..8];

    let matches = repo
        .find_tasks_by_short_id_prefix(prefix)
        .await
        .expect("Prefix query failed");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, task.id);

    let no_matches = repo
        .find_tasks_by_short_id_prefix("ffffffff")
        .await
        .expect("Prefix query failed");
    assert!(no_matches.is_empty());
}

#[tokio::test]
async fn test_recurring_task_materializes_window() {
    let (repo, _temp_dir) = setup_test_db().await;
    let today = Utc::now().date_naive();

    let template = repo
        .add_task(NewTaskData {
            name: "Water plants".to_string(),
            due_on: Some(today),
            repeat: Some(RepeatCadence::Daily),
            repeat_until: Some(today.checked_add_days(Days::new(5)).unwrap()),
            ..Default::default()
        })
        .await
        .expect("Failed to add recurring task");
    assert!(template.is_template());

    // add_task already refreshed: five bounded occurrences exist.
    let occurrences = repo
        .occurrences_for_template(template.id)
        .await
        .expect("Occurrence fetch failed");
    assert_eq!(occurrences.len(), 5);
    assert!(occurrences.iter().all(|t| t.origin_task_id == Some(template.id)));
    assert_eq!(
        occurrences[0].due_on,
        Some(today.checked_add_days(Days::new(1)).unwrap())
    );

    // Refreshing again is idempotent.
    let created = repo
        .refresh_timeline(repo.window(), today)
        .await
        .expect("Refresh failed");
    assert_eq!(created, 0);
}

#[tokio::test]
async fn test_materialization_respects_window_bounds() {
    let (repo, _temp_dir) = setup_test_db_with_window(TimelineWindow::new(2, 2)).await;
    let today = Utc::now().date_naive();

    let template = repo
        .add_task(NewTaskData {
            name: "Standup".to_string(),
            due_on: Some(today),
            repeat: Some(RepeatCadence::Daily),
            ..Default::default()
        })
        .await
        .expect("Failed to add recurring task");

    let occurrences = repo.occurrences_for_template(template.id).await.unwrap();
    assert_eq!(occurrences.len(), 2);

    // A wider explicit window extends the materialized range.
    let created = repo
        .refresh_timeline(TimelineWindow::new(2, 4), today)
        .await
        .expect("Refresh failed");
    assert_eq!(created, 2);
}

#[tokio::test]
async fn test_recurring_task_requires_anchor_date() {
    let (repo, _temp_dir) = setup_test_db().await;

    let result = repo
        .add_task(NewTaskData {
            name: "No anchor".to_string(),
            repeat: Some(RepeatCadence::Weekly),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}

#[tokio::test]
async fn test_completing_occurrence_surfaces_next() {
    let (repo, _temp_dir) = setup_test_db().await;
    let today = Utc::now().date_naive();

    let template = repo
        .add_task(NewTaskData {
            name: "Journal".to_string(),
            due_on: Some(today),
            repeat: Some(RepeatCadence::Daily),
            repeat_until: Some(today.checked_add_days(Days::new(4)).unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();

    let occurrences = repo.occurrences_for_template(template.id).await.unwrap();
    assert_eq!(occurrences.len(), 4);
    let first = occurrences[0].clone();

    let result = repo.complete_task(first.id).await.expect("Completion failed");
    match result {
        CompletionResult::Recurring { completed, next } => {
            assert_eq!(completed.id, first.id);
            assert_eq!(completed.status, TaskStatus::Completed);
            let next = next.expect("Expected a next occurrence");
            assert_eq!(
                next.due_on,
                Some(today.checked_add_days(Days::new(2)).unwrap())
            );
        }
        _ => panic!("Expected recurring completion"),
    }

    // The next occurrence was already materialized; no duplicate was made.
    let after = repo.occurrences_for_template(template.id).await.unwrap();
    assert_eq!(after.len(), 4);
}

#[tokio::test]
async fn test_changing_recurrence_drops_pending_occurrences() {
    let (repo, _temp_dir) = setup_test_db().await;
    let today = Utc::now().date_naive();

    let template = repo
        .add_task(NewTaskData {
            name: "Review".to_string(),
            due_on: Some(today),
            repeat: Some(RepeatCadence::Daily),
            repeat_until: Some(today.checked_add_days(Days::new(6)).unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(repo.occurrences_for_template(template.id).await.unwrap().len(), 6);

    repo.update_task(
        template.id,
        UpdateTaskData {
            repeat: Some(Some(RepeatCadence::Weekly)),
            ..Default::default()
        },
    )
    .await
    .expect("Update failed");

    // Pending daily occurrences were dropped; the next refresh rebuilds on
    // the weekly cadence.
    repo.refresh_timeline(repo.window(), today).await.unwrap();
    let rebuilt = repo.occurrences_for_template(template.id).await.unwrap();
    assert_eq!(rebuilt.len(), 0); // until is 6 days out; first weekly hit is day 7

    repo.update_task(
        template.id,
        UpdateTaskData {
            repeat_until: Some(Some(today.checked_add_days(Days::new(21)).unwrap())),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    repo.refresh_timeline(repo.window(), today).await.unwrap();
    let rebuilt = repo.occurrences_for_template(template.id).await.unwrap();
    assert_eq!(rebuilt.len(), 3);
}

#[tokio::test]
async fn test_element_hierarchy_and_tree() {
    let (repo, _temp_dir) = setup_test_db().await;

    repo.add_element("Work".to_string(), None, Some("#ff0000".to_string()))
        .await
        .unwrap();
    repo.add_element("Deep Focus".to_string(), Some("Work".to_string()), None)
        .await
        .unwrap();
    repo.add_element("Home".to_string(), None, None).await.unwrap();

    let tree = repo.element_tree().await.expect("Tree query failed");
    assert_eq!(tree.len(), 3);

    let work = tree.iter().find(|n| n.name == "Work").unwrap();
    let focus = tree.iter().find(|n| n.name == "Deep Focus").unwrap();
    assert_eq!(work.depth, 0);
    assert_eq!(focus.depth, 1);
    assert_eq!(focus.parent_id, Some(work.id));

    // Children sort directly under their parent.
    let work_pos = tree.iter().position(|n| n.name == "Work").unwrap();
    let focus_pos = tree.iter().position(|n| n.name == "Deep Focus").unwrap();
    assert_eq!(focus_pos, work_pos + 1);

    let dup = repo.add_element("Work".to_string(), None, None).await;
    assert!(matches!(dup, Err(CoreError::InvalidInput(_))));
}

#[tokio::test]
async fn test_element_move_rejects_cycles() {
    let (repo, _temp_dir) = setup_test_db().await;

    repo.add_element("A".to_string(), None, None).await.unwrap();
    repo.add_element("B".to_string(), Some("A".to_string()), None)
        .await
        .unwrap();
    repo.add_element("C".to_string(), Some("B".to_string()), None)
        .await
        .unwrap();

    let result = repo.move_element("A", Some("C")).await;
    assert!(matches!(result, Err(CoreError::ElementCycle(_, _))));

    // A legal move still works.
    let moved = repo.move_element("C", Some("A")).await.expect("Move failed");
    let a = repo.find_element_by_name("A").await.unwrap().unwrap();
    assert_eq!(moved.parent_id, Some(a.id));
}

#[tokio::test]
async fn test_task_with_unknown_element_is_rejected() {
    let (repo, _temp_dir) = setup_test_db().await;

    let result = repo
        .add_task(NewTaskData {
            name: "Orphan".to_string(),
            element_name: Some("Nowhere".to_string()),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_filter_queries() {
    let (repo, _temp_dir) = setup_test_db().await;
    let today = Utc::now().date_naive();

    repo.add_element("Work".to_string(), None, None).await.unwrap();
    let work_task = repo
        .add_task(NewTaskData {
            name: "Write report".to_string(),
            due_on: Some(today),
            element_name: Some("Work".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    repo.add_task(NewTaskData {
        name: "Buy groceries".to_string(),
        due_on: Some(today.checked_add_days(Days::new(1)).unwrap()),
        ..Default::default()
    })
    .await
    .unwrap();

    let work_only = repo
        .find_tasks_with_details(&Query::Filter(Filter::Element("Work".to_string())))
        .await
        .unwrap();
    assert_eq!(work_only.len(), 1);
    assert_eq!(work_only[0].id, work_task.id);
    assert_eq!(work_only[0].element_name.as_deref(), Some("Work"));

    let due_today = repo
        .find_tasks_with_details(&Query::Filter(Filter::Due(DueFilter::On(today))))
        .await
        .unwrap();
    assert_eq!(due_today.len(), 1);

    repo.complete_task(work_task.id).await.unwrap();
    let completed = repo
        .find_tasks_with_details(&Query::Filter(Filter::Status(TaskStatus::Completed)))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);

    let all = repo.find_tasks_with_details(&Query::All).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_timeline_fetch_is_window_bounded() {
    let (repo, _temp_dir) = setup_test_db().await;
    let today = Utc::now().date_naive();

    repo.add_task(NewTaskData {
        name: "Inside".to_string(),
        due_on: Some(today.checked_add_days(Days::new(3)).unwrap()),
        ..Default::default()
    })
    .await
    .unwrap();
    repo.add_task(NewTaskData {
        name: "Outside".to_string(),
        due_on: Some(today.checked_add_days(Days::new(30)).unwrap()),
        ..Default::default()
    })
    .await
    .unwrap();
    repo.add_task(NewTaskData {
        name: "Undated".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    let rows = repo
        .timeline_tasks(TimelineWindow::new(0, 7), today, &Query::All)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Inside");
}

#[tokio::test]
async fn test_habit_workflow() {
    let (repo, _temp_dir) = setup_test_db().await;
    let today = Utc::now().date_naive();

    repo.add_element("Health".to_string(), None, None).await.unwrap();
    let habit = repo
        .add_habit(NewHabitData {
            name: "Stretch".to_string(),
            cadence: Some(RepeatCadence::Daily),
            element_name: Some("Health".to_string()),
        })
        .await
        .expect("Failed to add habit");
    assert_eq!(habit.cadence, RepeatCadence::Daily);

    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();
    repo.mark_habit(habit.id, yesterday).await.unwrap();
    repo.mark_habit(habit.id, today).await.unwrap();
    // Duplicate marks are a no-op.
    repo.mark_habit(habit.id, today).await.unwrap();

    let marks = repo.habit_marks(habit.id).await.unwrap();
    assert_eq!(marks.len(), 2);
    assert_eq!(marks[0].marked_on, yesterday);

    repo.delete_habit(habit.id).await.unwrap();
    assert!(repo.habit_marks(habit.id).await.unwrap().is_empty());
}
