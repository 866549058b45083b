use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::CoreError;

pub type DbPool = sqlx::SqlitePool;

/// Opens (creating if missing) the sqlite database at `database_url` and
/// ensures the schema exists. Accepts either a plain file path or a
/// `sqlite:`-prefixed URL such as `sqlite::memory:`.
pub async fn establish_connection(database_url: &str) -> Result<DbPool, CoreError> {
    let options = if database_url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database_url)?
    } else {
        SqliteConnectOptions::new().filename(database_url)
    };
    let options = options.create_if_missing(true).foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

async fn init_schema(pool: &DbPool) -> Result<(), CoreError> {
    let statements = [
        r#"CREATE TABLE IF NOT EXISTS elements (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            parent_id BLOB REFERENCES elements(id) ON DELETE CASCADE,
            color TEXT,
            created_at TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS tasks (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            due_on TEXT,
            repeat TEXT,
            repeat_until TEXT,
            completed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            element_id BLOB REFERENCES elements(id) ON DELETE SET NULL,
            origin_task_id BLOB REFERENCES tasks(id) ON DELETE CASCADE
        )"#,
        r#"CREATE TABLE IF NOT EXISTS habits (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            cadence TEXT NOT NULL,
            element_id BLOB REFERENCES elements(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS habit_marks (
            habit_id BLOB NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            marked_on TEXT NOT NULL,
            PRIMARY KEY (habit_id, marked_on)
        )"#,
        "CREATE INDEX IF NOT EXISTS idx_tasks_due_on ON tasks(due_on)",
        "CREATE INDEX IF NOT EXISTS idx_tasks_origin ON tasks(origin_task_id)",
        "CREATE INDEX IF NOT EXISTS idx_tasks_element ON tasks(element_id)",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
