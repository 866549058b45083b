use anyhow::Result;
use element_core::repository::Repository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::query_parser;
use crate::views::table::{display_tasks, ViewTask};

pub async fn list_tasks(repo: &impl Repository, command: ListCommand, config: &Config) -> Result<()> {
    let query_str = if command.query.is_empty() && !config.default_filters.is_empty() {
        config.default_filters.join(" and ")
    } else {
        command.query
    };

    let query = query_parser::parse_query(&query_str)?;

    let tasks = repo.find_tasks_with_details(&query).await?;

    let view_tasks: Vec<ViewTask> = tasks
        .into_iter()
        .map(|t| ViewTask {
            id: t.id,
            name: t.name,
            status: t.status,
            due_on: t.due_on,
            element_name: t.element_name,
            repeat: t.repeat,
            is_occurrence: t.origin_task_id.is_some(),
        })
        .collect();

    display_tasks(&view_tasks, config.today());

    Ok(())
}
