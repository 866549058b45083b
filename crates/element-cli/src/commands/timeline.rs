use anyhow::Result;
use element_core::repository::Repository;
use element_core::timeline::TimelineWindow;
use owo_colors::OwoColorize;

use crate::cli::TimelineCommand;
use crate::config::Config;
use crate::query_parser;
use crate::views::table::{display_timeline, ViewTask};

pub async fn show_timeline(
    repo: &impl Repository,
    command: TimelineCommand,
    config: &Config,
) -> Result<()> {
    // --back/--forward arrive raw; unparseable values fall back to the
    // configured defaults instead of failing the command.
    let window = TimelineWindow::resolve_with(
        config.window(),
        command.back.as_deref(),
        command.forward.as_deref(),
    );
    let today = config.today();

    let query = query_parser::parse_query(&command.query)?;
    let tasks = repo.timeline_tasks(window, today, &query).await?;

    println!(
        "Timeline: {} days back, {} days forward of {}",
        window.days_back.to_string().cyan(),
        window.days_forward.to_string().cyan(),
        today.format("%Y-%m-%d").to_string().bold()
    );

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

    display_timeline(&view_tasks, today);

    Ok(())
}
