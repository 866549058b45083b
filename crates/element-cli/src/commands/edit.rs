use anyhow::Result;
use element_core::models::{RepeatCadence, TaskStatus, UpdateTaskData};
use element_core::repository::Repository;
use owo_colors::OwoColorize;
use std::str::FromStr;

use crate::cli::EditCommand;
use crate::parser::parse_date;
use crate::util::resolve_task_id;

pub async fn edit_task(repo: &impl Repository, command: EditCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;

    let mut data = UpdateTaskData {
        name: command.name,
        ..Default::default()
    };

    if command.description_clear {
        data.description = Some(None);
    } else if let Some(description) = command.description {
        data.description = Some(Some(description));
    }

    if command.due_clear {
        data.due_on = Some(None);
    } else if let Some(due) = command.due {
        data.due_on = Some(Some(parse_date(&due)?));
    }

    if command.element_clear {
        data.element_name = Some(None);
    } else if let Some(element) = command.element {
        data.element_name = Some(Some(element));
    }

    if command.repeat_clear {
        data.repeat = Some(None);
    } else if let Some(repeat) = command.repeat {
        data.repeat = Some(Some(RepeatCadence::from_str(&repeat)?));
    }

    if command.until_clear {
        data.repeat_until = Some(None);
    } else if let Some(until) = command.until {
        data.repeat_until = Some(Some(parse_date(&until)?));
    }

    if let Some(status) = command.status {
        data.status = Some(TaskStatus::from_str(&status)?);
    }

    let updated = repo.update_task(task_id, data).await?;
    println!("{} Updated task: '{}'", "✓".green().bold(), updated.name);

    Ok(())
}
