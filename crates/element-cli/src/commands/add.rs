use anyhow::Result;
use element_core::models::{NewTaskData, RepeatCadence};
use element_core::repository::Repository;
use owo_colors::{OwoColorize, Style};
use std::str::FromStr;

use crate::cli::AddCommand;
use crate::parser::parse_date;

pub async fn add_task(repo: &impl Repository, command: AddCommand) -> Result<()> {
    let due_on = command.due.as_deref().map(parse_date).transpose()?;
    let repeat = command
        .repeat
        .as_deref()
        .map(RepeatCadence::from_str)
        .transpose()?;
    let repeat_until = command.until.as_deref().map(parse_date).transpose()?;

    let new_task_data = NewTaskData {
        name: command.name,
        description: command.description,
        due_on,
        element_name: command.element,
        element_id: None,
        repeat,
        repeat_until,
    };

    let added_task = repo.add_task(new_task_data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    if let Some(cadence) = added_task.repeat {
        println!(
            "{} Created recurring task: {}",
            "✓".style(success_style),
            added_task.name.bold()
        );
        println!(
            "  {} Task ID: {}",
            "→".style(info_style),
            added_task.id.to_string().yellow()
        );
        match added_task.repeat_until {
            Some(until) => println!(
                "  {} Repeats {} until {}",
                "→".style(info_style),
                cadence,
                until.format("%Y-%m-%d")
            ),
            None => println!("  {} Repeats {}", "→".style(info_style), cadence),
        }
        println!(
            "  {} Occurrences inside the timeline window were created",
            "→".style(info_style)
        );
    } else {
        println!(
            "{} Created task: {}",
            "✓".style(success_style),
            added_task.name.bold()
        );
        println!(
            "  {} Task ID: {}",
            "→".style(info_style),
            added_task.id.to_string().yellow()
        );
        if let Some(due) = added_task.due_on {
            println!(
                "  {} Due: {}",
                "→".style(info_style),
                due.format("%Y-%m-%d").to_string().cyan()
            );
        }
    }

    Ok(())
}
