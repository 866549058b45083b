use anyhow::Result;
use dialoguer::Confirm;
use element_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::DeleteCommand;
use crate::util::resolve_task_id;

pub async fn delete_task(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(task_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Task with ID '{}' not found.", task_id))?;

    if !command.force {
        let prompt = if task.is_template() {
            format!(
                "Delete recurring task '{}' and all of its occurrences?",
                task.name
            )
        } else {
            format!("Are you sure you want to delete task '{}'?", task.name)
        };

        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_task(task_id).await?;
    println!("{} Deleted task: '{}'", "✓".green().bold(), task.name);
    Ok(())
}
