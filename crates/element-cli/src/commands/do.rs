use anyhow::Result;
use element_core::models::CompletionResult;
use element_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::DoCommand;
use crate::util::resolve_task_id;

pub async fn do_task(repo: &impl Repository, command: DoCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;

    match repo.complete_task(task_id).await? {
        CompletionResult::Single(task) => {
            println!("{} Completed task: '{}'", "✓".green().bold(), task.name);
        }
        CompletionResult::Recurring { completed, next } => {
            println!("{} Completed task: '{}'", "✓".green().bold(), completed.name);
            match next.and_then(|n| n.due_on) {
                Some(due) => println!("  Next occurrence: {}", due.format("%Y-%m-%d")),
                None => println!("  This was the last occurrence in range."),
            }
        }
    }

    Ok(())
}
