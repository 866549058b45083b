use anyhow::Result;
use dialoguer::Confirm;
use element_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::{ElementCommand, ElementSubcommand};
use crate::views::table::{display_elements, ViewElement};

pub async fn element_command(repo: &impl Repository, command: ElementCommand) -> Result<()> {
    match command.command {
        ElementSubcommand::Add(cmd) => {
            let element = repo.add_element(cmd.name, cmd.parent, cmd.color).await?;
            println!("{} Created element: {}", "✓".green().bold(), element.name);
            Ok(())
        }
        ElementSubcommand::Tree => {
            let nodes = repo.element_tree().await?;
            let view: Vec<ViewElement> = nodes
                .into_iter()
                .map(|n| ViewElement {
                    name: n.name,
                    color: n.color,
                    depth: n.depth.max(0) as usize,
                })
                .collect();
            display_elements(&view);
            Ok(())
        }
        ElementSubcommand::Move(cmd) => {
            let moved = repo
                .move_element(&cmd.name, cmd.parent.as_deref())
                .await?;
            match cmd.parent {
                Some(parent) => println!(
                    "{} Moved element '{}' under '{}'",
                    "✓".green().bold(),
                    moved.name,
                    parent
                ),
                None => println!(
                    "{} Moved element '{}' to the top level",
                    "✓".green().bold(),
                    moved.name
                ),
            }
            Ok(())
        }
        ElementSubcommand::Delete(cmd) => {
            if !cmd.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!(
                        "Delete element '{}' and everything nested under it?",
                        cmd.name
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            repo.delete_element(&cmd.name).await?;
            println!("{} Deleted element: '{}'", "✓".green().bold(), cmd.name);
            Ok(())
        }
    }
}
