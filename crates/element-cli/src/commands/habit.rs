use anyhow::Result;
use dialoguer::Confirm;
use element_core::models::{NewHabitData, RepeatCadence};
use element_core::recurrence::current_streak;
use element_core::repository::Repository;
use owo_colors::OwoColorize;
use std::collections::HashSet;
use std::str::FromStr;

use crate::cli::{HabitCommand, HabitSubcommand};
use crate::config::Config;
use crate::parser::parse_date;
use crate::util::resolve_habit_id;
use crate::views::table::{display_habits, ViewHabit};

pub async fn habit_command(
    repo: &impl Repository,
    command: HabitCommand,
    config: &Config,
) -> Result<()> {
    match command.command {
        HabitSubcommand::Add(cmd) => {
            let cadence = cmd
                .every
                .as_deref()
                .map(RepeatCadence::from_str)
                .transpose()?;
            let habit = repo
                .add_habit(NewHabitData {
                    name: cmd.name,
                    cadence,
                    element_name: cmd.element,
                })
                .await?;
            println!(
                "{} Created {} habit: {}",
                "✓".green().bold(),
                habit.cadence,
                habit.name
            );
            Ok(())
        }
        HabitSubcommand::List => {
            let today = config.today();
            let habits = repo.find_habits().await?;

            let mut view = Vec::with_capacity(habits.len());
            for habit in habits {
                let marks: HashSet<_> = repo
                    .habit_marks(habit.id)
                    .await?
                    .into_iter()
                    .map(|m| m.marked_on)
                    .collect();
                let element_name = match habit.element_id {
                    Some(_) => element_name_for(repo, habit.element_id).await?,
                    None => None,
                };
                view.push(ViewHabit {
                    id: habit.id,
                    name: habit.name,
                    cadence: habit.cadence,
                    element_name,
                    streak: current_streak(&marks, habit.cadence, today),
                });
            }

            display_habits(&view);
            Ok(())
        }
        HabitSubcommand::Done(cmd) => {
            let habit_id = resolve_habit_id(repo, &cmd.id).await?;
            let on = match cmd.on.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => config.today(),
            };

            let mark = repo.mark_habit(habit_id, on).await?;

            let marks: HashSet<_> = repo
                .habit_marks(habit_id)
                .await?
                .into_iter()
                .map(|m| m.marked_on)
                .collect();
            let streak = current_streak(&marks, habit_cadence(repo, habit_id).await?, config.today());

            println!(
                "{} Marked habit done for {}",
                "✓".green().bold(),
                mark.marked_on.format("%Y-%m-%d")
            );
            if streak > 1 {
                println!("  Streak: {} 🔥", streak.to_string().yellow());
            }
            Ok(())
        }
        HabitSubcommand::Delete(cmd) => {
            let habit_id = resolve_habit_id(repo, &cmd.id).await?;

            if !cmd.force {
                let confirmation = Confirm::new()
                    .with_prompt("Delete this habit and its history?")
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            repo.delete_habit(habit_id).await?;
            println!("{} Deleted habit.", "✓".green().bold());
            Ok(())
        }
    }
}

async fn habit_cadence(repo: &impl Repository, habit_id: uuid::Uuid) -> Result<RepeatCadence> {
    let habits = repo.find_habits().await?;
    habits
        .into_iter()
        .find(|h| h.id == habit_id)
        .map(|h| h.cadence)
        .ok_or_else(|| anyhow::anyhow!("Habit not found"))
}

async fn element_name_for(
    repo: &impl Repository,
    element_id: Option<uuid::Uuid>,
) -> Result<Option<String>> {
    let Some(element_id) = element_id else {
        return Ok(None);
    };
    let tree = repo.element_tree().await?;
    Ok(tree.into_iter().find(|n| n.id == element_id).map(|n| n.name))
}
