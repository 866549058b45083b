use clap::Parser;
use element_core::db;
use element_core::error::CoreError;
use element_core::repository::SqliteRepository;
use owo_colors::{OwoColorize, Style};

mod cli;
mod commands;
mod config;
mod parser;
mod query_parser;
mod util;
mod views;

const DEFAULT_DATABASE_PATH: &str = "element.db";

#[tokio::main]
async fn main() {
    let config = config::Config::new().unwrap_or_default();

    let database_path = config
        .database_path
        .clone()
        .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

    let db_pool = match db::establish_connection(&database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let repository = SqliteRepository::new(db_pool, config.window());

    let cli = cli::Cli::parse();

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&repository, command).await,
        cli::Commands::List(command) => {
            commands::list::list_tasks(&repository, command, &config).await
        }
        cli::Commands::Timeline(command) => {
            commands::timeline::show_timeline(&repository, command, &config).await
        }
        cli::Commands::Do(command) => commands::r#do::do_task(&repository, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_task(&repository, command).await,
        cli::Commands::Delete(command) => {
            commands::delete::delete_task(&repository, command).await
        }
        cli::Commands::Element(command) => {
            commands::element::element_command(&repository, command).await
        }
        cli::Commands::Habit(command) => {
            commands::habit::habit_command(&repository, command, &config).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} Not found: {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(items) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, name) in items {
                    eprintln!("  {} ({})", id.yellow(), name);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::ElementCycle(element, parent) => {
                eprintln!(
                    "{} Element cycle: '{}' cannot be nested under '{}'",
                    "Error:".style(error_style),
                    element.yellow(),
                    parent.yellow()
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
