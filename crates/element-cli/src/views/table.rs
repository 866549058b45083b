use chrono::{NaiveDate, TimeZone, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use element_core::models::{RepeatCadence, TaskStatus};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ViewTask {
    pub id: Uuid,
    pub name: String,
    pub status: TaskStatus,
    pub due_on: Option<NaiveDate>,
    pub element_name: Option<String>,
    pub repeat: Option<RepeatCadence>,
    pub is_occurrence: bool,
}

#[derive(Debug, Clone)]
pub struct ViewElement {
    pub name: String,
    pub color: Option<String>,
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct ViewHabit {
    pub id: Uuid,
    pub name: String,
    pub cadence: RepeatCadence,
    pub element_name: Option<String>,
    pub streak: u32,
}

pub fn display_tasks(tasks: &[ViewTask], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Status", "Due", "Element"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(&task.id.to_string()[..7]));

        let mut display_name = String::new();
        if task.repeat.is_some() || task.is_occurrence {
            display_name.push('↻');
            display_name.push(' ');
        }
        display_name.push_str(&task.name);
        if let Some(cadence) = task.repeat {
            display_name.push_str(&format!(" ({})", cadence));
        }

        let mut name_cell = Cell::new(display_name);
        match task.status {
            TaskStatus::Completed | TaskStatus::Cancelled => {
                name_cell = name_cell
                    .add_attribute(Attribute::CrossedOut)
                    .fg(Color::DarkGrey);
            }
            TaskStatus::Pending => {
                if task.due_on.map_or(false, |due| due < today) {
                    name_cell = name_cell.fg(Color::Red).add_attribute(Attribute::Bold);
                }
            }
        };
        row.add_cell(name_cell);

        let mut status_cell = Cell::new(task.status.to_string());
        status_cell = match task.status {
            TaskStatus::Completed => status_cell.fg(Color::Green),
            TaskStatus::Cancelled => status_cell.fg(Color::DarkGrey),
            TaskStatus::Pending => status_cell,
        };
        row.add_cell(status_cell);

        row.add_cell(due_cell(task, today));

        row.add_cell(Cell::new(
            task.element_name.clone().unwrap_or_else(|| "-".to_string()),
        ));

        table.add_row(row);
    }

    println!("{table}");
}

fn due_cell(task: &ViewTask, today: NaiveDate) -> Cell {
    let Some(due) = task.due_on else {
        return Cell::new("-");
    };

    let relative = match due.and_hms_opt(12, 0, 0) {
        Some(noon) => Utc.from_utc_datetime(&noon).humanize(),
        None => due.to_string(),
    };
    let text = format!("{} ({})", due.format("%Y-%m-%d"), relative);

    if task.status == TaskStatus::Pending {
        if due < today {
            Cell::new(text).fg(Color::Red) // Overdue
        } else if due == today {
            Cell::new(text).fg(Color::Yellow) // Due today
        } else {
            Cell::new(text)
        }
    } else {
        Cell::new(text)
    }
}

/// Timeline view: tasks grouped under date headings, oldest first.
pub fn display_timeline(tasks: &[ViewTask], today: NaiveDate) {
    if tasks.is_empty() {
        println!("Nothing on the timeline for this window.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "ID", "Name", "Status", "Element"]);

    let mut last_date: Option<NaiveDate> = None;
    for task in tasks {
        let date_text = match task.due_on {
            Some(due) if last_date != Some(due) => {
                last_date = Some(due);
                let marker = if due == today { " ← today" } else { "" };
                format!("{}{}", due.format("%Y-%m-%d %a"), marker)
            }
            _ => String::new(),
        };

        let mut name = String::new();
        if task.repeat.is_some() || task.is_occurrence {
            name.push('↻');
            name.push(' ');
        }
        name.push_str(&task.name);

        let mut name_cell = Cell::new(name);
        if matches!(task.status, TaskStatus::Completed | TaskStatus::Cancelled) {
            name_cell = name_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey);
        }

        let mut row = Row::new();
        row.add_cell(Cell::new(date_text));
        row.add_cell(Cell::new(&task.id.to_string()[..7]));
        row.add_cell(name_cell);
        row.add_cell(Cell::new(task.status.to_string()));
        row.add_cell(Cell::new(
            task.element_name.clone().unwrap_or_else(|| "-".to_string()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_elements(elements: &[ViewElement]) {
    if elements.is_empty() {
        println!("No elements found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Element", "Color"]);

    for element in elements {
        let indentation = "  ".repeat(element.depth);
        let name = format!("{}{}", indentation, element.name);
        let mut row = Row::new();
        row.add_cell(Cell::new(name));
        row.add_cell(Cell::new(
            element.color.clone().unwrap_or_else(|| "-".to_string()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_habits(habits: &[ViewHabit]) {
    if habits.is_empty() {
        println!("No habits found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Cadence", "Element", "Streak"]);

    for habit in habits {
        let mut row = Row::new();
        row.add_cell(Cell::new(&habit.id.to_string()[..7]));
        row.add_cell(Cell::new(&habit.name));
        row.add_cell(Cell::new(habit.cadence.to_string()));
        row.add_cell(Cell::new(
            habit.element_name.clone().unwrap_or_else(|| "-".to_string()),
        ));

        let streak_cell = if habit.streak > 0 {
            Cell::new(format!("{} 🔥", habit.streak)).fg(Color::Yellow)
        } else {
            Cell::new("0")
        };
        row.add_cell(streak_cell);

        table.add_row(row);
    }

    println!("{table}");
}
