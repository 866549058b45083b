use clap::{Parser, Subcommand};

/// A calendar-timeline planner for tasks, habits, and nested elements
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List tasks matching a filter query
    List(ListCommand),
    /// Show the task timeline around today
    Timeline(TimelineCommand),
    /// Mark a task as completed
    Do(DoCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Manage elements (nested categories)
    Element(ElementCommand),
    /// Manage habits
    Habit(HabitCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The name of the task
    pub name: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// The due date of the task (e.g. 'tomorrow', '2025-09-01')
    #[clap(long)]
    pub due: Option<String>,
    /// The element to file the task under
    #[clap(short, long)]
    pub element: Option<String>,
    /// Repeat cadence (daily, weekly, monthly, yearly)
    #[clap(long)]
    pub repeat: Option<String>,
    /// End date for the repeat rule
    #[clap(long, requires = "repeat")]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// A filter query string (e.g., "status:pending and (element:Work or due:today)")
    #[clap(default_value = "")]
    pub query: String,
}

#[derive(Parser, Debug, Clone)]
pub struct TimelineCommand {
    /// Days back from today; malformed values fall back to the default
    #[clap(long)]
    pub back: Option<String>,
    /// Days forward from today; malformed values fall back to the default
    #[clap(long)]
    pub forward: Option<String>,
    /// A filter query string applied within the window
    #[clap(default_value = "")]
    pub query: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DoCommand {
    /// The ID of the task to mark as completed
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, conflicts_with = "due")]
    pub due_clear: bool,

    #[arg(long)]
    pub element: Option<String>,
    #[arg(long, conflicts_with = "element")]
    pub element_clear: bool,

    /// Update repeat cadence (daily, weekly, monthly, yearly)
    #[arg(long)]
    pub repeat: Option<String>,
    /// Remove recurrence (convert to one-time task)
    #[arg(long, conflicts_with = "repeat")]
    pub repeat_clear: bool,

    /// Update the end date of the repeat rule
    #[arg(long)]
    pub until: Option<String>,
    #[arg(long, conflicts_with = "until")]
    pub until_clear: bool,

    /// Update status (pending, completed, cancelled)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ElementCommand {
    #[command(subcommand)]
    pub command: ElementSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ElementSubcommand {
    /// Add a new element
    Add(AddElementCommand),
    /// Show the element hierarchy
    Tree,
    /// Move an element under a different parent
    Move(MoveElementCommand),
    /// Delete an element (children are removed with it)
    Delete(DeleteElementCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddElementCommand {
    /// The name of the element
    pub name: String,
    /// Parent element name
    #[arg(long)]
    pub parent: Option<String>,
    /// Display color (e.g. '#60a5fa')
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct MoveElementCommand {
    /// The element to move
    pub name: String,
    /// The new parent; omit to move to the top level
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteElementCommand {
    /// The name of the element to delete
    pub name: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct HabitCommand {
    #[command(subcommand)]
    pub command: HabitSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HabitSubcommand {
    /// Add a new habit
    Add(AddHabitCommand),
    /// List habits with their current streaks
    List,
    /// Mark a habit done for a date (default today)
    Done(DoneHabitCommand),
    /// Delete a habit and its history
    Delete(DeleteHabitCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddHabitCommand {
    /// The name of the habit
    pub name: String,
    /// Cadence (daily, weekly, monthly, yearly); defaults to daily
    #[arg(long)]
    pub every: Option<String>,
    /// The element to file the habit under
    #[arg(short, long)]
    pub element: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneHabitCommand {
    /// The ID of the habit
    pub id: String,
    /// The date to mark (e.g. 'yesterday', '2025-08-01'); defaults to today
    #[arg(long)]
    pub on: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteHabitCommand {
    /// The ID of the habit to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}
