use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::model::Priority;
use crate::ops::filter::StatusFilter;
use crate::ops::sort::SortKey;

#[derive(Parser)]
#[command(name = "tf", about = concat!("taskflow v", env!("CARGO_PKG_VERSION"), " - todos in four views"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// List todos (list view)
    List(ListArgs),
    /// Add a todo
    Add(AddArgs),
    /// Flip a todo between open and done
    Toggle(IdArg),
    /// Change fields of a todo
    Edit(EditArgs),
    /// Delete a todo
    Rm(IdArg),
    /// Show the kanban board
    Kanban,
    /// Show the calendar month, or one day's todos
    Calendar(CalendarArgs),
    /// Show statistics
    Stats,
    /// Resolve a command palette query
    Commands(CommandsArgs),
    /// Read or change board configuration
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// User id recorded on new todos
    #[arg(long)]
    pub user: Option<String>,
    /// Reinitialize even if .taskflow/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Status filter (all, active, completed, today, overdue)
    #[arg(long, default_value = "all")]
    pub filter: StatusFilter,
    /// Only this category
    #[arg(long)]
    pub category: Option<String>,
    /// Sort order (date, priority, alpha)
    #[arg(long, default_value = "date")]
    pub sort: SortKey,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text
    pub text: String,
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    /// Category (default from config)
    #[arg(long, short = 'c')]
    pub category: Option<String>,
    /// Priority (high, medium, low)
    #[arg(long, short = 'p', default_value = "medium")]
    pub priority: Priority,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args)]
pub struct IdArg {
    /// Todo id or unique prefix
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Todo id or unique prefix
    pub id: String,
    #[arg(long)]
    pub text: Option<String>,
    /// New description (empty string clears it)
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    #[arg(long, short = 'c')]
    pub category: Option<String>,
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,
    /// Due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM, default: current month)
    #[arg(long)]
    pub month: Option<String>,
    /// List the todos due on one day instead (YYYY-MM-DD)
    #[arg(long, conflicts_with = "month")]
    pub day: Option<NaiveDate>,
}

#[derive(Args)]
pub struct CommandsArgs {
    /// Palette query (empty lists every command)
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set one key, e.g. `tf config set ui.dark false`
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key (board.name, board.user_id, store.backend, store.url,
    /// store.table, todos.default_category, ui.dark)
    pub key: String,
    pub value: String,
}
