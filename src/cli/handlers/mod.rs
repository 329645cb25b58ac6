mod init;
pub use init::cmd_init;

use std::error::Error;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io;
use crate::io::config_io;
use crate::io::store::{ListQuery, TodoStore, open_store};
use crate::model::{Board, BoardConfig, NewTodo, Todo, TodoPatch, ViewType, short_id};
use crate::ops::clock::Clock;
use crate::ops::commands::{default_commands, resolve};
use crate::ops::filter::{self, CategoryFilter};
use crate::ops::{sort, stats};

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Ok(());
    };

    // Commands that work without a board
    let cmd = match cmd {
        Commands::Init(args) => return cmd_init(args, cli.board_dir.as_deref()),
        Commands::Commands(args) => return cmd_commands(args, json),
        other => other,
    };

    let board = load_board(cli.board_dir.as_deref())?;
    match cmd {
        // Views
        Commands::List(args) => cmd_list(&board, args, json),
        Commands::Kanban => cmd_kanban(&board, json),
        Commands::Calendar(args) => cmd_calendar(&board, args, json),
        Commands::Stats => cmd_stats(&board, json),

        // Mutations
        Commands::Add(args) => cmd_add(&board, args, json),
        Commands::Toggle(args) => cmd_toggle(&board, args, json),
        Commands::Edit(args) => cmd_edit(&board, args, json),
        Commands::Rm(args) => cmd_rm(&board, args, json),

        Commands::Config(cmd) => match cmd.action {
            ConfigAction::Show => cmd_config_show(&board, json),
            ConfigAction::Set(args) => cmd_config_set(&board, args),
        },

        Commands::Init(_) | Commands::Commands(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory to start board discovery from: `-C <dir>` or the cwd
pub fn start_dir(board_dir: Option<&str>) -> Result<PathBuf, Box<dyn Error>> {
    match board_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

pub fn load_board(board_dir: Option<&str>) -> Result<Board, Box<dyn Error>> {
    let start = start_dir(board_dir)?;
    let root = board_io::discover_board(&start)?;
    Ok(board_io::load_board(&root)?)
}

fn fetch(store: &dyn TodoStore, view: ViewType) -> Result<Vec<Todo>, Box<dyn Error>> {
    Ok(store.list(ListQuery::for_view(view))?)
}

/// Find a todo by exact id or unique id prefix
pub fn resolve_id<'a>(todos: &'a [Todo], id: &str) -> Result<&'a Todo, String> {
    // every id starts with the empty prefix
    if id.trim().is_empty() {
        return Err(format!("no todo with id '{}'", id));
    }
    if let Some(exact) = todos.iter().find(|t| t.id == id) {
        return Ok(exact);
    }
    let matches: Vec<&Todo> = todos.iter().filter(|t| t.id.starts_with(id)).collect();
    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(format!("no todo with id '{}'", id)),
        many => Err(format!(
            "id prefix '{}' is ambiguous ({} todos match)",
            id,
            many.len()
        )),
    }
}

/// Parse `YYYY-MM`
pub fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let err = || format!("invalid month '{}' (expected YYYY-MM)", s);
    let (y, m) = s.split_once('-').ok_or_else(err)?;
    let year: i32 = y.parse().map_err(|_| err())?;
    let month: u32 = m.parse().map_err(|_| err())?;
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(err());
    }
    Ok((year, month))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Note categories outside the configured set; they are stored as given
fn warn_unknown_category(config: &BoardConfig, category: &str) {
    if !config.todos.categories.iter().any(|c| c == category) {
        eprintln!(
            "note: '{}' is not one of the configured categories ({})",
            category,
            config.todos.categories.join(", ")
        );
    }
}

// ---------------------------------------------------------------------------
// View commands
// ---------------------------------------------------------------------------

fn cmd_list(board: &Board, args: ListArgs, json: bool) -> CmdResult {
    let store = open_store(board)?;
    let todos = fetch(store.as_ref(), ViewType::List)?;
    let today = Clock::local().today;

    let category = CategoryFilter::from_arg(args.category.as_deref());
    let visible = filter::filter(&todos, args.filter, &category, today);
    let sorted = sort::sort(&visible, args.sort);
    let summary = stats::list_summary(&todos, today);

    if json {
        let output = ListJson {
            filter: args.filter.to_string(),
            category: category.label().to_string(),
            sort: args.sort.to_string(),
            summary,
            todos: todos_to_json(&sorted, today),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_lines(&format_list(&sorted, &summary, today));
    }
    Ok(())
}

fn cmd_kanban(board: &Board, json: bool) -> CmdResult {
    let store = open_store(board)?;
    let todos = fetch(store.as_ref(), ViewType::Kanban)?;
    let today = Clock::local().today;
    let kanban = filter::partition_kanban(&todos);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&kanban_to_json(&kanban, today))?
        );
    } else {
        print_lines(&format_kanban(&kanban, today));
    }
    Ok(())
}

fn cmd_calendar(board: &Board, args: CalendarArgs, json: bool) -> CmdResult {
    let store = open_store(board)?;
    let todos = fetch(store.as_ref(), ViewType::Calendar)?;
    let today = Clock::local().today;

    if let Some(day) = args.day {
        let due = filter::todos_on_day(&todos, day);
        if json {
            let output = DayJson {
                date: day,
                todos: todos_to_json(&due, today),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_lines(&format_day(day, &due, today));
        }
        return Ok(());
    }

    let (year, month) = match args.month.as_deref() {
        Some(m) => parse_month(m)?,
        None => (today.year(), today.month()),
    };
    let days = filter::calendar_month(&todos, year, month, today);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&calendar_to_json(year, month, &days, today))?
        );
    } else {
        let title = NaiveDate::from_ymd_opt(year, month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default();
        print_lines(&format_calendar(&title, &days, today));
    }
    Ok(())
}

fn cmd_stats(board: &Board, json: bool) -> CmdResult {
    let store = open_store(board)?;
    let todos = fetch(store.as_ref(), ViewType::Stats)?;
    let snapshot = stats::aggregate(&todos, &board.config.todos.categories, &Clock::local());

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_lines(&format_stats(&snapshot));
    }
    Ok(())
}

fn cmd_commands(args: CommandsArgs, json: bool) -> CmdResult {
    let table = default_commands();
    let matches = resolve(&args.query, &table);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else if matches.is_empty() {
        println!("no matching commands");
    } else {
        for cmd in matches {
            println!("{}", format_command(cmd));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

fn cmd_add(board: &Board, args: AddArgs, json: bool) -> CmdResult {
    let config = &board.config;
    let category = args
        .category
        .unwrap_or_else(|| config.todos.default_category.clone());
    warn_unknown_category(config, &category);

    let new = NewTodo::new(
        &args.text,
        args.description.as_deref(),
        &category,
        args.priority,
        args.due,
        &config.board.user_id,
    )?;
    let store = open_store(board)?;
    let created = store.insert(&new)?;

    if json {
        let today = Clock::local().today;
        println!(
            "{}",
            serde_json::to_string_pretty(&todo_to_json(&created, today))?
        );
    } else {
        println!("Added {} {}", short_id(&created.id), created.text);
    }
    Ok(())
}

fn cmd_toggle(board: &Board, args: IdArg, json: bool) -> CmdResult {
    let store = open_store(board)?;
    let todos = fetch(store.as_ref(), ViewType::Stats)?;
    let todo = resolve_id(&todos, &args.id)?;
    let completed = !todo.completed;
    store.update(&todo.id, &TodoPatch::completed(completed))?;

    if json {
        let mut updated = todo.clone();
        updated.completed = completed;
        let today = Clock::local().today;
        println!(
            "{}",
            serde_json::to_string_pretty(&todo_to_json(&updated, today))?
        );
    } else {
        let verb = if completed { "Completed" } else { "Reopened" };
        println!("{} {} {}", verb, short_id(&todo.id), todo.text);
    }
    Ok(())
}

fn cmd_edit(board: &Board, args: EditArgs, json: bool) -> CmdResult {
    let mut patch = match args.text.as_deref() {
        Some(text) => TodoPatch::text(text)?,
        None => TodoPatch::default(),
    };
    patch.description = args.description.map(|d| {
        let d = d.trim();
        (!d.is_empty()).then(|| d.to_string())
    });
    if let Some(category) = args.category {
        warn_unknown_category(&board.config, &category);
        patch.category = Some(category);
    }
    patch.priority = args.priority;
    if args.clear_due {
        patch.due_date = Some(None);
    } else if let Some(due) = args.due {
        patch.due_date = Some(Some(due));
    }
    if patch.is_empty() {
        return Err("nothing to change (see `tf edit --help`)".into());
    }

    let store = open_store(board)?;
    let todos = fetch(store.as_ref(), ViewType::Stats)?;
    let todo = resolve_id(&todos, &args.id)?;
    store.update(&todo.id, &patch)?;

    let mut updated = todo.clone();
    patch.apply(&mut updated);
    if json {
        let today = Clock::local().today;
        println!(
            "{}",
            serde_json::to_string_pretty(&todo_to_json(&updated, today))?
        );
    } else {
        println!("Updated {} {}", short_id(&updated.id), updated.text);
    }
    Ok(())
}

fn cmd_rm(board: &Board, args: IdArg, json: bool) -> CmdResult {
    let store = open_store(board)?;
    let todos = fetch(store.as_ref(), ViewType::Stats)?;
    let todo = resolve_id(&todos, &args.id)?;
    store.delete(&todo.id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": todo.id }));
    } else {
        println!("Deleted {} {}", short_id(&todo.id), todo.text);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config_show(board: &Board, json: bool) -> CmdResult {
    if json {
        let output = ConfigJson {
            root: board.root.display().to_string(),
            config: &board.config,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("# {}", board.board_dir.join("config.toml").display());
        print!("{}", toml::to_string_pretty(&board.config)?);
    }
    Ok(())
}

fn cmd_config_set(board: &Board, args: ConfigSetArgs) -> CmdResult {
    let (_, mut doc) = config_io::read_config(&board.board_dir)?;
    config_io::set_value(&mut doc, &args.key, &args.value)?;
    // reject edits that would leave an unloadable config
    toml::from_str::<BoardConfig>(&doc.to_string())?;
    config_io::write_config(&board.board_dir, &doc)?;
    tracing::info!(key = %args.key, "config updated");
    println!("{} = {}", args.key, args.value.trim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: &str) -> Todo {
        Todo {
            id: id.into(),
            text: id.into(),
            description: None,
            completed: false,
            category: "privat".into(),
            priority: Default::default(),
            due_date: None,
            is_archived: false,
            user_id: "u1".into(),
            created_at: "2025-05-01T08:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn resolve_id_prefers_exact_match() {
        let todos = vec![todo("ab"), todo("abc")];
        assert_eq!(resolve_id(&todos, "ab").unwrap().id, "ab");
        assert_eq!(resolve_id(&todos, "abc").unwrap().id, "abc");
    }

    #[test]
    fn resolve_id_by_unique_prefix() {
        let todos = vec![todo("1a2b"), todo("9f00")];
        assert_eq!(resolve_id(&todos, "9").unwrap().id, "9f00");
    }

    #[test]
    fn resolve_id_errors() {
        let todos = vec![todo("1a2b"), todo("1a3c")];
        assert!(resolve_id(&todos, "1a").unwrap_err().contains("ambiguous"));
        assert!(resolve_id(&todos, "zz").unwrap_err().contains("no todo"));
    }

    #[test]
    fn resolve_id_rejects_empty_prefix() {
        let todos = vec![todo("abc")];
        assert_eq!(resolve_id(&todos, ""), Err("no todo with id ''".to_string()));
        assert!(resolve_id(&todos, "  ").is_err());
    }

    #[test]
    fn parse_month_accepts_year_month() {
        assert_eq!(parse_month("2025-05"), Ok((2025, 5)));
        assert_eq!(parse_month("2024-2"), Ok((2024, 2)));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("May").is_err());
        assert!(parse_month("2025").is_err());
    }
}
