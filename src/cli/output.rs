use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Priority, Todo, short_id};
use crate::ops::commands::Command;
use crate::ops::filter::{
    CalendarDay, DueStatus, KanbanBoard, KanbanColumn, WEEKDAY_LABELS, due_label, due_status,
};
use crate::ops::stats::{ListSummary, StatsSnapshot};
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub category: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// "Today", "Tomorrow" or dd.mm.yyyy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_label: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_archived: bool,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ListJson {
    pub filter: String,
    pub category: String,
    pub sort: String,
    pub summary: ListSummary,
    pub todos: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct KanbanJson {
    pub open: Vec<TodoJson>,
    pub done: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct CalendarJson {
    /// YYYY-MM
    pub month: String,
    pub days: Vec<CalendarDayJson>,
}

#[derive(Serialize)]
pub struct CalendarDayJson {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub todos: Vec<TodoJson>,
    /// Todos beyond the ones listed in the cell
    pub overflow: usize,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: NaiveDate,
    pub todos: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct ConfigJson<'a> {
    pub root: String,
    #[serde(flatten)]
    pub config: &'a crate::model::config::BoardConfig,
}

// ---------------------------------------------------------------------------
// JSON conversion
// ---------------------------------------------------------------------------

pub fn todo_to_json(todo: &Todo, today: NaiveDate) -> TodoJson {
    TodoJson {
        id: todo.id.clone(),
        text: todo.text.clone(),
        description: todo.description.clone(),
        completed: todo.completed,
        category: todo.category.clone(),
        priority: todo.priority,
        due_date: todo.due_date,
        due_label: todo.due_date.map(|d| due_label(d, today)),
        is_archived: todo.is_archived,
        created_at: todo
            .created_at
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    }
}

pub fn todos_to_json(todos: &[&Todo], today: NaiveDate) -> Vec<TodoJson> {
    todos.iter().map(|t| todo_to_json(t, today)).collect()
}

pub fn kanban_to_json(board: &KanbanBoard<'_>, today: NaiveDate) -> KanbanJson {
    KanbanJson {
        open: todos_to_json(&board.open, today),
        done: todos_to_json(&board.done, today),
    }
}

pub fn calendar_to_json(year: i32, month: u32, days: &[CalendarDay<'_>], today: NaiveDate) -> CalendarJson {
    CalendarJson {
        month: format!("{:04}-{:02}", year, month),
        days: days
            .iter()
            .map(|d| CalendarDayJson {
                date: d.date,
                in_month: d.in_month,
                is_today: d.is_today,
                todos: todos_to_json(&d.shown, today),
                overflow: d.overflow,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

const TEXT_WIDTH: usize = 40;

fn check_box(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn priority_char(priority: Priority) -> char {
    match priority {
        Priority::High => '!',
        Priority::Medium => '-',
        Priority::Low => '.',
    }
}

/// Due suffix for a todo line, flagging open todos that are overdue
fn due_suffix(todo: &Todo, today: NaiveDate) -> String {
    match todo.due_date {
        None => String::new(),
        Some(due) => {
            let overdue = !todo.completed && due_status(due, today) == DueStatus::Overdue;
            format!(
                "  due {}{}",
                due_label(due, today),
                if overdue { " (overdue)" } else { "" }
            )
        }
    }
}

/// One todo: `[ ] 1a2b3c4d ! Buy milk                 #privat  due Today`
pub fn format_todo_line(todo: &Todo, today: NaiveDate) -> String {
    let text = truncate_to_width(&todo.text, TEXT_WIDTH);
    format!(
        "{} {:<8} {} {}  #{}{}",
        check_box(todo.completed),
        short_id(&todo.id),
        priority_char(todo.priority),
        pad_to_width(&text, TEXT_WIDTH),
        todo.category,
        due_suffix(todo, today)
    )
    .trim_end()
    .to_string()
}

pub fn format_summary(summary: &ListSummary) -> String {
    format!(
        "{} todos, {} done ({}%), {} due today, {} overdue",
        summary.total,
        summary.completed,
        summary.progress(),
        summary.due_today,
        summary.overdue
    )
}

/// List view: summary header then one line per todo
pub fn format_list(todos: &[&Todo], summary: &ListSummary, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format_summary(summary)];
    if todos.is_empty() {
        lines.push("  (no todos match)".to_string());
    }
    for todo in todos {
        lines.push(format_todo_line(todo, today));
    }
    lines
}

pub fn format_kanban(board: &KanbanBoard<'_>, today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    for col in [KanbanColumn::Open, KanbanColumn::Done] {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        let cards = board.column(col);
        lines.push(format!("{} ({})", col.title(), cards.len()));
        for todo in cards {
            lines.push(format!("  {}", format_todo_line(todo, today)));
        }
    }
    lines
}

/// Month grid: weekday header, one row per week (today marked with `*`,
/// days with todos with their count), then the todos of each busy day.
pub fn format_calendar(title: &str, days: &[CalendarDay<'_>], today: NaiveDate) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    lines.push(
        WEEKDAY_LABELS
            .iter()
            .map(|l| format!("{:>6}", l))
            .collect::<String>(),
    );
    for week in days.chunks(7) {
        let row: String = week
            .iter()
            .map(|d| {
                let count = d.shown.len() + d.overflow;
                let day = d.date.format("%d").to_string();
                let mark = if d.is_today { "*" } else { " " };
                if !d.in_month {
                    format!("{:>6}", ".")
                } else if count > 0 {
                    format!("{:>3}{}{:<2}", day, mark, count)
                } else {
                    format!("{:>3}{}  ", day, mark)
                }
            })
            .collect();
        lines.push(row.trim_end().to_string());
    }

    let busy: Vec<&CalendarDay<'_>> = days
        .iter()
        .filter(|d| d.in_month && !d.shown.is_empty())
        .collect();
    if !busy.is_empty() {
        lines.push(String::new());
    }
    for day in busy {
        lines.push(day.date.format("%a %d.%m.").to_string());
        for todo in &day.shown {
            lines.push(format!("  {}", format_todo_line(todo, today)));
        }
        if day.overflow > 0 {
            lines.push(format!("  +{} more", day.overflow));
        }
    }
    lines
}

pub fn format_day(date: NaiveDate, todos: &[&Todo], today: NaiveDate) -> Vec<String> {
    let mut lines = vec![date.format("%A %d.%m.%Y").to_string()];
    if todos.is_empty() {
        lines.push("  (nothing due)".to_string());
    }
    for todo in todos {
        lines.push(format!("  {}", format_todo_line(todo, today)));
    }
    lines
}

fn bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * width).div_ceil(max);
    "#".repeat(len)
}

pub fn format_stats(stats: &StatsSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("Total          {}", stats.total),
        format!(
            "Completed      {} ({}%)",
            stats.completed, stats.completion_rate
        ),
        format!("High priority  {} open", stats.high_priority_open),
        format!("Overdue        {}", stats.overdue_count),
    ];

    lines.push(String::new());
    lines.push("Priority".to_string());
    let max = stats
        .priority_distribution
        .iter()
        .map(|p| p.count)
        .max()
        .unwrap_or(0);
    for p in &stats.priority_distribution {
        lines.push(format!(
            "  {:<8} {:>4}  {}",
            p.priority.as_str(),
            p.count,
            bar(p.count, max, 20)
        ));
    }

    lines.push(String::new());
    lines.push("Last 7 days    created  completed".to_string());
    for day in &stats.weekly_activity {
        lines.push(format!(
            "  {}  {:>7}  {:>9}",
            day.date.format("%a %d.%m."),
            day.created,
            day.completed
        ));
    }

    if !stats.category_breakdown.is_empty() {
        lines.push(String::new());
        let cat_w = stats
            .category_breakdown
            .iter()
            .map(|c| display_width(&c.category))
            .max()
            .unwrap_or(0)
            .max(8);
        lines.push(format!(
            "{}  {:>4}  {:>7}",
            pad_to_width("Category", cat_w + 2),
            "done",
            "pending"
        ));
        for c in &stats.category_breakdown {
            lines.push(format!(
                "  {}  {:>4}  {:>7}",
                pad_to_width(&c.category, cat_w),
                c.completed,
                c.pending
            ));
        }
    }
    lines
}

pub fn format_command(cmd: &Command) -> String {
    format!(
        "{:>2}  {:<9} {:<18} {}",
        cmd.shortcut.unwrap_or(""),
        cmd.id,
        cmd.label,
        cmd.keywords.join(", ")
    )
}
