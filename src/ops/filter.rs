//! View filtering: list-view status/category filters, the kanban partition,
//! and calendar day membership. Everything here is pure over a borrowed
//! collection and compares due dates as calendar dates only.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::Todo;

/// Maximum todos listed inside a calendar cell before "+N more"
pub const CALENDAR_DAY_LIMIT: usize = 3;

/// List-view status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Today,
    Overdue,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Active,
        StatusFilter::Completed,
        StatusFilter::Today,
        StatusFilter::Overdue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
            StatusFilter::Today => "today",
            StatusFilter::Overdue => "overdue",
        }
    }

    /// The next filter in cycle order (wraps)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn matches(self, todo: &Todo, today: NaiveDate) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
            StatusFilter::Today => todo.due_date == Some(today),
            StatusFilter::Overdue => todo.due_date.is_some_and(|d| d < today),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "today" => Ok(StatusFilter::Today),
            "overdue" => Ok(StatusFilter::Overdue),
            _ => Err(format!(
                "invalid filter '{}' (expected all, active, completed, today, overdue)",
                s
            )),
        }
    }
}

/// List-view category filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("all") => CategoryFilter::All,
            Some(c) => CategoryFilter::Only(c.to_string()),
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => todo.category == *c,
        }
    }

    /// Cycle all -> each configured category -> all
    pub fn next(&self, categories: &[String]) -> Self {
        match self {
            CategoryFilter::All => categories
                .first()
                .map(|c| CategoryFilter::Only(c.clone()))
                .unwrap_or(CategoryFilter::All),
            CategoryFilter::Only(current) => {
                let pos = categories.iter().position(|c| c == current);
                match pos.and_then(|p| categories.get(p + 1)) {
                    Some(c) => CategoryFilter::Only(c.clone()),
                    None => CategoryFilter::All,
                }
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c,
        }
    }
}

/// List view: status filter AND category filter, in source order.
pub fn filter<'a>(
    todos: &'a [Todo],
    status: StatusFilter,
    category: &CategoryFilter,
    today: NaiveDate,
) -> Vec<&'a Todo> {
    todos
        .iter()
        .filter(|t| status.matches(t, today) && category.matches(t))
        .collect()
}

// ---------------------------------------------------------------------------
// Kanban
// ---------------------------------------------------------------------------

/// Kanban columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KanbanColumn {
    Open,
    Done,
}

impl KanbanColumn {
    pub fn title(self) -> &'static str {
        match self {
            KanbanColumn::Open => "To do",
            KanbanColumn::Done => "Done",
        }
    }

    /// Completion state a card takes on when dropped into this column
    pub fn completed(self) -> bool {
        self == KanbanColumn::Done
    }

    pub fn other(self) -> Self {
        match self {
            KanbanColumn::Open => KanbanColumn::Done,
            KanbanColumn::Done => KanbanColumn::Open,
        }
    }
}

/// The two-column board, each column in fetch order
#[derive(Debug, Default)]
pub struct KanbanBoard<'a> {
    pub open: Vec<&'a Todo>,
    pub done: Vec<&'a Todo>,
}

impl<'a> KanbanBoard<'a> {
    pub fn column(&self, col: KanbanColumn) -> &[&'a Todo] {
        match col {
            KanbanColumn::Open => &self.open,
            KanbanColumn::Done => &self.done,
        }
    }
}

pub fn partition_kanban(todos: &[Todo]) -> KanbanBoard<'_> {
    let (done, open): (Vec<&Todo>, Vec<&Todo>) = todos.iter().partition(|t| t.completed);
    KanbanBoard { open, done }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Todos due on the given calendar day, in source order
pub fn todos_on_day(todos: &[Todo], day: NaiveDate) -> Vec<&Todo> {
    todos.iter().filter(|t| t.due_date == Some(day)).collect()
}

/// One cell of the calendar grid
#[derive(Debug)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    /// First `CALENDAR_DAY_LIMIT` todos due that day
    pub shown: Vec<&'a Todo>,
    /// How many more are due beyond `shown`
    pub overflow: usize,
}

impl<'a> CalendarDay<'a> {
    pub fn build(todos: &'a [Todo], date: NaiveDate, month: u32, today: NaiveDate) -> Self {
        let mut due = todos_on_day(todos, date);
        let overflow = due.len().saturating_sub(CALENDAR_DAY_LIMIT);
        due.truncate(CALENDAR_DAY_LIMIT);
        CalendarDay {
            date,
            in_month: date.month() == month,
            is_today: date == today,
            shown: due,
            overflow,
        }
    }
}

/// All dates shown for a month: full Monday-to-Sunday weeks covering it.
/// Returns an empty vec for an invalid year/month.
pub fn month_grid(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = last_day_of_month(first);
    let start = first - Days::new(first.weekday().num_days_from_monday() as u64);
    let end = last + Days::new(6 - last.weekday().num_days_from_monday() as u64);
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Calendar cells for a month, row-major, 7 per week
pub fn calendar_month<'a>(
    todos: &'a [Todo],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Vec<CalendarDay<'a>> {
    month_grid(year, month)
        .into_iter()
        .map(|date| CalendarDay::build(todos, date, month, today))
        .collect()
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    next.pred_opt().unwrap_or(first)
}

/// Weekday header labels, Monday first
pub const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

// ---------------------------------------------------------------------------
// Due-date presentation
// ---------------------------------------------------------------------------

/// How urgent a due date is relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    Today,
    Tomorrow,
    Later,
}

pub fn due_status(due: NaiveDate, today: NaiveDate) -> DueStatus {
    if due < today {
        DueStatus::Overdue
    } else if due == today {
        DueStatus::Today
    } else if today.succ_opt() == Some(due) {
        DueStatus::Tomorrow
    } else {
        DueStatus::Later
    }
}

/// "Today", "Tomorrow", or `dd.mm.yyyy`
pub fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    match due_status(due, today) {
        DueStatus::Today => "Today".to_string(),
        DueStatus::Tomorrow => "Tomorrow".to_string(),
        DueStatus::Overdue | DueStatus::Later => due.format("%d.%m.%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn todo(id: &str, completed: bool, category: &str, due: Option<NaiveDate>) -> Todo {
        Todo {
            id: id.into(),
            text: format!("Todo {}", id),
            description: None,
            completed,
            category: category.into(),
            priority: Priority::Medium,
            due_date: due,
            is_archived: false,
            user_id: "u1".into(),
            created_at: "2025-05-01T10:00:00Z".parse().unwrap(),
        }
    }

    fn ids(todos: &[&Todo]) -> Vec<String> {
        todos.iter().map(|t| t.id.clone()).collect()
    }

    fn sample() -> Vec<Todo> {
        let today = date(2025, 5, 14);
        vec![
            todo("a", false, "arbeit", Some(today)),
            todo("b", true, "privat", Some(date(2025, 5, 10))),
            todo("c", false, "privat", None),
            todo("d", false, "arbeit", Some(date(2025, 5, 13))),
            todo("e", true, "ideen", Some(date(2025, 5, 20))),
        ]
    }

    #[test]
    fn all_is_identity() {
        let todos = sample();
        let out = filter(&todos, StatusFilter::All, &CategoryFilter::All, date(2025, 5, 14));
        assert_eq!(ids(&out), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn active_is_exactly_the_open_todos() {
        let todos = sample();
        let out = filter(&todos, StatusFilter::Active, &CategoryFilter::All, date(2025, 5, 14));
        assert!(out.iter().all(|t| !t.completed));
        let open: Vec<&Todo> = todos.iter().filter(|t| !t.completed).collect();
        assert_eq!(ids(&out), ids(&open));
    }

    #[test]
    fn completed_filter() {
        let todos = sample();
        let out = filter(&todos, StatusFilter::Completed, &CategoryFilter::All, date(2025, 5, 14));
        assert_eq!(ids(&out), vec!["b", "e"]);
    }

    #[test]
    fn today_uses_calendar_date_and_skips_missing_due() {
        let todos = sample();
        let out = filter(&todos, StatusFilter::Today, &CategoryFilter::All, date(2025, 5, 14));
        assert_eq!(ids(&out), vec!["a"]);
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        let todos = sample();
        let out = filter(&todos, StatusFilter::Overdue, &CategoryFilter::All, date(2025, 5, 14));
        assert_eq!(ids(&out), vec!["b", "d"]);
    }

    #[test]
    fn overdue_scenario() {
        let today = date(2025, 5, 14);
        let mut a = todo("A", false, "privat", Some(date(2025, 5, 13)));
        a.priority = Priority::Low;
        let mut b = todo("B", true, "privat", None);
        b.priority = Priority::High;
        let todos = vec![a, b];
        let out = filter(&todos, StatusFilter::Overdue, &CategoryFilter::All, today);
        assert_eq!(ids(&out), vec!["A"]);
    }

    #[test]
    fn category_is_a_conjunction() {
        let todos = sample();
        let cat = CategoryFilter::Only("arbeit".into());
        let out = filter(&todos, StatusFilter::All, &cat, date(2025, 5, 14));
        assert_eq!(ids(&out), vec!["a", "d"]);
        let out = filter(&todos, StatusFilter::Overdue, &cat, date(2025, 5, 14));
        assert_eq!(ids(&out), vec!["d"]);
    }

    #[test]
    fn category_filter_cycles_through_labels() {
        let cats = vec!["arbeit".to_string(), "privat".to_string()];
        let f = CategoryFilter::All.next(&cats);
        assert_eq!(f, CategoryFilter::Only("arbeit".into()));
        let f = f.next(&cats);
        assert_eq!(f, CategoryFilter::Only("privat".into()));
        assert_eq!(f.next(&cats), CategoryFilter::All);
        assert_eq!(CategoryFilter::All.next(&[]), CategoryFilter::All);
    }

    #[test]
    fn status_filter_cycle_wraps() {
        assert_eq!(StatusFilter::All.next(), StatusFilter::Active);
        assert_eq!(StatusFilter::Overdue.next(), StatusFilter::All);
    }

    #[test]
    fn kanban_partitions_in_fetch_order() {
        let todos = sample();
        let board = partition_kanban(&todos);
        assert_eq!(ids(&board.open), vec!["a", "c", "d"]);
        assert_eq!(ids(&board.done), vec!["b", "e"]);
        assert_eq!(board.open.len() + board.done.len(), todos.len());
    }

    #[test]
    fn calendar_day_truncates_to_three() {
        let day = date(2025, 5, 14);
        let todos: Vec<Todo> = (0..5)
            .map(|i| todo(&format!("t{}", i), false, "privat", Some(day)))
            .chain(std::iter::once(todo("x", false, "privat", None)))
            .collect();
        let cell = CalendarDay::build(&todos, day, 5, day);
        assert_eq!(ids(&cell.shown), vec!["t0", "t1", "t2"]);
        assert_eq!(cell.overflow, 2);
        assert!(cell.is_today);
        assert!(cell.in_month);
    }

    #[test]
    fn month_grid_covers_full_weeks() {
        // May 2025: Thu 1st .. Sat 31st
        let grid = month_grid(2025, 5);
        assert_eq!(grid.first(), Some(&date(2025, 4, 28)));
        assert_eq!(grid.last(), Some(&date(2025, 6, 1)));
        assert_eq!(grid.len() % 7, 0);
        assert_eq!(grid.len(), 35);
        assert!(month_grid(2025, 13).is_empty());
    }

    #[test]
    fn month_grid_starting_on_monday() {
        // September 2025 starts on a Monday and ends on a Tuesday
        let grid = month_grid(2025, 9);
        assert_eq!(grid[0], date(2025, 9, 1));
        assert_eq!(grid.last(), Some(&date(2025, 10, 5)));
    }

    #[test]
    fn last_day_handles_december_and_leap_years() {
        assert_eq!(last_day_of_month(date(2025, 12, 5)), date(2025, 12, 31));
        assert_eq!(last_day_of_month(date(2024, 2, 1)), date(2024, 2, 29));
    }

    #[test]
    fn due_labels() {
        let today = date(2025, 5, 14);
        assert_eq!(due_label(today, today), "Today");
        assert_eq!(due_label(date(2025, 5, 15), today), "Tomorrow");
        assert_eq!(due_label(date(2025, 5, 1), today), "01.05.2025");
        assert_eq!(due_status(date(2025, 5, 1), today), DueStatus::Overdue);
        assert_eq!(due_status(date(2025, 6, 1), today), DueStatus::Later);
    }
}
