use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::{Priority, Todo};
use crate::ops::clock::Clock;

/// Number of days in the activity histogram
pub const ACTIVITY_DAYS: u64 = 7;

/// Summary statistics over a full todo collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total: usize,
    pub completed: usize,
    /// Percentage of completed todos, rounded; 0 for an empty collection
    pub completion_rate: u32,
    pub high_priority_open: usize,
    pub overdue_count: usize,
    /// Non-empty priority groups, highest priority first
    pub priority_distribution: Vec<PriorityCount>,
    /// One entry per day, oldest first, ending today
    pub weekly_activity: Vec<DayActivity>,
    /// Configured categories that have at least one todo
    pub category_breakdown: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    /// Todos created that day
    pub created: usize,
    /// Todos created that day that are now completed. Completion time is not
    /// recorded, so this is bucketed by creation date.
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub completed: usize,
    pub pending: usize,
}

/// Counts per priority, all three groups always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }

    /// Groups with a non-zero count, in `Priority::ALL` order
    pub fn non_empty(&self) -> Vec<PriorityCount> {
        Priority::ALL
            .iter()
            .map(|&priority| PriorityCount {
                priority,
                count: self.get(priority),
            })
            .filter(|p| p.count > 0)
            .collect()
    }
}

/// Count todos per priority
pub fn priority_counts(todos: &[Todo]) -> PriorityCounts {
    let mut counts = PriorityCounts::default();
    for todo in todos {
        counts.bump(todo.priority);
    }
    counts
}

/// Rounded percentage, 0 when `total` is 0
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

/// Compute the stats snapshot. `categories` is the fixed label list for the
/// category breakdown.
pub fn aggregate(todos: &[Todo], categories: &[String], clock: &Clock) -> StatsSnapshot {
    let total = todos.len();
    let completed = todos.iter().filter(|t| t.completed).count();
    let high_priority_open = todos
        .iter()
        .filter(|t| t.priority == Priority::High && !t.completed)
        .count();
    let overdue_count = todos
        .iter()
        .filter(|t| !t.completed && t.due_date.is_some_and(|d| d < clock.today))
        .count();

    StatsSnapshot {
        total,
        completed,
        completion_rate: percentage(completed, total),
        high_priority_open,
        overdue_count,
        priority_distribution: priority_counts(todos).non_empty(),
        weekly_activity: weekly_activity(todos, clock),
        category_breakdown: category_breakdown(todos, categories),
    }
}

/// Created/completed counts for the last seven days, oldest first
pub fn weekly_activity(todos: &[Todo], clock: &Clock) -> Vec<DayActivity> {
    let created_days: Vec<(NaiveDate, bool)> = todos
        .iter()
        .map(|t| (clock.local_date(t.created_at), t.completed))
        .collect();

    (0..ACTIVITY_DAYS)
        .rev()
        .filter_map(|back| clock.today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let mut day = DayActivity {
                date,
                created: 0,
                completed: 0,
            };
            for (created_on, done) in &created_days {
                if *created_on == date {
                    day.created += 1;
                    if *done {
                        day.completed += 1;
                    }
                }
            }
            day
        })
        .collect()
}

/// Completed/pending counts per category, omitting empty categories
pub fn category_breakdown(todos: &[Todo], categories: &[String]) -> Vec<CategoryCount> {
    categories
        .iter()
        .map(|cat| {
            let (completed, pending) = todos
                .iter()
                .filter(|t| t.category == *cat)
                .fold((0, 0), |(c, p), t| if t.completed { (c + 1, p) } else { (c, p + 1) });
            CategoryCount {
                category: cat.clone(),
                completed,
                pending,
            }
        })
        .filter(|c| c.completed + c.pending > 0)
        .collect()
}

/// Header counts shown above the list view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub total: usize,
    pub completed: usize,
    pub due_today: usize,
    /// Open todos due before today
    pub overdue: usize,
}

impl ListSummary {
    pub fn progress(&self) -> u32 {
        percentage(self.completed, self.total)
    }
}

pub fn list_summary(todos: &[Todo], today: NaiveDate) -> ListSummary {
    let mut summary = ListSummary {
        total: todos.len(),
        ..Default::default()
    };
    for todo in todos {
        if todo.completed {
            summary.completed += 1;
        }
        match todo.due_date {
            Some(d) if d == today => summary.due_today += 1,
            Some(d) if d < today && !todo.completed => summary.overdue += 1,
            _ => {}
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::default_categories;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> Clock {
        Clock::fixed(date(2025, 5, 14))
    }

    fn todo(text: &str, priority: Priority, completed: bool, category: &str, created: &str) -> Todo {
        Todo {
            id: text.into(),
            text: text.into(),
            description: None,
            completed,
            category: category.into(),
            priority,
            due_date: None,
            is_archived: false,
            user_id: "u1".into(),
            created_at: created.parse().unwrap(),
        }
    }

    #[test]
    fn empty_collection() {
        let stats = aggregate(&[], &default_categories(), &clock());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.high_priority_open, 0);
        assert_eq!(stats.overdue_count, 0);
        assert!(stats.priority_distribution.is_empty());
        assert!(stats.category_breakdown.is_empty());
        assert_eq!(stats.weekly_activity.len(), 7);
        assert!(
            stats
                .weekly_activity
                .iter()
                .all(|d| d.created == 0 && d.completed == 0)
        );
        assert_eq!(stats.weekly_activity[0].date, date(2025, 5, 8));
        assert_eq!(stats.weekly_activity[6].date, date(2025, 5, 14));
    }

    #[test]
    fn all_medium_has_single_group() {
        let todos: Vec<Todo> = (0..4)
            .map(|i| todo(&format!("t{}", i), Priority::Medium, false, "privat", "2025-05-01T08:00:00Z"))
            .collect();
        let stats = aggregate(&todos, &default_categories(), &clock());
        assert_eq!(
            stats.priority_distribution,
            vec![PriorityCount {
                priority: Priority::Medium,
                count: 4
            }]
        );
    }

    #[test]
    fn overdue_scenario() {
        let mut a = todo("A", Priority::Low, false, "privat", "2025-05-01T08:00:00Z");
        a.due_date = Some(date(2025, 5, 13));
        let b = todo("B", Priority::High, true, "privat", "2025-05-01T08:00:00Z");
        let stats = aggregate(&[a, b], &default_categories(), &clock());
        assert_eq!(stats.overdue_count, 1);
        assert_eq!(stats.completion_rate, 50);
        // B is high priority but completed
        assert_eq!(stats.high_priority_open, 0);
    }

    #[test]
    fn overdue_excludes_completed_and_today() {
        let mut done = todo("done", Priority::Low, true, "privat", "2025-05-01T08:00:00Z");
        done.due_date = Some(date(2025, 5, 1));
        let mut due_today = todo("today", Priority::Low, false, "privat", "2025-05-01T08:00:00Z");
        due_today.due_date = Some(date(2025, 5, 14));
        let stats = aggregate(&[done, due_today], &default_categories(), &clock());
        assert_eq!(stats.overdue_count, 0);
    }

    #[test]
    fn completion_rate_rounds() {
        let todos = vec![
            todo("a", Priority::Low, true, "privat", "2025-05-01T08:00:00Z"),
            todo("b", Priority::Low, true, "privat", "2025-05-01T08:00:00Z"),
            todo("c", Priority::Low, false, "privat", "2025-05-01T08:00:00Z"),
        ];
        let stats = aggregate(&todos, &default_categories(), &clock());
        assert_eq!(stats.completion_rate, 67);
    }

    #[test]
    fn weekly_activity_buckets_by_creation_day() {
        let todos = vec![
            todo("a", Priority::Low, true, "privat", "2025-05-14T09:00:00Z"),
            todo("b", Priority::Low, false, "privat", "2025-05-14T23:59:00Z"),
            todo("c", Priority::Low, true, "privat", "2025-05-10T12:00:00Z"),
            // outside the window
            todo("d", Priority::Low, true, "privat", "2025-05-07T12:00:00Z"),
        ];
        let days = weekly_activity(&todos, &clock());
        assert_eq!(days.len(), 7);
        assert_eq!(
            days[6],
            DayActivity {
                date: date(2025, 5, 14),
                created: 2,
                completed: 1
            }
        );
        assert_eq!(
            days[2],
            DayActivity {
                date: date(2025, 5, 10),
                created: 1,
                completed: 1
            }
        );
        let total_created: usize = days.iter().map(|d| d.created).sum();
        assert_eq!(total_created, 3);
    }

    #[test]
    fn category_breakdown_omits_empty_and_unknown() {
        let todos = vec![
            todo("a", Priority::Low, true, "arbeit", "2025-05-01T08:00:00Z"),
            todo("b", Priority::Low, false, "arbeit", "2025-05-01T08:00:00Z"),
            todo("c", Priority::Low, false, "ideen", "2025-05-01T08:00:00Z"),
            todo("d", Priority::Low, false, "sonstiges", "2025-05-01T08:00:00Z"),
        ];
        let breakdown = category_breakdown(&todos, &default_categories());
        assert_eq!(
            breakdown,
            vec![
                CategoryCount {
                    category: "arbeit".into(),
                    completed: 1,
                    pending: 1
                },
                CategoryCount {
                    category: "ideen".into(),
                    completed: 0,
                    pending: 1
                },
            ]
        );
    }

    #[test]
    fn priority_counts_cover_every_group() {
        let todos = vec![
            todo("a", Priority::High, false, "privat", "2025-05-01T08:00:00Z"),
            todo("b", Priority::Low, false, "privat", "2025-05-01T08:00:00Z"),
            todo("c", Priority::Low, false, "privat", "2025-05-01T08:00:00Z"),
        ];
        let counts = priority_counts(&todos);
        assert_eq!(counts.get(Priority::High), 1);
        assert_eq!(counts.get(Priority::Medium), 0);
        assert_eq!(counts.get(Priority::Low), 2);
        assert_eq!(counts.non_empty().len(), 2);
    }

    #[test]
    fn list_summary_counts() {
        let mut a = todo("a", Priority::Low, false, "privat", "2025-05-01T08:00:00Z");
        a.due_date = Some(date(2025, 5, 14));
        let mut b = todo("b", Priority::Low, false, "privat", "2025-05-01T08:00:00Z");
        b.due_date = Some(date(2025, 5, 2));
        let mut c = todo("c", Priority::Low, true, "privat", "2025-05-01T08:00:00Z");
        c.due_date = Some(date(2025, 5, 2));
        let summary = list_summary(&[a, b, c], date(2025, 5, 14));
        assert_eq!(
            summary,
            ListSummary {
                total: 3,
                completed: 1,
                due_today: 1,
                overdue: 1
            }
        );
        assert_eq!(summary.progress(), 33);
    }
}
