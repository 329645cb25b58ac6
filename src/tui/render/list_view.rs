use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::stats::{ListSummary, list_summary};
use crate::tui::app::App;

use super::{render_centered, todo_row_spans};

/// Header rows above the todo list: counts line, progress bar, blank
const HEADER_ROWS: usize = 3;

/// Render the list view: summary header, then filtered and sorted todos
pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;

    let summary = list_summary(&app.todos, app.clock.today);
    let mut lines = summary_lines(app, &summary, width);

    let rows = app.visible_todos();
    if rows.is_empty() {
        let msg = if app.todos.is_empty() {
            "No todos yet. Press a to add one."
        } else {
            "Nothing matches this filter"
        };
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(bg)),
            area,
        );
        let below = Rect {
            y: area.y + HEADER_ROWS as u16,
            height: area.height.saturating_sub(HEADER_ROWS as u16),
            ..area
        };
        render_centered(frame, app, below, msg);
        return;
    }

    // Keep the cursor on screen
    let list_h = height.saturating_sub(HEADER_ROWS).max(1);
    let scroll = (app.list.cursor + 1).saturating_sub(list_h);

    for (i, todo) in rows.iter().enumerate().skip(scroll).take(list_h) {
        let selected = i == app.list.cursor;
        lines.push(Line::from(todo_row_spans(app, todo, width, selected)));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        area,
    );
}

/// "12 todos  3 done  1 due today  2 overdue" plus a progress bar
fn summary_lines(app: &App, summary: &ListSummary, width: usize) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let theme = &app.theme;
    let count = |n: usize, label: &str, color| {
        vec![
            Span::styled(
                n.to_string(),
                Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}  ", label), Style::default().fg(theme.dim).bg(bg)),
        ]
    };

    let mut counts = vec![Span::styled(" ", Style::default().bg(bg))];
    counts.extend(count(summary.total, "todos", theme.text_bright));
    counts.extend(count(summary.completed, "done", theme.green));
    counts.extend(count(summary.due_today, "due today", theme.yellow));
    counts.extend(count(summary.overdue, "overdue", theme.red));

    // Progress bar: " [█████░░░░░] 50%"
    let pct = summary.progress();
    let bar_w = width.saturating_sub(8).min(40);
    let filled = bar_w * pct as usize / 100;
    let bar = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            "\u{2588}".repeat(filled),
            Style::default().fg(theme.highlight).bg(bg),
        ),
        Span::styled(
            "\u{2591}".repeat(bar_w - filled),
            Style::default().fg(theme.dim).bg(bg),
        ),
        Span::styled(format!(" {}%", pct), Style::default().fg(theme.text).bg(bg)),
    ];

    vec![Line::from(counts), Line::from(bar), Line::from("")]
}
