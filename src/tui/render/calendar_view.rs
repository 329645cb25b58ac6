use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::filter::{CALENDAR_DAY_LIMIT, CalendarDay, WEEKDAY_LABELS, calendar_month};
use crate::tui::app::App;
use crate::util::unicode::fit_to_width;

use super::todo_row_spans;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Rows reserved under the grid for the selected day's todos
const DAY_PANEL_ROWS: usize = 5;

/// Render the month grid for the selected day's month, then the selected
/// day's todos below it
pub fn render_calendar_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;
    let (year, month) = app.calendar_month();

    let days = calendar_month(&app.todos, year, month, app.clock.today);
    let weeks = days.len() / 7;
    let cell_w = (width / 7).max(2);

    let mut lines: Vec<Line> = Vec::new();

    // Title: month and year, with navigation hint
    let title = format!(" {} {}", MONTH_NAMES[month as usize - 1], year);
    lines.push(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   [ prev  ] next", Style::default().fg(app.theme.dim).bg(bg)),
    ]));

    // Weekday header
    let header: Vec<Span> = WEEKDAY_LABELS
        .iter()
        .map(|label| {
            Span::styled(
                fit_to_width(&format!(" {}", label), cell_w),
                Style::default().fg(app.theme.purple).bg(bg),
            )
        })
        .collect();
    lines.push(Line::from(header));

    // Each week gets the same height, up to a day line plus the todo limit
    let grid_h = height.saturating_sub(2 + DAY_PANEL_ROWS);
    let cell_h = (grid_h / weeks.max(1)).clamp(1, 1 + CALENDAR_DAY_LIMIT);

    for week in days.chunks(7) {
        for row in 0..cell_h {
            let spans: Vec<Span> = week
                .iter()
                .map(|day| cell_span(app, day, row, cell_h, cell_w))
                .collect();
            lines.push(Line::from(spans));
        }
    }

    lines.extend(day_panel(app, width));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// One row of one day cell. Row 0 holds the day number and the count of
/// todos not shown; later rows hold todo texts.
fn cell_span(app: &App, day: &CalendarDay, row: usize, cell_h: usize, cell_w: usize) -> Span<'static> {
    let theme = &app.theme;
    let selected = day.date == app.calendar.selected;
    let cell_bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().bg(cell_bg);

    let text_rows = cell_h - 1;
    if row == 0 {
        let hidden = day.overflow + day.shown.len().saturating_sub(text_rows);
        let label = if hidden > 0 {
            format!(" {:>2} +{}", day.date.day(), hidden)
        } else {
            format!(" {:>2}", day.date.day())
        };
        let style = if day.is_today {
            base.fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else if !day.in_month {
            base.fg(theme.dim)
        } else if selected {
            base.fg(theme.text_bright).add_modifier(Modifier::BOLD)
        } else {
            base.fg(theme.text)
        };
        return Span::styled(fit_to_width(&label, cell_w), style);
    }

    match day.shown.get(row - 1) {
        Some(todo) => {
            let style = if todo.completed {
                base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
            } else {
                base.fg(theme.priority_color(todo.priority))
            };
            // One leading space, one trailing gap between cells
            let text = format!(" {}", todo.text);
            let fitted = fit_to_width(&text, cell_w.saturating_sub(1));
            Span::styled(format!("{} ", fitted), style)
        }
        None => Span::styled(" ".repeat(cell_w), base),
    }
}

fn day_panel(app: &App, width: usize) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let todos = app.day_todos();
    let date = app.calendar.selected;

    let heading = match todos.len() {
        0 => "nothing due".to_string(),
        1 => "1 todo due".to_string(),
        n => format!("{} todos due", n),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", date.format("%a %d.%m.%Y")),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(heading, Style::default().fg(app.theme.dim).bg(bg)),
    ])];

    let rows = DAY_PANEL_ROWS - 1;
    let scroll = (app.calendar.cursor + 1).saturating_sub(rows);
    for (i, todo) in todos.iter().enumerate().skip(scroll).take(rows) {
        lines.push(Line::from(todo_row_spans(
            app,
            todo,
            width,
            i == app.calendar.cursor,
        )));
    }
    lines
}
