pub mod calendar_view;
pub mod command_palette;
pub mod kanban_view;
pub mod list_view;
pub mod stats_view;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::model::{Todo, ViewType};
use crate::ops::filter::{due_label, due_status};
use crate::util::unicode::{display_width, fit_to_width};

use super::app::{App, LoadState, Mode};

/// Draw the whole screen for the current app state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match &app.load_state {
        LoadState::Failed(message) => render_load_error(frame, app, chunks[1], message),
        LoadState::Loading if app.todos.is_empty() => {
            render_centered(frame, app, chunks[1], "Loading\u{2026}")
        }
        _ => match app.view {
            ViewType::List => list_view::render_list_view(frame, app, chunks[1]),
            ViewType::Kanban => kanban_view::render_kanban_view(frame, app, chunks[1]),
            ViewType::Calendar => calendar_view::render_calendar_view(frame, app, chunks[1]),
            ViewType::Stats => stats_view::render_stats_view(frame, app, chunks[1]),
        },
    }

    // Command palette (rendered on top of content)
    if app.mode == Mode::Command {
        command_palette::render_command_palette(frame, app, chunks[1]);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

fn render_load_error(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let bg = app.theme.background;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Could not load todos",
            Style::default()
                .fg(app.theme.red)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(app.theme.text).bg(bg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  r retry  q quit",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// One dim line of text in the middle of `area`
pub(super) fn render_centered(frame: &mut Frame, app: &App, area: Rect, text: &str) {
    if area.height == 0 {
        return;
    }
    let w = display_width(text) as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height / 2;
    let rect = Rect::new(x, y, w.min(area.width), 1);
    let para = Paragraph::new(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ));
    frame.render_widget(para, rect);
}

/// Spans for one todo row: checkbox, priority mark, text, category, due.
/// Used by the list view and the calendar's day panel. The row fills
/// exactly `width` cells.
pub(super) fn todo_row_spans(app: &App, todo: &Todo, width: usize, selected: bool) -> Vec<Span<'static>> {
    let theme = &app.theme;
    let row_bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().bg(row_bg);

    let check = if todo.completed { "[x] " } else { "[ ] " };
    let mark = match todo.priority {
        crate::model::Priority::High => "! ",
        _ => "  ",
    };
    let category = format!("  #{}", todo.category);
    let due = todo
        .due_date
        .map(|d| format!("  {}", due_label(d, app.clock.today)))
        .unwrap_or_default();

    let fixed = 1 + check.len() + mark.len() + display_width(&category) + display_width(&due);
    let text_w = width.saturating_sub(fixed);

    let text_style = if todo.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        base.fg(theme.text_bright).add_modifier(Modifier::BOLD)
    } else {
        base.fg(theme.text)
    };

    let mut spans = vec![
        Span::styled(if selected { "\u{258E}" } else { " " }, base.fg(theme.highlight)),
        Span::styled(
            check,
            base.fg(if todo.completed { theme.green } else { theme.dim }),
        ),
        Span::styled(mark, base.fg(theme.priority_color(todo.priority))),
        Span::styled(fit_to_width(&todo.text, text_w), text_style),
        Span::styled(
            category,
            base.fg(theme.category_color(&todo.category, app.categories())),
        ),
    ];
    if let Some(d) = todo.due_date {
        let color = if todo.completed {
            theme.dim
        } else {
            theme.due_color(due_status(d, app.clock.today))
        };
        spans.push(Span::styled(due, base.fg(color)));
    }
    spans
}
