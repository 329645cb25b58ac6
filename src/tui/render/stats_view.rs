use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::stats::{StatsSnapshot, aggregate, percentage};
use crate::tui::app::App;
use crate::util::unicode::{display_width, fit_to_width};

/// Render the statistics dashboard over the full collection
pub fn render_stats_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let snapshot = aggregate(&app.todos, app.categories(), &app.clock);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(card_lines(app, &snapshot)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let mut left = priority_lines(app, &snapshot, columns[0].width as usize);
    left.push(Line::from(""));
    left.extend(category_lines(app, &snapshot, columns[0].width as usize));
    frame.render_widget(Paragraph::new(left).style(Style::default().bg(bg)), columns[0]);

    let right = activity_lines(app, &snapshot, columns[1].width as usize);
    frame.render_widget(Paragraph::new(right).style(Style::default().bg(bg)), columns[1]);
}

/// Headline numbers: value row, label row, blank
fn card_lines(app: &App, s: &StatsSnapshot) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let theme = &app.theme;
    let cards: [(String, &str, Color); 4] = [
        (s.total.to_string(), "total", theme.text_bright),
        (format!("{}%", s.completion_rate), "completed", theme.green),
        (s.high_priority_open.to_string(), "high priority", theme.red),
        (s.overdue_count.to_string(), "overdue", theme.yellow),
    ];
    let card_w = 18;

    let values: Vec<Span> = cards
        .iter()
        .map(|(value, _, color)| {
            Span::styled(
                fit_to_width(&format!(" {}", value), card_w),
                Style::default().fg(*color).bg(bg).add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    let labels: Vec<Span> = cards
        .iter()
        .map(|(_, label, _)| {
            Span::styled(
                fit_to_width(&format!(" {}", label), card_w),
                Style::default().fg(theme.dim).bg(bg),
            )
        })
        .collect();

    vec![Line::from(values), Line::from(labels), Line::from("")]
}

fn section_title(app: &App, title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(app.theme.purple)
            .bg(app.theme.background)
            .add_modifier(Modifier::BOLD),
    ))
}

/// A bar of `value / max` over `width` cells
fn bar(value: usize, max: usize, width: usize) -> String {
    let filled = if max == 0 { 0 } else { (value * width).div_ceil(max) };
    "\u{2588}".repeat(filled.min(width))
}

fn priority_lines(app: &App, s: &StatsSnapshot, width: usize) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let mut lines = vec![section_title(app, "Priority")];
    if s.priority_distribution.is_empty() {
        lines.push(empty_line(app));
        return lines;
    }
    let bar_w = width.saturating_sub(20);
    for p in &s.priority_distribution {
        let pct = percentage(p.count, s.total);
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<7}", p.priority.as_str()),
                Style::default().fg(app.theme.text).bg(bg),
            ),
            Span::styled(
                bar(p.count, s.total, bar_w),
                Style::default().fg(app.theme.priority_color(p.priority)).bg(bg),
            ),
            Span::styled(
                format!(" {} ({}%)", p.count, pct),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ]));
    }
    lines
}

fn category_lines(app: &App, s: &StatsSnapshot, width: usize) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let mut lines = vec![section_title(app, "Categories")];
    if s.category_breakdown.is_empty() {
        lines.push(empty_line(app));
        return lines;
    }
    let name_w = s
        .category_breakdown
        .iter()
        .map(|c| display_width(&c.category))
        .max()
        .unwrap_or(0)
        .min(12);
    let max = s
        .category_breakdown
        .iter()
        .map(|c| c.completed + c.pending)
        .max()
        .unwrap_or(0);
    let bar_w = width.saturating_sub(name_w + 14);
    for c in &s.category_breakdown {
        let total = c.completed + c.pending;
        let total_w = (total * bar_w).div_ceil(max.max(1));
        let done_w = if total == 0 { 0 } else { c.completed * total_w / total };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", fit_to_width(&c.category, name_w)),
                Style::default()
                    .fg(app.theme.category_color(&c.category, app.categories()))
                    .bg(bg),
            ),
            Span::styled(
                "\u{2588}".repeat(done_w),
                Style::default().fg(app.theme.green).bg(bg),
            ),
            Span::styled(
                "\u{2588}".repeat(total_w - done_w),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
            Span::styled(
                format!(" {}/{}", c.completed, total),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ]));
    }
    lines
}

/// Last seven days, oldest first: created and completed per day
fn activity_lines(app: &App, s: &StatsSnapshot, width: usize) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let mut lines = vec![section_title(app, "Last 7 days")];
    let max = s
        .weekly_activity
        .iter()
        .map(|d| d.created)
        .max()
        .unwrap_or(0);
    let bar_w = width.saturating_sub(16);
    for day in &s.weekly_activity {
        let created_w = bar(day.created, max, bar_w);
        let done_w = bar(day.completed, max, bar_w);
        let label = day.date.format("%a").to_string();
        let today = day.date == app.clock.today;
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(if today { app.theme.highlight } else { app.theme.text })
                    .bg(bg),
            ),
            Span::styled(created_w, Style::default().fg(app.theme.blue).bg(bg)),
            Span::styled(
                format!(" {}", day.created),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("     ", Style::default().bg(bg)),
            Span::styled(done_w, Style::default().fg(app.theme.green).bg(bg)),
            Span::styled(
                format!(" {} done", day.completed),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ]));
    }
    lines
}

fn empty_line(app: &App) -> Line<'static> {
    Line::from(Span::styled(
        " no todos",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ))
}
