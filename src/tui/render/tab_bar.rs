use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::ViewType;
use crate::ops::filter::{CategoryFilter, StatusFilter};
use crate::ops::sort::SortKey;
use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the tab bar: one tab per view, separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(
        "\u{2713}",
        Style::default().fg(app.theme.purple).bg(bg),
    ));
    spans.push(Span::styled(" ", Style::default().bg(bg)));

    for (i, view) in ViewType::ALL.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, view.title());
        spans.push(Span::styled(label, tab_style(app, app.view == *view)));
        sep_cols.push(spans.iter().map(|s| display_width(&s.content)).sum());
        spans.push(sep.clone());
    }

    // Board name, right-aligned
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let name = &app.board.config.board.name;
    let name_w = display_width(name) + 1;
    if used + name_w < area.width as usize {
        spans.push(Span::styled(
            " ".repeat(area.width as usize - used - name_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            format!("{} ", name),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let tabs = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    sep_cols
}

/// The list controls that differ from their defaults, as indicator spans
fn list_indicator(app: &App) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    let list = &app.list;
    let mut parts: Vec<Span<'static>> = Vec::new();

    if list.filter != StatusFilter::All {
        parts.push(Span::styled(
            list.filter.as_str().to_string(),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }
    if let CategoryFilter::Only(category) = &list.category {
        parts.push(Span::styled(
            format!("#{}", category),
            Style::default()
                .fg(app.theme.category_color(category, app.categories()))
                .bg(bg),
        ));
    }
    if list.sort != SortKey::Date {
        parts.push(Span::styled(
            format!("by {}", list.sort.as_str()),
            Style::default().fg(app.theme.cyan).bg(bg),
        ));
    }
    if parts.is_empty() {
        return parts;
    }

    let mut spans = vec![Span::styled(
        "filter: ",
        Style::default().fg(app.theme.purple).bg(bg),
    )];
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        spans.push(part);
    }
    spans
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    let indicator = if app.view == ViewType::List {
        list_indicator(app)
    } else {
        Vec::new()
    };
    let indicator_width: usize = indicator.iter().map(|s| display_width(&s.content)).sum();

    // +2: one space before the indicator, one after
    let separator_end = if indicator.is_empty() {
        width
    } else {
        width.saturating_sub(indicator_width + 2)
    };

    let line_text: String = (0..separator_end)
        .map(|col| if sep_cols.contains(&col) { '\u{2534}' } else { '\u{2500}' })
        .collect();

    let mut spans = vec![Span::styled(line_text, Style::default().fg(dim).bg(bg))];
    if !indicator.is_empty() && separator_end > 0 {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.extend(indicator);
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
