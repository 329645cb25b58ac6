use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{Priority, Todo};
use crate::ops::filter::{KanbanColumn, due_label, due_status};
use crate::tui::app::App;
use crate::util::unicode::{display_width, fit_to_width};

/// Render the kanban board: "To do" and "Done" side by side
pub fn render_kanban_view(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let board = app.kanban_board();
    for (col, rect) in [KanbanColumn::Open, KanbanColumn::Done]
        .into_iter()
        .zip(columns.iter())
    {
        render_column(frame, app, *rect, col, board.column(col));
    }
}

fn render_column(frame: &mut Frame, app: &App, area: Rect, col: KanbanColumn, todos: &[&Todo]) {
    let bg = app.theme.background;
    let focused = app.kanban.column == col;
    let border = if focused { app.theme.highlight } else { app.theme.dim };

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", col.title()),
            Style::default()
                .fg(if focused { app.theme.text_bright } else { app.theme.text })
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", todos.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));

    let inner_w = area.width.saturating_sub(2) as usize;
    let inner_h = area.height.saturating_sub(2) as usize;

    if todos.is_empty() {
        let msg = match col {
            KanbanColumn::Open => " Nothing to do",
            KanbanColumn::Done => " Nothing done yet",
        };
        let para = Paragraph::new(Span::styled(msg, Style::default().fg(app.theme.dim).bg(bg)))
            .block(block);
        frame.render_widget(para, area);
        return;
    }

    // Each card takes two rows: text, then category and due date
    let cursor = app.kanban.cursor(col);
    let per_page = (inner_h / 2).max(1);
    let scroll = (cursor + 1).saturating_sub(per_page);

    let mut lines: Vec<Line> = Vec::new();
    for (i, todo) in todos.iter().enumerate().skip(scroll).take(per_page) {
        let selected = focused && i == cursor;
        lines.extend(card_lines(app, todo, inner_w, selected));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn card_lines(app: &App, todo: &Todo, width: usize, selected: bool) -> [Line<'static>; 2] {
    let theme = &app.theme;
    let row_bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().bg(row_bg);

    let mark = if todo.priority == Priority::High { "! " } else { "  " };
    let text_style = if todo.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        base.fg(theme.text_bright).add_modifier(Modifier::BOLD)
    } else {
        base.fg(theme.text)
    };
    let first = Line::from(vec![
        Span::styled(if selected { "\u{258E}" } else { " " }, base.fg(theme.highlight)),
        Span::styled(mark, base.fg(theme.priority_color(todo.priority))),
        Span::styled(fit_to_width(&todo.text, width.saturating_sub(3)), text_style),
    ]);

    let category = format!("   #{}", todo.category);
    let mut second = vec![Span::styled(
        category.clone(),
        base.fg(theme.category_color(&todo.category, app.categories())),
    )];
    let mut used = display_width(&category);
    if let Some(d) = todo.due_date {
        let due = format!("  {}", due_label(d, app.clock.today));
        used += display_width(&due);
        let color = if todo.completed {
            theme.dim
        } else {
            theme.due_color(due_status(d, app.clock.today))
        };
        second.push(Span::styled(due, base.fg(color)));
    }
    second.push(Span::styled(" ".repeat(width.saturating_sub(used)), base));

    [first, Line::from(second)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ViewType;
    use crate::tui::render::test_helpers::*;

    fn kanban_output(app: &App) -> String {
        render_to_string(TERM_W, TERM_H - 3, |frame, area| {
            render_kanban_view(frame, app, area);
        })
    }

    #[test]
    fn columns_with_counts() {
        let mut app = app_with_todos(vec![
            todo("a", "Write report", false),
            todo("b", "Buy milk", false),
            todo("c", "Book flights", true),
        ]);
        app.switch_view(ViewType::Kanban);
        let output = kanban_output(&app);
        assert!(output.contains(" To do 2 "));
        assert!(output.contains(" Done 1 "));
        assert!(output.contains("\u{258E}  Write report"));
        assert!(output.contains("   Buy milk"));
        assert!(output.contains("Book flights"));
        assert!(output.contains("#privat"));
    }

    #[test]
    fn empty_columns() {
        let mut app = app_with_todos(vec![]);
        app.switch_view(ViewType::Kanban);
        let output = kanban_output(&app);
        assert!(output.contains("Nothing to do"));
        assert!(output.contains("Nothing done yet"));
    }

    #[test]
    fn focus_marks_only_focused_column() {
        let mut app = app_with_todos(vec![todo("a", "Open one", false), todo("b", "Closed one", true)]);
        app.switch_view(ViewType::Kanban);
        app.focus_column(KanbanColumn::Done);
        let output = kanban_output(&app);
        assert!(output.contains("\u{258E}  Closed one"));
        assert!(!output.contains("\u{258E}  Open one"));
    }
}
