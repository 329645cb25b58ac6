use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::ViewType;
use crate::tui::app::{App, EditTarget, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::Navigate => {
            let spans = match &app.status {
                Some(status) => vec![Span::styled(
                    status.text.clone(),
                    Style::default()
                        .fg(if status.is_error { app.theme.red } else { app.theme.green })
                        .bg(bg),
                )],
                None => Vec::new(),
            };
            (spans, navigate_hint(app.view))
        }
        Mode::Edit => {
            let prompt = match &app.edit_target {
                Some(EditTarget::Text { .. }) => "edit: ",
                _ => "new: ",
            };
            let spans = vec![
                Span::styled(prompt, Style::default().fg(app.theme.purple).bg(bg)),
                Span::styled(
                    app.edit_buffer.clone(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ];
            (spans, "Enter save  Esc cancel")
        }
        Mode::Confirm => {
            let text = app.pending_delete_text().unwrap_or("todo");
            let spans = vec![Span::styled(
                format!("Delete \"{}\"?", truncate_to_width(text, 40)),
                Style::default().fg(app.theme.red).bg(bg),
            )];
            (spans, "y delete  n cancel")
        }
        Mode::Command => (Vec::new(), "\u{2191}\u{2193} select  Enter run  Esc close"),
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn navigate_hint(view: ViewType) -> &'static str {
    match view {
        ViewType::List => "a add  x done  f filter  c category  s sort  : commands",
        ViewType::Kanban => "h/l column  H/L move  x done  : commands",
        ViewType::Calendar => "hjkl day  [ ] month  J/K todo  : commands",
        ViewType::Stats => "r reload  t theme  : commands",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn status_line(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn edit_prompt() {
        let mut app = app_with_todos(vec![]);
        app.begin_add();
        app.edit_push('M');
        assert_snapshot!(status_line(&app), @"new: M▌                                                   Enter save  Esc cancel");
    }

    #[test]
    fn error_message_keeps_hint() {
        let mut app = app_with_todos(vec![]);
        app.set_error("toggle failed: boom".into());
        let line = status_line(&app);
        assert!(line.starts_with("toggle failed: boom"));
        assert!(line.ends_with(": commands"));
    }

    #[test]
    fn confirm_prompt_names_todo() {
        let mut app = app_with_todos(vec![todo("a", "Milk", false)]);
        app.begin_delete();
        let line = status_line(&app);
        assert!(line.starts_with("Delete \"Milk\"?"));
        assert!(line.ends_with("y delete  n cancel"));
    }
}
