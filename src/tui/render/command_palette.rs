use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

const MAX_VISIBLE: usize = 10;
const MAX_INNER_WIDTH: u16 = 60;

/// Render the command palette overlay
pub fn render_command_palette(frame: &mut Frame, app: &App, area: Rect) {
    let Some(palette) = &app.palette else {
        return;
    };

    let bg = app.theme.background;
    let dim = app.theme.dim;
    let highlight = app.theme.highlight;
    let blank_style = Style::default().bg(bg);
    let normal_style = Style::default().fg(app.theme.text).bg(bg);

    let inner_w = area.width.saturating_sub(4).min(MAX_INNER_WIDTH) as usize;
    let popup_w = inner_w as u16 + 2;

    let results = palette.matches();
    let selected = palette.selected_index();
    let mut lines: Vec<Line> = Vec::new();

    // Input line: " > query▌"
    let prompt = " > ";
    let query = truncate_to_width(palette.query(), inner_w.saturating_sub(prompt.len() + 1));
    let used = prompt.len() + display_width(&query) + 1;
    lines.push(Line::from(vec![
        Span::styled(
            prompt,
            Style::default()
                .fg(highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(query, Style::default().fg(app.theme.text_bright).bg(bg)),
        Span::styled("\u{258C}", Style::default().fg(highlight).bg(bg)),
        Span::styled(" ".repeat(inner_w.saturating_sub(used)), blank_style),
    ]));

    lines.push(Line::from(Span::styled(
        "\u{2500}".repeat(inner_w),
        Style::default().fg(dim).bg(bg),
    )));

    if results.is_empty() {
        let msg = "No matching actions";
        let left_pad = inner_w.saturating_sub(msg.len()) / 2;
        lines.push(Line::from(Span::styled(" ".repeat(inner_w), blank_style)));
        lines.push(Line::from(vec![
            Span::styled(" ".repeat(left_pad), blank_style),
            Span::styled(pad_to_width(msg, inner_w - left_pad), normal_style),
        ]));
        lines.push(Line::from(Span::styled(" ".repeat(inner_w), blank_style)));
    } else {
        let visible = results.len().min(MAX_VISIBLE);
        let scroll = (selected + 1).saturating_sub(visible);

        for (idx, command) in results.iter().enumerate().skip(scroll).take(visible) {
            let is_selected = idx == selected;
            let row_bg = if is_selected { app.theme.selection_bg } else { bg };
            let indicator = if is_selected { " \u{25B6} " } else { "   " };
            let label_style = if is_selected {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                normal_style
            };

            let shortcut = command.shortcut.unwrap_or("");
            let label_w = inner_w.saturating_sub(indicator.chars().count() + shortcut.len() + 1);
            let label = pad_to_width(&truncate_to_width(command.label, label_w), label_w);

            lines.push(Line::from(vec![
                Span::styled(
                    indicator,
                    Style::default()
                        .fg(highlight)
                        .bg(row_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(label, label_style),
                Span::styled(format!("{} ", shortcut), Style::default().fg(dim).bg(row_bg)),
            ]));
        }
    }

    lines.push(Line::from(Span::styled(" ".repeat(inner_w), blank_style)));
    lines.push(Line::from(Span::styled(
        pad_to_width(
            &format!("   {} of {} actions", results.len(), palette.table_len()),
            inner_w,
        ),
        Style::default().fg(dim).bg(bg),
    )));

    // Position: centered horizontally, top at row 3 of content area
    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + 3.min(area.height.saturating_sub(popup_h));
    let popup_area = Rect::new(x, y, popup_w.min(area.width), popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        popup_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn palette_output(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_command_palette(frame, app, area);
        })
    }

    #[test]
    fn lists_all_commands_with_first_selected() {
        let mut app = app_with_todos(vec![]);
        app.open_palette();
        let output = palette_output(&app);
        assert!(output.contains(" \u{25B6} List view"));
        assert!(output.contains("   Kanban board"));
        assert!(output.contains("   Toggle dark mode"));
        assert!(output.contains("   5 of 5 actions"));
    }

    #[test]
    fn query_narrows_results() {
        let mut app = app_with_todos(vec![]);
        app.open_palette();
        if let Some(p) = app.palette.as_mut() {
            p.set_query("termin");
            p.select_next();
        }
        let output = palette_output(&app);
        assert!(output.contains(" > termin"));
        assert!(output.contains(" \u{25B6} Calendar"));
        assert!(!output.contains("List view"));
        assert!(output.contains("   1 of 5 actions"));
    }

    #[test]
    fn empty_state() {
        let mut app = app_with_todos(vec![]);
        app.open_palette();
        if let Some(p) = app.palette.as_mut() {
            p.set_query("zzz");
        }
        let output = palette_output(&app);
        assert!(output.contains("No matching actions"));
        assert!(output.contains("   0 of 5 actions"));
    }
}
