use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_command(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.close_palette(),
        (_, KeyCode::Enter) => app.run_palette_selection(),
        (_, KeyCode::Up) | (KeyModifiers::CONTROL, KeyCode::Char('p')) => {
            if let Some(p) = app.palette.as_mut() {
                p.select_prev();
            }
        }
        (_, KeyCode::Down) | (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
            if let Some(p) = app.palette.as_mut() {
                p.select_next();
            }
        }
        (_, KeyCode::Backspace) => {
            if let Some(p) = app.palette.as_mut() {
                p.pop_char();
            }
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            if let Some(p) = app.palette.as_mut() {
                p.push_char(c);
            }
        }
        _ => {}
    }
}
