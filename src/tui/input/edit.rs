use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.cancel_edit(),
        (_, KeyCode::Enter) => app.submit_edit(),
        (_, KeyCode::Backspace) => app.edit_pop(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.edit_buffer.clear(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => app.edit_push(c),
        _ => {}
    }
}
