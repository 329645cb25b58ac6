mod command;
mod confirm;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

use command::handle_command;
use confirm::handle_confirm;
use edit::handle_edit;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    // A status message lasts until the next key in navigate mode
    if app.mode == Mode::Navigate {
        app.status = None;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Command => handle_command(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ViewType;
    use crate::ops::filter::KanbanColumn;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn number_keys_switch_views() {
        let mut app = app_with_todos(vec![]);
        press(&mut app, "2");
        assert_eq!(app.view, ViewType::Kanban);
        press(&mut app, "4");
        assert_eq!(app.view, ViewType::Stats);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.view, ViewType::List);
        handle_key(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.view, ViewType::Stats);
    }

    #[test]
    fn palette_flow() {
        let mut app = app_with_todos(vec![]);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert_eq!(app.mode, Mode::Command);

        // Typing filters instead of navigating
        press(&mut app, "kan");
        assert_eq!(app.palette.as_ref().map(|p| p.query()), Some("kan"));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.view, ViewType::Kanban);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn palette_arrow_keys_wrap_and_esc_closes() {
        let mut app = app_with_todos(vec![]);
        press(&mut app, ":");
        assert_eq!(app.mode, Mode::Command);
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.palette.as_ref().map(|p| p.selected_index()), Some(4));
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.palette.as_ref().map(|p| p.selected_index()), Some(0));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.palette.is_none());
        assert_eq!(app.view, ViewType::List);
    }

    #[test]
    fn list_keys() {
        let mut app = app_with_todos(vec![todo("a", "One", false), todo("b", "Two", false)]);
        press(&mut app, "j ");
        assert!(app.todos[1].completed);
        press(&mut app, "kx");
        assert!(app.todos[0].completed);

        press(&mut app, "f");
        assert_eq!(app.list.filter.as_str(), "active");
        press(&mut app, "s");
        assert_eq!(app.list.sort.as_str(), "priority");
        press(&mut app, "c");
        assert_eq!(app.list.category.label(), "arbeit");
    }

    #[test]
    fn add_via_keys() {
        let mut app = app_with_todos(vec![]);
        press(&mut app, "a");
        assert_eq!(app.mode, Mode::Edit);
        // Navigation letters are text while editing
        press(&mut app, "jam");
        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.todos[0].text, "ja");
    }

    #[test]
    fn esc_cancels_edit() {
        let mut app = app_with_todos(vec![todo("a", "Milk", false)]);
        press(&mut app, "e");
        press(&mut app, "xyz");
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.todos[0].text, "Milk");
    }

    #[test]
    fn delete_confirm_keys() {
        let mut app = app_with_todos(vec![todo("a", "Milk", false)]);
        press(&mut app, "D");
        assert_eq!(app.mode, Mode::Confirm);
        press(&mut app, "n");
        assert_eq!(app.todos.len(), 1);
        press(&mut app, "Dy");
        assert!(app.todos.is_empty());
    }

    #[test]
    fn kanban_keys() {
        let mut app = app_with_todos(vec![todo("a", "One", false)]);
        press(&mut app, "2L");
        assert!(app.todos[0].completed);
        assert_eq!(app.kanban.column, KanbanColumn::Done);
        press(&mut app, "H");
        assert!(!app.todos[0].completed);
        press(&mut app, "l");
        assert_eq!(app.kanban.column, KanbanColumn::Done);
    }

    #[test]
    fn calendar_keys() {
        let mut app = app_with_todos(vec![]);
        press(&mut app, "3");
        press(&mut app, "l");
        assert_eq!(app.calendar.selected, today().succ_opt().unwrap());
        press(&mut app, "k");
        assert_eq!(app.calendar.selected.to_string(), "2025-05-08");
        press(&mut app, "]");
        assert_eq!(app.calendar.selected.to_string(), "2025-06-08");
        press(&mut app, "g");
        assert_eq!(app.calendar.selected, today());
    }

    #[test]
    fn theme_and_quit() {
        let mut app = app_with_todos(vec![]);
        let dark = app.dark;
        press(&mut app, "t");
        assert_eq!(app.dark, !dark);
        press(&mut app, "q");
        assert!(app.should_quit);
    }

    #[test]
    fn status_clears_on_next_key() {
        let mut app = app_with_todos(vec![]);
        app.set_error("boom".into());
        press(&mut app, "j");
        assert!(app.status.is_none());
    }
}
