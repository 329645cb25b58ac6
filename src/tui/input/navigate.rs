use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::ViewType;
use crate::ops::filter::KanbanColumn;
use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('k')) | (_, KeyCode::Char(':')) => {
            app.open_palette();
        }
        (_, KeyCode::Char(c @ '1'..='4')) => {
            let idx = c as usize - '1' as usize;
            app.switch_view(ViewType::ALL[idx]);
        }
        (_, KeyCode::Tab) => app.cycle_view(true),
        (_, KeyCode::BackTab) => app.cycle_view(false),
        (_, KeyCode::Char('t')) => app.toggle_theme(),
        (_, KeyCode::Char('r')) => app.refresh(),
        _ => match app.view {
            ViewType::List => handle_list(app, key.code),
            ViewType::Kanban => handle_kanban(app, key.code),
            ViewType::Calendar => handle_calendar(app, key.code),
            ViewType::Stats => {}
        },
    }
}

/// Keys acting on the selected todo, shared by list, kanban and calendar.
/// Returns false if the key is not one of them.
fn handle_item_key(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(),
        KeyCode::Char('a') => app.begin_add(),
        KeyCode::Char('e') => app.begin_edit(),
        KeyCode::Char('D') | KeyCode::Delete => app.begin_delete(),
        _ => return false,
    }
    true
}

fn handle_list(app: &mut App, code: KeyCode) {
    if handle_item_key(app, code) {
        return;
    }
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor_to_end(false),
        KeyCode::Char('G') | KeyCode::End => app.cursor_to_end(true),
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('c') => app.cycle_category(),
        KeyCode::Char('s') => app.cycle_sort(),
        _ => {}
    }
}

fn handle_kanban(app: &mut App, code: KeyCode) {
    if handle_item_key(app, code) {
        return;
    }
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('h') | KeyCode::Left => app.focus_column(KanbanColumn::Open),
        KeyCode::Char('l') | KeyCode::Right => app.focus_column(KanbanColumn::Done),
        KeyCode::Char('H') => app.move_card(KanbanColumn::Open),
        KeyCode::Char('L') => app.move_card(KanbanColumn::Done),
        _ => {}
    }
}

fn handle_calendar(app: &mut App, code: KeyCode) {
    if handle_item_key(app, code) {
        return;
    }
    match code {
        KeyCode::Char('h') | KeyCode::Left => app.move_day(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_day(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_day(-7),
        KeyCode::Char('j') | KeyCode::Down => app.move_day(7),
        KeyCode::Char('[') => app.shift_month(false),
        KeyCode::Char(']') => app.shift_month(true),
        KeyCode::Char('g') => app.select_today(),
        // Step through the selected day's todos
        KeyCode::Char('J') => app.move_cursor(1),
        KeyCode::Char('K') => app.move_cursor(-1),
        _ => {}
    }
}
