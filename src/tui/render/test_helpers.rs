use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{NaiveDate, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::board_io;
use crate::io::store::{ListQuery, StoreError, TodoStore, open_store};
use crate::model::{Board, BoardConfig, NewTodo, Priority, Todo, TodoPatch};
use crate::ops::clock::Clock;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Wednesday, so the calendar month starts mid-week
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 14).unwrap()
}

pub fn todo(id: &str, text: &str, completed: bool) -> Todo {
    Todo {
        id: id.to_string(),
        text: text.to_string(),
        description: None,
        completed,
        category: "privat".into(),
        priority: Priority::Medium,
        due_date: None,
        is_archived: false,
        user_id: "local".into(),
        created_at: Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap(),
    }
}

/// In-memory store. Clones share the same collection, so a test can keep a
/// handle for injecting failures after the app takes ownership.
#[derive(Clone, Default)]
pub struct MemoryStore {
    todos: Rc<RefCell<Vec<Todo>>>,
    next_id: Rc<Cell<u32>>,
    fail_list: Rc<Cell<bool>>,
    fail_write: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new(todos: Vec<Todo>) -> Self {
        MemoryStore {
            todos: Rc::new(RefCell::new(todos)),
            ..Default::default()
        }
    }

    pub fn fail_next_list(&self) {
        self.fail_list.set(true);
    }

    pub fn fail_next_write(&self) {
        self.fail_write.set(true);
    }

    fn injected(flag: &Cell<bool>) -> Result<(), StoreError> {
        if flag.replace(false) {
            return Err(StoreError::Io {
                path: PathBuf::from("memory"),
                source: std::io::Error::other("injected failure"),
            });
        }
        Ok(())
    }
}

impl TodoStore for MemoryStore {
    fn list(&self, query: ListQuery) -> Result<Vec<Todo>, StoreError> {
        Self::injected(&self.fail_list)?;
        Ok(self
            .todos
            .borrow()
            .iter()
            .filter(|t| query.include_archived || !t.is_archived)
            .cloned()
            .collect())
    }

    fn insert(&self, new: &NewTodo) -> Result<Todo, StoreError> {
        Self::injected(&self.fail_write)?;
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let todo = Todo {
            id: format!("new-{}", n),
            text: new.text.clone(),
            description: new.description.clone(),
            completed: new.completed,
            category: new.category.clone(),
            priority: new.priority,
            due_date: new.due_date,
            is_archived: false,
            user_id: new.user_id.clone(),
            created_at: Utc.with_ymd_and_hms(2025, 5, 14, 12, 0, 0).unwrap(),
        };
        self.todos.borrow_mut().push(todo.clone());
        Ok(todo)
    }

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<(), StoreError> {
        Self::injected(&self.fail_write)?;
        if let Some(t) = self.todos.borrow_mut().iter_mut().find(|t| t.id == id) {
            patch.apply(t);
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        Self::injected(&self.fail_write)?;
        self.todos.borrow_mut().retain(|t| t.id != id);
        Ok(())
    }
}

/// A board that lives nowhere on disk
pub fn test_board() -> Board {
    let config: BoardConfig = toml::from_str("[board]\nname = \"Test\"\n").unwrap();
    Board {
        root: PathBuf::from("/tmp/test-taskflow"),
        board_dir: PathBuf::from("/tmp/test-taskflow/.taskflow"),
        config,
    }
}

/// App over a shared in-memory store, already fetched
pub fn app_with_store(store: MemoryStore) -> App {
    let mut app = App::new(test_board(), Box::new(store), || Clock::fixed(today()));
    app.refresh();
    app
}

pub fn app_with_todos(todos: Vec<Todo>) -> App {
    app_with_store(MemoryStore::new(todos))
}

/// App over a real board and file store in a temp directory
pub fn app_on_disk() -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let board = board_io::init_board(dir.path(), "Disk", "local", false).unwrap();
    let store = open_store(&board).unwrap();
    let mut app = App::new(board, store, || Clock::fixed(today()));
    app.refresh();
    (dir, app)
}
