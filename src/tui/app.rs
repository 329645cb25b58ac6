use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Days, Months, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::board_io::{discover_board, load_board};
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{ListQuery, StoreError, TodoStore, open_store};
use crate::io::watcher::TodoWatcher;
use crate::logging;
use crate::model::{Board, NewTodo, Priority, StoreBackend, Todo, TodoPatch, ViewType};
use crate::ops::clock::Clock;
use crate::ops::commands::{CommandAction, PaletteState};
use crate::ops::filter::{self, CategoryFilter, KanbanBoard, KanbanColumn, StatusFilter};
use crate::ops::sort::{self, SortKey};
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// Result of the last fetch for the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The fetch failed; the previously loaded todos are kept
    Failed(String),
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Command palette open
    Command,
    /// Single-line text input (new todo or rename)
    Edit,
    /// Waiting for y/n on a delete
    Confirm,
}

/// What the edit buffer will be used for on Enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    NewTodo { due: Option<NaiveDate> },
    Text { id: String },
}

/// List view cursor and the filter/sort controls
#[derive(Debug, Clone, Default)]
pub struct ListViewState {
    pub cursor: usize,
    pub filter: StatusFilter,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

/// Kanban focus: which column, and a cursor per column
#[derive(Debug, Clone)]
pub struct KanbanViewState {
    pub column: KanbanColumn,
    pub open_cursor: usize,
    pub done_cursor: usize,
}

impl Default for KanbanViewState {
    fn default() -> Self {
        KanbanViewState {
            column: KanbanColumn::Open,
            open_cursor: 0,
            done_cursor: 0,
        }
    }
}

impl KanbanViewState {
    pub fn cursor(&self, column: KanbanColumn) -> usize {
        match column {
            KanbanColumn::Open => self.open_cursor,
            KanbanColumn::Done => self.done_cursor,
        }
    }

    fn cursor_mut(&mut self, column: KanbanColumn) -> &mut usize {
        match column {
            KanbanColumn::Open => &mut self.open_cursor,
            KanbanColumn::Done => &mut self.done_cursor,
        }
    }
}

/// Calendar focus: the selected day, and a cursor into that day's todos.
/// The displayed month is the selected day's month.
#[derive(Debug, Clone)]
pub struct CalendarViewState {
    pub selected: NaiveDate,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Where the app reads "now" from; re-read on every tick
pub type ClockSource = Box<dyn Fn() -> Clock>;

/// Main application state
pub struct App {
    pub board: Board,
    store: Box<dyn TodoStore>,
    clock_source: ClockSource,
    /// Clock as of the last tick
    pub clock: Clock,
    pub view: ViewType,
    pub dark: bool,
    pub theme: Theme,
    /// Todos as last fetched for the current view
    pub todos: Vec<Todo>,
    pub load_state: LoadState,
    pub mode: Mode,
    pub list: ListViewState,
    pub kanban: KanbanViewState,
    pub calendar: CalendarViewState,
    pub palette: Option<PaletteState>,
    pub edit_buffer: String,
    pub edit_target: Option<EditTarget>,
    /// Id of the todo awaiting delete confirmation
    pub pending_delete: Option<String>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl App {
    /// Build the app without fetching; call `refresh` to load.
    pub fn new(
        board: Board,
        store: Box<dyn TodoStore>,
        clock_source: impl Fn() -> Clock + 'static,
    ) -> Self {
        let dark = board.config.ui.dark;
        let theme = Theme::from_config(&board.config.ui, dark);
        let clock = clock_source();
        App {
            board,
            store,
            clock_source: Box::new(clock_source),
            clock,
            view: ViewType::default(),
            dark,
            theme,
            todos: Vec::new(),
            load_state: LoadState::Loading,
            mode: Mode::Navigate,
            list: ListViewState::default(),
            kanban: KanbanViewState::default(),
            calendar: CalendarViewState {
                selected: clock.today,
                cursor: 0,
            },
            palette: None,
            edit_buffer: String::new(),
            edit_target: None,
            pending_delete: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.board.config.todos.categories
    }

    // -----------------------------------------------------------------------
    // Fetching and view switching
    // -----------------------------------------------------------------------

    /// Re-read the clock. When the date rolls over, a calendar still on the
    /// old today follows to the new one.
    pub fn tick(&mut self) {
        let now = (self.clock_source)();
        if now.today != self.clock.today {
            tracing::debug!(from = %self.clock.today, to = %now.today, "date changed");
            if self.calendar.selected == self.clock.today {
                self.calendar.selected = now.today;
                self.calendar.cursor = 0;
            }
            self.clock = now;
            self.clamp_cursors();
        } else {
            self.clock = now;
        }
    }

    /// Fetch the collection with the current view's query
    pub fn refresh(&mut self) {
        self.tick();
        let query = ListQuery::for_view(self.view);
        match self.store.list(query) {
            Ok(todos) => {
                tracing::debug!(view = %self.view, count = todos.len(), "fetched todos");
                self.todos = todos;
                self.load_state = LoadState::Ready;
                self.clamp_cursors();
            }
            Err(e) => {
                tracing::warn!(view = %self.view, error = %e, "failed to load todos");
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Switch to `view` and re-fetch with its query
    pub fn switch_view(&mut self, view: ViewType) {
        self.view = view;
        self.refresh();
    }

    pub fn cycle_view(&mut self, forward: bool) {
        let idx = ViewType::ALL.iter().position(|v| *v == self.view).unwrap_or(0);
        let len = ViewType::ALL.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.switch_view(ViewType::ALL[next]);
    }

    pub fn toggle_theme(&mut self) {
        self.dark = !self.dark;
        self.theme = Theme::from_config(&self.board.config.ui, self.dark);
    }

    pub fn run_action(&mut self, action: CommandAction) {
        match action {
            CommandAction::SwitchView(view) => self.switch_view(view),
            CommandAction::ToggleTheme => self.toggle_theme(),
        }
    }

    pub fn open_palette(&mut self) {
        self.palette = Some(PaletteState::default());
        self.mode = Mode::Command;
    }

    pub fn close_palette(&mut self) {
        self.palette = None;
        self.mode = Mode::Navigate;
    }

    /// Run the selected palette command, if any, and close the palette
    pub fn run_palette_selection(&mut self) {
        let action = self
            .palette
            .as_ref()
            .and_then(|p| p.selected())
            .map(|c| c.action);
        self.close_palette();
        if let Some(action) = action {
            self.run_action(action);
        }
    }

    // -----------------------------------------------------------------------
    // Derived view data
    // -----------------------------------------------------------------------

    /// List view rows: filtered, then sorted
    pub fn visible_todos(&self) -> Vec<&Todo> {
        let filtered = filter::filter(
            &self.todos,
            self.list.filter,
            &self.list.category,
            self.clock.today,
        );
        sort::sort(&filtered, self.list.sort)
    }

    pub fn kanban_board(&self) -> KanbanBoard<'_> {
        filter::partition_kanban(&self.todos)
    }

    /// Todos due on the selected calendar day
    pub fn day_todos(&self) -> Vec<&Todo> {
        filter::todos_on_day(&self.todos, self.calendar.selected)
    }

    /// The todo under the cursor in the current view
    pub fn selected_todo(&self) -> Option<&Todo> {
        match self.view {
            ViewType::List => self.visible_todos().get(self.list.cursor).copied(),
            ViewType::Kanban => {
                let col = self.kanban.column;
                self.kanban_board()
                    .column(col)
                    .get(self.kanban.cursor(col))
                    .copied()
            }
            ViewType::Calendar => self.day_todos().get(self.calendar.cursor).copied(),
            ViewType::Stats => None,
        }
    }

    // -----------------------------------------------------------------------
    // Cursor movement
    // -----------------------------------------------------------------------

    fn current_len(&self) -> usize {
        match self.view {
            ViewType::List => self.visible_todos().len(),
            ViewType::Kanban => self.kanban_board().column(self.kanban.column).len(),
            ViewType::Calendar => self.day_todos().len(),
            ViewType::Stats => 0,
        }
    }

    fn cursor_mut(&mut self) -> Option<&mut usize> {
        match self.view {
            ViewType::List => Some(&mut self.list.cursor),
            ViewType::Kanban => Some(self.kanban.cursor_mut(self.kanban.column)),
            ViewType::Calendar => Some(&mut self.calendar.cursor),
            ViewType::Stats => None,
        }
    }

    /// Move the current view's cursor by `delta`, clamped to the rows shown
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.current_len();
        if let Some(cursor) = self.cursor_mut() {
            let max = len.saturating_sub(1);
            *cursor = cursor.saturating_add_signed(delta).min(max);
        }
    }

    pub fn cursor_to_end(&mut self, end: bool) {
        let len = self.current_len();
        if let Some(cursor) = self.cursor_mut() {
            *cursor = if end { len.saturating_sub(1) } else { 0 };
        }
    }

    fn clamp_cursors(&mut self) {
        let list_len = self.visible_todos().len();
        self.list.cursor = self.list.cursor.min(list_len.saturating_sub(1));
        let (open, done) = {
            let board = self.kanban_board();
            (board.open.len(), board.done.len())
        };
        self.kanban.open_cursor = self.kanban.open_cursor.min(open.saturating_sub(1));
        self.kanban.done_cursor = self.kanban.done_cursor.min(done.saturating_sub(1));
        let day_len = self.day_todos().len();
        self.calendar.cursor = self.calendar.cursor.min(day_len.saturating_sub(1));
    }

    pub fn focus_column(&mut self, column: KanbanColumn) {
        self.kanban.column = column;
    }

    /// Move the selected calendar day by `days` (negative = back)
    pub fn move_day(&mut self, days: i64) {
        let step = Days::new(days.unsigned_abs());
        let moved = if days < 0 {
            self.calendar.selected.checked_sub_days(step)
        } else {
            self.calendar.selected.checked_add_days(step)
        };
        if let Some(date) = moved {
            self.calendar.selected = date;
            self.calendar.cursor = 0;
        }
    }

    /// Move the selected day one month back or forward, clamping the day
    /// of month (Jan 31 -> Feb 28)
    pub fn shift_month(&mut self, forward: bool) {
        let months = Months::new(1);
        let moved = if forward {
            self.calendar.selected.checked_add_months(months)
        } else {
            self.calendar.selected.checked_sub_months(months)
        };
        if let Some(date) = moved {
            self.calendar.selected = date;
            self.calendar.cursor = 0;
        }
    }

    pub fn select_today(&mut self) {
        self.calendar.selected = self.clock.today;
        self.calendar.cursor = 0;
    }

    /// Year and month shown by the calendar
    pub fn calendar_month(&self) -> (i32, u32) {
        (self.calendar.selected.year(), self.calendar.selected.month())
    }

    // -----------------------------------------------------------------------
    // List controls
    // -----------------------------------------------------------------------

    pub fn cycle_filter(&mut self) {
        self.list.filter = self.list.filter.next();
        self.reset_list_cursor();
    }

    pub fn cycle_category(&mut self) {
        self.list.category = self.list.category.next(&self.board.config.todos.categories);
        self.reset_list_cursor();
    }

    pub fn cycle_sort(&mut self) {
        self.list.sort = self.list.sort.next();
        self.reset_list_cursor();
    }

    fn reset_list_cursor(&mut self) {
        self.list.cursor = 0;
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Report the outcome of a store call, then re-fetch regardless
    fn after_mutation(&mut self, what: &str, result: Result<(), StoreError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "{} failed", what);
            self.set_error(format!("{} failed: {}", what, e));
        }
        self.refresh();
    }

    pub fn set_error(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    /// Flip completion of the selected todo
    pub fn toggle_selected(&mut self) {
        let Some(todo) = self.selected_todo() else {
            return;
        };
        let id = todo.id.clone();
        let patch = TodoPatch::completed(!todo.completed);
        let result = self.store.update(&id, &patch);
        self.after_mutation("toggle", result);
    }

    /// Kanban: drop the focused card into `target`, setting its completion
    /// to match. Focus follows the card.
    pub fn move_card(&mut self, target: KanbanColumn) {
        if self.view != ViewType::Kanban || self.kanban.column == target {
            return;
        }
        let Some(todo) = self.selected_todo() else {
            return;
        };
        let id = todo.id.clone();
        let result = self.store.update(&id, &TodoPatch::completed(target.completed()));
        let moved = result.is_ok();
        self.after_mutation("move", result);
        if moved {
            self.kanban.column = target;
            let pos = self
                .kanban_board()
                .column(target)
                .iter()
                .position(|t| t.id == id);
            if let Some(pos) = pos {
                *self.kanban.cursor_mut(target) = pos;
            }
        }
    }

    /// Enter edit mode for a new todo. In the calendar the new todo is due
    /// on the selected day.
    pub fn begin_add(&mut self) {
        let due = (self.view == ViewType::Calendar).then_some(self.calendar.selected);
        self.edit_target = Some(EditTarget::NewTodo { due });
        self.edit_buffer.clear();
        self.mode = Mode::Edit;
    }

    /// Enter edit mode on the selected todo's text
    pub fn begin_edit(&mut self) {
        let Some((id, text)) = self.selected_todo().map(|t| (t.id.clone(), t.text.clone())) else {
            return;
        };
        self.edit_buffer = text;
        self.edit_target = Some(EditTarget::Text { id });
        self.mode = Mode::Edit;
    }

    pub fn edit_push(&mut self, c: char) {
        self.edit_buffer.push(c);
    }

    pub fn edit_pop(&mut self) {
        unicode::pop_grapheme(&mut self.edit_buffer);
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.edit_buffer.clear();
        self.mode = Mode::Navigate;
    }

    /// Commit the edit buffer. Blank text is rejected with a status message.
    pub fn submit_edit(&mut self) {
        let target = self.edit_target.take();
        let text = std::mem::take(&mut self.edit_buffer);
        self.mode = Mode::Navigate;
        match target {
            Some(EditTarget::NewTodo { due }) => {
                let category = match &self.list.category {
                    CategoryFilter::Only(c) => c.clone(),
                    CategoryFilter::All => self.board.config.todos.default_category.clone(),
                };
                let new = match NewTodo::new(
                    &text,
                    None,
                    &category,
                    Priority::Medium,
                    due,
                    &self.board.config.board.user_id,
                ) {
                    Ok(new) => new,
                    Err(e) => return self.set_error(e.to_string()),
                };
                let result = self.store.insert(&new).map(|_| ());
                self.after_mutation("add", result);
            }
            Some(EditTarget::Text { id }) => {
                let patch = match TodoPatch::text(&text) {
                    Ok(p) => p,
                    Err(e) => return self.set_error(e.to_string()),
                };
                let result = self.store.update(&id, &patch);
                self.after_mutation("edit", result);
            }
            None => {}
        }
    }

    /// Ask for confirmation before deleting the selected todo
    pub fn begin_delete(&mut self) {
        let Some(todo) = self.selected_todo() else {
            return;
        };
        self.pending_delete = Some(todo.id.clone());
        self.mode = Mode::Confirm;
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Navigate;
        if let Some(id) = self.pending_delete.take() {
            let result = self.store.delete(&id);
            self.after_mutation("delete", result);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }

    /// Text of the todo awaiting delete confirmation
    pub fn pending_delete_text(&self) -> Option<&str> {
        let id = self.pending_delete.as_deref()?;
        self.todos
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.text.as_str())
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(state) = read_ui_state(&app.board.board_dir) else {
        return;
    };
    app.view = state.view;
    if let Some(dark) = state.dark
        && dark != app.dark
    {
        app.toggle_theme();
    }
    app.list.filter = state.filter;
    app.list.category = state.category;
    app.list.sort = state.sort;
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    let state = UiState {
        view: app.view,
        dark: (app.dark != app.board.config.ui.dark).then_some(app.dark),
        filter: app.list.filter,
        category: app.list.category.clone(),
        sort: app.list.sort,
    };
    if let Err(e) = write_ui_state(&app.board.board_dir, &state) {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match board_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let root = discover_board(&start)?;
    let board = load_board(&root)?;
    logging::init_file(&board.board_dir.join("taskflow.log"));

    let store = open_store(&board)?;
    let watcher = match board.config.store.backend {
        StoreBackend::File => {
            let path = board.board_dir.join(&board.config.store.file);
            TodoWatcher::start(&path)
                .inspect_err(|e| tracing::warn!(error = %e, "not watching todo file"))
                .ok()
        }
        StoreBackend::Rest => None,
    };

    let mut app = App::new(board, store, Clock::local);
    restore_ui_state(&mut app);
    app.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&TodoWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if let Some(w) = watcher
            && w.poll()
        {
            tracing::debug!("todo file changed on disk");
            app.refresh();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
