use serde::Serialize;

use crate::model::ViewType;

/// What a palette command does when executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum CommandAction {
    SwitchView(ViewType),
    ToggleTheme,
}

/// An entry in the command palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub id: &'static str,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    /// Display hint only, e.g. "1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<&'static str>,
    pub action: CommandAction,
}

/// The fixed command table, in display order
pub fn default_commands() -> Vec<Command> {
    vec![
        Command {
            id: "list",
            label: "List view",
            keywords: &["list", "liste", "aufgaben", "tasks"],
            shortcut: Some("1"),
            action: CommandAction::SwitchView(ViewType::List),
        },
        Command {
            id: "kanban",
            label: "Kanban board",
            keywords: &["kanban", "board", "spalten", "columns"],
            shortcut: Some("2"),
            action: CommandAction::SwitchView(ViewType::Kanban),
        },
        Command {
            id: "calendar",
            label: "Calendar",
            keywords: &["kalender", "calendar", "datum", "termin"],
            shortcut: Some("3"),
            action: CommandAction::SwitchView(ViewType::Calendar),
        },
        Command {
            id: "stats",
            label: "Statistics",
            keywords: &["stats", "statistik", "charts", "analyse"],
            shortcut: Some("4"),
            action: CommandAction::SwitchView(ViewType::Stats),
        },
        Command {
            id: "dark",
            label: "Toggle dark mode",
            keywords: &["dark", "dunkel", "theme", "modus"],
            shortcut: None,
            action: CommandAction::ToggleTheme,
        },
    ]
}

impl Command {
    /// Case-insensitive substring match against the label or any keyword.
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(needle))
    }
}

/// Commands matching `query`, in table order. An empty query matches everything.
pub fn resolve<'a>(query: &str, table: &'a [Command]) -> Vec<&'a Command> {
    let needle = query.to_lowercase();
    table.iter().filter(|c| c.matches(&needle)).collect()
}

/// Palette query plus the highlighted row within the current matches
#[derive(Debug, Clone)]
pub struct PaletteState {
    table: Vec<Command>,
    query: String,
    selected: usize,
}

impl Default for PaletteState {
    fn default() -> Self {
        PaletteState::new(default_commands())
    }
}

impl PaletteState {
    pub fn new(table: Vec<Command>) -> Self {
        PaletteState {
            table,
            query: String::new(),
            selected: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    pub fn matches(&self) -> Vec<&Command> {
        resolve(&self.query, &self.table)
    }

    /// Replace the query; the selection returns to the first match
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.selected = 0;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    /// Move down, wrapping to the top. No-op with no matches.
    pub fn select_next(&mut self) {
        let n = self.matches().len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
    }

    /// Move up, wrapping to the bottom. No-op with no matches.
    pub fn select_prev(&mut self) {
        let n = self.matches().len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    /// The highlighted command, if any
    pub fn selected(&self) -> Option<&Command> {
        self.matches().get(self.selected).copied()
    }

    /// Clear the query and selection
    pub fn reset(&mut self) {
        self.set_query("");
    }
}
