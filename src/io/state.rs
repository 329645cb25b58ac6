use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::ViewType;
use crate::ops::filter::{CategoryFilter, StatusFilter};
use crate::ops::sort::SortKey;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiState {
    #[serde(default)]
    pub view: ViewType,
    /// Theme override; `None` falls back to `[ui] dark` in config.toml
    #[serde(default)]
    pub dark: Option<bool>,
    #[serde(default)]
    pub filter: StatusFilter,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub sort: SortKey,
}

/// Read .state.json from the board directory. Missing or unreadable state
/// yields `None`.
pub fn read_ui_state(board_dir: &Path) -> Option<UiState> {
    let path = board_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed .state.json");
            None
        }
    }
}

/// Write .state.json to the board directory
pub fn write_ui_state(board_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = board_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            view: ViewType::Kanban,
            dark: Some(false),
            filter: StatusFilter::Overdue,
            category: CategoryFilter::Only("arbeit".into()),
            sort: SortKey::Priority,
        };
        write_ui_state(dir.path(), &state).unwrap();
        assert_eq!(read_ui_state(dir.path()), Some(state));
    }

    #[test]
    fn missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn partial_state_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), r#"{"view":"stats"}"#).unwrap();
        let state = read_ui_state(dir.path()).unwrap();
        assert_eq!(state.view, ViewType::Stats);
        assert_eq!(state.filter, StatusFilter::All);
        assert_eq!(state.category, CategoryFilter::All);
        assert_eq!(state.dark, None);
    }

    #[test]
    fn malformed_file_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "{not json").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }
}
