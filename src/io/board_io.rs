use std::fs;
use std::path::{Path, PathBuf};

use crate::model::board::Board;
use crate::model::config::BoardConfig;

/// Name of the per-board directory
pub const BOARD_DIR: &str = ".taskflow";

/// Error type for board discovery and config I/O
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a taskflow board: no .taskflow/ directory found (run `tf init`)")]
    NotABoard,
    #[error("board already initialized at {0} (use --force to overwrite)")]
    AlreadyInitialized(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
    #[error("could not edit config.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a directory containing
/// `.taskflow/config.toml`. Returns that directory.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join(BOARD_DIR);
        if board_dir.is_dir() && board_dir.join("config.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Load the board rooted at `root`
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    let board_dir = root.join(BOARD_DIR);
    if !board_dir.is_dir() {
        return Err(BoardError::NotABoard);
    }

    let config_path = board_dir.join("config.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;

    Ok(Board {
        root: root.to_path_buf(),
        board_dir,
        config,
    })
}

const CONFIG_TEMPLATE: &str = r##"[board]
name = {name}
# recorded as user_id on new todos
user_id = {user}

[store]
backend = "file"          # "file" or "rest"
file = "todos.json"

# --- REST backend ---
# A PostgREST endpoint such as a Supabase project. Credentials can also come
# from TASKFLOW_API_KEY and TASKFLOW_ACCESS_TOKEN.
#
# backend = "rest"
# url = "https://example.supabase.co"
# table = "todos"
# api_key = ""
# access_token = ""
# timeout_secs = 10

[todos]
categories = ["arbeit", "privat", "wichtig", "ideen"]
default_category = "privat"

[ui]
dark = true

# [ui.colors]
# background = "#0F172A"
# text = "#CBD5E1"
# highlight = "#6366F1"
# red = "#EF4444"
# yellow = "#F59E0B"
# green = "#22C55E"
"##;

/// Render config.toml for a new board
pub fn render_config(name: &str, user_id: &str) -> String {
    CONFIG_TEMPLATE
        .replace("{name}", &toml_string(name))
        .replace("{user}", &toml_string(user_id))
}

/// Quote a value as a TOML basic string
fn toml_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Create `.taskflow/` under `root` with a fresh config and an empty todo file.
/// Refuses to overwrite an existing board unless `force` is set.
pub fn init_board(root: &Path, name: &str, user_id: &str, force: bool) -> Result<Board, BoardError> {
    let board_dir = root.join(BOARD_DIR);
    let config_path = board_dir.join("config.toml");
    if config_path.exists() && !force {
        return Err(BoardError::AlreadyInitialized(root.to_path_buf()));
    }

    fs::create_dir_all(&board_dir)?;
    fs::write(&config_path, render_config(name, user_id))?;

    let board = load_board(root)?;
    let todo_path = board_dir.join(&board.config.store.file);
    if !todo_path.exists() || force {
        fs::write(&todo_path, "[]\n")?;
    }
    tracing::info!(root = %root.display(), name, "initialized board");
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_then_discover_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        init_board(tmp.path(), "home", "u1", false).unwrap();

        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let root = discover_board(&nested).unwrap();
        assert_eq!(root, tmp.path());

        let board = load_board(&root).unwrap();
        assert_eq!(board.config.board.name, "home");
        assert_eq!(board.config.board.user_id, "u1");
        assert_eq!(
            fs::read_to_string(board.board_dir.join("todos.json")).unwrap(),
            "[]\n"
        );
    }

    #[test]
    fn discover_fails_outside_a_board() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_board(tmp.path()),
            Err(BoardError::NotABoard)
        ));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        init_board(tmp.path(), "home", "u1", false).unwrap();
        let err = init_board(tmp.path(), "other", "u2", false).unwrap_err();
        assert!(matches!(err, BoardError::AlreadyInitialized(_)));

        let board = init_board(tmp.path(), "other", "u2", true).unwrap();
        assert_eq!(board.config.board.name, "other");
    }

    #[test]
    fn names_are_quoted() {
        let tmp = TempDir::new().unwrap();
        let board = init_board(tmp.path(), "Ana's \"home\" board", "u\\1", false).unwrap();
        assert_eq!(board.config.board.name, "Ana's \"home\" board");
        assert_eq!(board.config.board.user_id, "u\\1");
    }

    #[test]
    fn bad_config_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(BOARD_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[board\n").unwrap();
        assert!(matches!(
            load_board(tmp.path()),
            Err(BoardError::ConfigParseError(_))
        ));
    }
}
