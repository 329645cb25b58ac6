use std::path::PathBuf;

use super::config::BoardConfig;

/// A discovered taskflow board: its location and parsed config.
/// Todos are not held here; they are fetched from the store per view.
#[derive(Debug, Clone)]
pub struct Board {
    /// Directory containing `.taskflow/`
    pub root: PathBuf,
    /// Path to the `.taskflow/` directory
    pub board_dir: PathBuf,
    /// Parsed config.toml
    pub config: BoardConfig,
}
