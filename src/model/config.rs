use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardInfo,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub todos: TodosConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub name: String,
    /// Principal recorded on new todos
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

/// Which store backend holds the todos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Todo file for the file backend, relative to the board directory
    #[serde(default = "default_store_file")]
    pub file: String,
    /// Base URL of the REST backend (e.g. `https://xyz.supabase.co`)
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    /// Overridden by TASKFLOW_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overridden by TASKFLOW_ACCESS_TOKEN
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::File,
            file: default_store_file(),
            url: None,
            table: default_table(),
            api_key: None,
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodosConfig {
    /// Category labels offered for new todos and reported by stats
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl Default for TodosConfig {
    fn default() -> Self {
        TodosConfig {
            categories: default_categories(),
            default_category: default_category(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Start in dark mode (the theme can be toggled at runtime)
    #[serde(default = "default_true")]
    pub dark: bool,
    /// Hex color overrides, keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            dark: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_store_file() -> String {
    "todos.json".to_string()
}

fn default_table() -> String {
    "todos".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

pub fn default_categories() -> Vec<String> {
    ["arbeit", "privat", "wichtig", "ideen"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_category() -> String {
    "privat".to_string()
}
