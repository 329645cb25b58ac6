use std::path::PathBuf;
use std::time::Duration;

use crate::io::file_store::FileStore;
use crate::io::lock::LockError;
use crate::io::rest_store::RestStore;
use crate::model::config::StoreBackend;
use crate::model::{Board, NewTodo, Todo, TodoPatch, ViewType};

/// Error type for todo store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed todo data: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned no row for the inserted todo")]
    EmptyResponse,
    #[error("store not configured: {0}")]
    NotConfigured(&'static str),
}

/// What to fetch. Results are always newest first by `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub include_archived: bool,
}

impl ListQuery {
    /// The query a view fetches with: stats sees archived todos too
    pub fn for_view(view: ViewType) -> Self {
        ListQuery {
            include_archived: view.includes_archived(),
        }
    }
}

/// Backend holding the todo collection.
///
/// Updates and deletes of an id the store does not hold succeed without
/// effect.
pub trait TodoStore {
    fn list(&self, query: ListQuery) -> Result<Vec<Todo>, StoreError>;
    fn insert(&self, todo: &NewTodo) -> Result<Todo, StoreError>;
    fn update(&self, id: &str, patch: &TodoPatch) -> Result<(), StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Open the store configured for `board`. Credentials for the REST backend
/// may come from TASKFLOW_API_KEY / TASKFLOW_ACCESS_TOKEN.
pub fn open_store(board: &Board) -> Result<Box<dyn TodoStore>, StoreError> {
    let store = &board.config.store;
    match store.backend {
        StoreBackend::File => Ok(Box::new(FileStore::new(
            &board.board_dir,
            &board.board_dir.join(&store.file),
        ))),
        StoreBackend::Rest => {
            let url = store
                .url
                .as_deref()
                .ok_or(StoreError::NotConfigured("[store] url is required for the rest backend"))?;
            let api_key = std::env::var("TASKFLOW_API_KEY")
                .ok()
                .or_else(|| store.api_key.clone())
                .ok_or(StoreError::NotConfigured(
                    "set [store] api_key or TASKFLOW_API_KEY",
                ))?;
            let access_token = std::env::var("TASKFLOW_ACCESS_TOKEN")
                .ok()
                .or_else(|| store.access_token.clone());
            let rest = RestStore::new(
                url,
                &store.table,
                &api_key,
                access_token.as_deref(),
                Duration::from_secs(store.timeout_secs),
            )?;
            Ok(Box::new(rest))
        }
    }
}
