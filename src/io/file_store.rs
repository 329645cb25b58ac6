use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::io::lock::WriteLock;
use crate::io::store::{ListQuery, StoreError, TodoStore};
use crate::model::{NewTodo, Todo, TodoPatch};

/// Todo store backed by a JSON array on disk.
///
/// Every mutation holds the board lock across read-modify-write and replaces
/// the file atomically.
#[derive(Debug, Clone)]
pub struct FileStore {
    board_dir: PathBuf,
    path: PathBuf,
}

impl FileStore {
    pub fn new(board_dir: &Path, path: &Path) -> Self {
        FileStore {
            board_dir: board_dir.to_path_buf(),
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read every stored todo. A missing file is an empty collection.
    fn load(&self) -> Result<Vec<Todo>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, todos: &[Todo]) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(todos)?;
        content.push('\n');
        atomic_write(&self.path, content.as_bytes()).map_err(|e| self.io_err(e))
    }

    /// Run `f` over the stored collection under the board lock, saving if it
    /// reports a change.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Vec<Todo>) -> (bool, T),
    ) -> Result<T, StoreError> {
        let _lock = WriteLock::for_board(&self.board_dir)?;
        let mut todos = self.load()?;
        let (changed, out) = f(&mut todos);
        if changed {
            self.save(&todos)?;
        }
        Ok(out)
    }
}

impl TodoStore for FileStore {
    fn list(&self, query: ListQuery) -> Result<Vec<Todo>, StoreError> {
        let mut todos = self.load()?;
        if !query.include_archived {
            todos.retain(|t| !t.is_archived);
        }
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!(count = todos.len(), ?query, "listed todos");
        Ok(todos)
    }

    fn insert(&self, new: &NewTodo) -> Result<Todo, StoreError> {
        let todo = Todo {
            id: uuid::Uuid::new_v4().to_string(),
            text: new.text.clone(),
            description: new.description.clone(),
            completed: new.completed,
            category: new.category.clone(),
            priority: new.priority,
            due_date: new.due_date,
            is_archived: false,
            user_id: new.user_id.clone(),
            created_at: Utc::now(),
        };
        let created = todo.clone();
        self.mutate(move |todos| {
            todos.push(todo);
            (true, ())
        })?;
        tracing::info!(id = %created.id, "inserted todo");
        Ok(created)
    }

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<(), StoreError> {
        let found = self.mutate(|todos| match todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                patch.apply(todo);
                (true, true)
            }
            None => (false, false),
        })?;
        if found {
            tracing::info!(id, "updated todo");
        } else {
            tracing::debug!(id, "update of unknown id ignored");
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let removed = self.mutate(|todos| {
            let before = todos.len();
            todos.retain(|t| t.id != id);
            let removed = todos.len() != before;
            (removed, removed)
        })?;
        if removed {
            tracing::info!(id, "deleted todo");
        } else {
            tracing::debug!(id, "delete of unknown id ignored");
        }
        Ok(())
    }
}

/// Write a file atomically: write to a temp file in the same directory, then
/// rename over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> FileStore {
        FileStore::new(tmp.path(), &tmp.path().join("todos.json"))
    }

    fn new_todo(text: &str) -> NewTodo {
        NewTodo::new(text, None, "privat", Priority::Medium, None, "u1").unwrap()
    }

    #[test]
    fn missing_file_lists_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(store(&tmp).list(ListQuery::default()).unwrap().is_empty());
    }

    #[test]
    fn insert_assigns_id_and_timestamp() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        let created = s.insert(&new_todo("Buy milk")).unwrap();
        assert_eq!(created.id.len(), 36);
        assert!(!created.completed);
        assert!(!created.is_archived);

        let listed = s.list(ListQuery::default()).unwrap();
        assert_eq!(listed, vec![created]);
        // the lock is free again once the write is done
        assert!(crate::io::lock::WriteLock::for_board(tmp.path()).is_ok());
    }

    #[test]
    fn list_is_newest_first() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        let first = s.insert(&new_todo("first")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = s.insert(&new_todo("second")).unwrap();
        let ids: Vec<String> = s
            .list(ListQuery::default())
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn update_applies_patch() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        let created = s.insert(&new_todo("draft")).unwrap();
        let due = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let patch = TodoPatch {
            completed: Some(true),
            priority: Some(Priority::High),
            due_date: Some(Some(due)),
            ..Default::default()
        };
        s.update(&created.id, &patch).unwrap();

        let todo = &s.list(ListQuery::default()).unwrap()[0];
        assert!(todo.completed);
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.due_date, Some(due));
        assert_eq!(todo.text, "draft");
    }

    #[test]
    fn unknown_id_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        s.insert(&new_todo("keep")).unwrap();
        s.update("missing", &TodoPatch::completed(true)).unwrap();
        s.delete("missing").unwrap();
        let todos = s.list(ListQuery::default()).unwrap();
        assert_eq!(todos.len(), 1);
        assert!(!todos[0].completed);
    }

    #[test]
    fn delete_removes_todo() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        let a = s.insert(&new_todo("a")).unwrap();
        let b = s.insert(&new_todo("b")).unwrap();
        s.delete(&a.id).unwrap();
        let ids: Vec<String> = s
            .list(ListQuery::default())
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![b.id]);
    }

    #[test]
    fn archived_only_with_include_archived() {
        let tmp = TempDir::new().unwrap();
        let json = r#"[
  {"id":"a","text":"old","category":"privat","is_archived":true,"created_at":"2025-01-01T00:00:00Z"},
  {"id":"b","text":"new","category":"privat","created_at":"2025-01-02T00:00:00Z"}
]"#;
        fs::write(tmp.path().join("todos.json"), json).unwrap();
        let s = store(&tmp);
        assert_eq!(s.list(ListQuery::default()).unwrap().len(), 1);
        let all = s
            .list(ListQuery {
                include_archived: true,
            })
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "b");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("todos.json"), "{oops").unwrap();
        assert!(matches!(
            store(&tmp).list(ListQuery::default()),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }
}
