use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Signals that the todo file changed on disk (e.g. a `tf add` from another
/// terminal) and the open view should re-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodosChanged;

/// Watches the board directory for changes to the todo file.
pub struct TodoWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<TodosChanged>,
}

impl TodoWatcher {
    /// Start watching `todo_file`. The parent directory is watched so atomic
    /// replacements (rename over the target) are seen.
    pub fn start(todo_file: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target: PathBuf = todo_file.to_path_buf();
        let dir = todo_file.parent().unwrap_or(Path::new(".")).to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::debug!(error = %e, "watch error");
                        return;
                    }
                };
                if is_relevant(&event, &target) {
                    let _ = tx.send(TodosChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(TodoWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending events; true if the todo file changed since the last poll
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

fn is_relevant(event: &Event, target: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p.file_name() == target.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn only_todo_file_events_count() {
        let target = Path::new("/b/.taskflow/todos.json");
        let hit = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/b/.taskflow/todos.json"));
        let lock = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/b/.taskflow/.lock"));
        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("/b/.taskflow/todos.json"));

        assert!(is_relevant(&hit, target));
        assert!(!is_relevant(&lock, target));
        assert!(!is_relevant(&access, target));
    }
}
