//! Asynchronous file import, one at a time.

use crate::error::{BoardError, Result};
use crate::store::TaskStore;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Admits at most one import at a time.
///
/// Clones share the same gate.
#[derive(Debug, Clone, Default)]
pub struct ImportGate {
    busy: Arc<AtomicBool>,
}

impl ImportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate; fails with [`BoardError::ImportInProgress`] while
    /// another ticket is alive
    pub fn begin(&self) -> Result<ImportTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BoardError::ImportInProgress)?;
        Ok(ImportTicket {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one import; releases the gate on drop
#[derive(Debug)]
pub struct ImportTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for ImportTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Read an export file and replace the board with its tasks.
///
/// The file is read without holding the store. Returns the number of
/// imported tasks.
pub async fn import_from_path(
    store: &Mutex<TaskStore>,
    gate: &ImportGate,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let path = path.as_ref();
    let _ticket = gate.begin().inspect_err(|_| {
        warn!(path = %path.display(), "import already in progress, rejecting");
    })?;

    debug!(path = %path.display(), "reading import file");
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read import file");
            store
                .lock()
                .await
                .notifications_mut()
                .error(format!("Failed to read {}", path.display()));
            return Err(e.into());
        }
    };

    store.lock().await.import_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::persistence::SlotPersistence;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    fn store() -> Mutex<TaskStore> {
        Mutex::new(TaskStore::open(SlotPersistence::new(MemoryStore::new())))
    }

    #[test]
    fn test_gate_admits_one_ticket() {
        let gate = ImportGate::new();
        let ticket = gate.begin().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(
            gate.clone().begin(),
            Err(BoardError::ImportInProgress)
        ));

        drop(ticket);
        assert!(!gate.is_busy());
        assert!(gate.begin().is_ok());
    }

    #[tokio::test]
    async fn test_import_from_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kanban-tasks-2024-03-09.json");
        tokio::fs::write(
            &path,
            r#"[{"id": "a", "title": "Imported", "columnId": "doing"}]"#,
        )
        .await
        .unwrap();

        let store = store();
        let gate = ImportGate::new();
        assert_eq!(import_from_path(&store, &gate, &path).await.unwrap(), 1);
        assert!(!gate.is_busy());

        let store = store.lock().await;
        assert_eq!(store.find_task(&"a".into()).unwrap().title, "Imported");
        let note = store.notifications().current().unwrap();
        assert_eq!(note.message, "Imported 1 tasks");
        assert_eq!(note.kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn test_second_import_rejected_while_busy() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        tokio::fs::write(&path, "[]").await.unwrap();

        let store = store();
        let gate = ImportGate::new();
        let _pending = gate.begin().unwrap();

        let err = import_from_path(&store, &gate, &path).await.unwrap_err();
        assert!(matches!(err, BoardError::ImportInProgress));
    }

    #[tokio::test]
    async fn test_missing_file_notifies() {
        let temp = TempDir::new().unwrap();
        let store = store();
        let gate = ImportGate::new();

        let err = import_from_path(&store, &gate, temp.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::Io(_)));
        assert!(!gate.is_busy());

        let store = store.lock().await;
        let note = store.notifications().current().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_invalid_file_keeps_board() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        tokio::fs::write(&path, r#"{"not": "an array"}"#).await.unwrap();

        let store = store();
        store.lock().await.add_task("todo", "Keep", None).unwrap();

        let err = import_from_path(&store, &ImportGate::new(), &path)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.lock().await.state().task_count(), 1);
    }
}
