//! Kanban task board engine with key-value persistence
//!
//! A board has four fixed columns (`backlog`, `todo`, `doing`, `done`), each
//! owning an ordered list of tasks. All changes go through [`TaskStore`],
//! which validates input, saves the board after every successful mutation
//! and reports outcomes through a single-slot [`NotificationChannel`].
//!
//! ## Overview
//!
//! - **Store** - add, update, delete, move, reorder and complete tasks
//! - **Reorder engine** - drag gestures and keyboard steps become store moves
//! - **Persistence** - the board lives in the `kanbanTasks` slot of a key-value store
//! - **Snapshots** - export to a dated JSON file, import with whole-file validation
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use taskboard::{FileStore, SlotPersistence, TaskStore};
//!
//! # fn example() -> taskboard::Result<()> {
//! let mut store = TaskStore::open(SlotPersistence::new(FileStore::new("/tmp/board")));
//!
//! let task = store.add_task("todo", "Write release notes", None)?;
//! store.move_task(&task.id, &"doing".into());
//! store.toggle_complete(&task.id);
//!
//! for group in store.tasks_grouped_by_column() {
//!     println!("{}: {}", group.column.title, group.tasks.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! data_dir/
//! ├── taskboard.toml      # Optional configuration
//! ├── kanbanTasks.json    # Board state, grouped by column
//! ├── darkMode.json       # Theme preference
//! └── .lock               # Advisory write lock
//! ```

pub mod config;
mod error;
pub mod import;
pub mod notification;
pub mod persistence;
pub mod reorder;
pub mod sanitize;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

pub use config::BoardConfig;
pub use error::{BoardError, Result, ValidationError};
pub use import::{import_from_path, ImportGate, ImportTicket};
pub use notification::{Notification, NotificationChannel, NotificationKind};
pub use persistence::{Preferences, SlotPersistence, StatePersistence};
pub use reorder::{Direction, DragSession, DropTarget, KeyboardReorder};
pub use sanitize::{sanitize_title, MAX_TASK_TITLE_LENGTH};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{CompletionPolicy, TaskStore};
pub use types::{BoardState, Column, ColumnId, Priority, Task, TaskId, TaskPatch};
pub use view::{ColumnGroup, TaskFilter};
