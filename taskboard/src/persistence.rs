//! Board state persistence over key-value slots.
//!
//! ## Slot layout
//!
//! ```text
//! kanbanTasks   {"version": 1, "columns": {"backlog": [Task, ...], "todo": [...], ...}}
//! darkMode      true
//! ```
//!
//! Older boards stored `kanbanTasks` as a flat JSON array of tasks, each
//! carrying its own `columnId`. That shape is still accepted on load and is
//! rewritten in the versioned form on the next save.

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::{BoardState, ColumnId, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Slot holding the board state
pub const TASKS_KEY: &str = "kanbanTasks";

/// Slot holding the dark mode preference
pub const DARK_MODE_KEY: &str = "darkMode";

/// Current encoding version of the board slot
pub const STATE_VERSION: u32 = 1;

/// Port the store saves through after every mutation
pub trait StatePersistence: Send + Sync {
    /// Load the saved board; `None` when nothing was saved yet
    fn load(&self) -> Result<Option<BoardState>>;

    /// Save the full board
    fn save(&self, state: &BoardState) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedBoard {
    version: u32,
    columns: BTreeMap<ColumnId, Vec<Task>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredBoard {
    Versioned(PersistedBoard),
    Flat(Vec<Task>),
}

/// Encode a board as the versioned column mapping
pub fn encode_state(state: &BoardState) -> Result<String> {
    let columns = state
        .lanes()
        .iter()
        .map(|lane| (lane.column.id.clone(), lane.tasks.as_slice().to_vec()))
        .collect();
    let persisted = PersistedBoard {
        version: STATE_VERSION,
        columns,
    };
    Ok(serde_json::to_string(&persisted)?)
}

/// Decode a board from either the versioned mapping or a flat task array
pub fn decode_state(raw: &str) -> Result<BoardState> {
    let stored: StoredBoard = serde_json::from_str(raw)?;

    let tasks: Vec<Task> = match stored {
        StoredBoard::Versioned(persisted) => {
            if persisted.version > STATE_VERSION {
                warn!(
                    version = persisted.version,
                    "board saved by a newer version, reading what is understood"
                );
            }
            let mut columns = persisted.columns;
            // Lanes own their tasks; the column id on each task follows the lane
            let mut ordered = Vec::new();
            for column in BoardState::new().columns() {
                if let Some(tasks) = columns.remove(&column.id) {
                    ordered.extend(tasks.into_iter().map(|mut t| {
                        t.column_id = column.id.clone();
                        t
                    }));
                }
            }
            for (column, tasks) in columns {
                warn!(%column, count = tasks.len(), "dropping tasks in unknown column");
            }
            ordered
        }
        StoredBoard::Flat(tasks) => tasks,
    };

    let mut seen: HashSet<TaskId> = HashSet::new();
    let unique = tasks.into_iter().filter(|t| {
        let fresh = seen.insert(t.id.clone());
        if !fresh {
            warn!(id = %t.id, "dropping duplicate task id");
        }
        fresh
    });

    let (state, rejected) = BoardState::from_tasks(unique);
    for task in rejected {
        warn!(id = %task.id, column = %task.column_id, "dropping task in unknown column");
    }
    Ok(state)
}

/// [`StatePersistence`] over one slot of a [`KeyValueStore`]
pub struct SlotPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SlotPersistence<S> {
    /// Persist into the default `kanbanTasks` slot
    pub fn new(store: S) -> Self {
        Self::with_key(store, TASKS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: KeyValueStore> StatePersistence for SlotPersistence<S> {
    fn load(&self) -> Result<Option<BoardState>> {
        match self.store.get(&self.key)? {
            Some(raw) => {
                let state = decode_state(&raw)?;
                debug!(key = %self.key, tasks = state.task_count(), "loaded board");
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn save(&self, state: &BoardState) -> Result<()> {
        let encoded = encode_state(state)?;
        self.store.set(&self.key, &encoded)?;
        debug!(key = %self.key, tasks = state.task_count(), "saved board");
        Ok(())
    }
}

/// User preferences kept next to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

impl Preferences {
    /// Load preferences; anything missing or unreadable falls back to the default
    pub fn load(store: &impl KeyValueStore) -> Self {
        let dark_mode = match store.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "unreadable dark mode preference, using default");
                Self::default().dark_mode
            }),
            Ok(None) => Self::default().dark_mode,
            Err(e) => {
                warn!(error = %e, "failed to read preferences, using default");
                Self::default().dark_mode
            }
        };
        Self { dark_mode }
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<()> {
        store.set(DARK_MODE_KEY, &serde_json::to_string(&self.dark_mode)?)
    }

    /// Flip dark mode and return the new value
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}
