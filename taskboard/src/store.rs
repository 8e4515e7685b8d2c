//! TaskStore - the single source of truth for tasks and columns.
//!
//! Every mutation goes through the store. A successful mutation is saved
//! through the injected [`StatePersistence`] port before the call returns.
//!
//! Errors stop at this boundary the same way each time:
//!
//! - validation failures leave the state unchanged and push an error notification
//! - unknown task or column ids are a silent no-op
//! - save failures keep the in-memory change and push an error notification
//!
//! Methods still return a `Result` or `Option` so callers can tell what happened.

use crate::config::BoardConfig;
use crate::error::{BoardError, Result, ValidationError};
use crate::notification::NotificationChannel;
use crate::persistence::{SlotPersistence, StatePersistence};
use crate::sanitize::sanitize_title;
use crate::snapshot::{parse_import, validate_tasks};
use crate::storage::FileStore;
use crate::types::{BoardState, ColumnId, Task, TaskId, TaskPatch, TERMINAL_COLUMN};
use crate::view::{group_by_column, ColumnGroup, TaskFilter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What toggling a task to completed does to its column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Only flip the flag; the task stays where it is
    #[default]
    InPlace,
    /// Also append the task to the terminal `done` column
    MoveToTerminal,
}

pub struct TaskStore {
    state: BoardState,
    persistence: Box<dyn StatePersistence>,
    notifications: NotificationChannel,
    policy: CompletionPolicy,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.state.task_count())
            .field("policy", &self.policy)
            .field("notification", &self.notifications.current())
            .finish()
    }
}

impl TaskStore {
    /// Restore the board from the persistence port.
    ///
    /// A missing or unreadable slot starts an empty board without telling the
    /// user; the problem is only logged.
    pub fn open(persistence: impl StatePersistence + 'static) -> Self {
        let state = match persistence.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("no saved board, starting empty");
                BoardState::new()
            }
            Err(e) => {
                warn!(error = %e, "saved board unreadable, starting empty");
                BoardState::new()
            }
        };

        Self {
            state,
            persistence: Box::new(persistence),
            notifications: NotificationChannel::new(),
            policy: CompletionPolicy::default(),
        }
    }

    /// Open the file-backed board described by a configuration
    pub fn from_config(config: &BoardConfig) -> Self {
        let persistence = SlotPersistence::new(FileStore::new(&config.data_dir));
        Self::open(persistence)
            .with_policy(config.completion_policy)
            .with_notifications(NotificationChannel::with_display_duration(
                config.notification_timeout(),
            ))
    }

    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notifications(mut self, notifications: NotificationChannel) -> Self {
        self.notifications = notifications;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationChannel {
        &mut self.notifications
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.state.task(id)
    }

    /// Column and index of a task
    pub fn position_of(&self, id: &TaskId) -> Option<(ColumnId, usize)> {
        let (lane, index) = self.state.locate(id)?;
        Some((self.state.lanes()[lane].column.id.clone(), index))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a new task to the end of a column
    pub fn add_task(
        &mut self,
        column_id: impl Into<ColumnId>,
        title: &str,
        deadline: Option<NaiveDate>,
    ) -> Result<Task> {
        let column_id = column_id.into();
        let title = self.validated_title(title)?;

        let lane = self.state.lane_mut(&column_id).ok_or_else(|| {
            debug!(column = %column_id, "add to unknown column ignored");
            BoardError::ColumnNotFound {
                id: column_id.to_string(),
            }
        })?;

        let task = Task::new(title, column_id.clone()).with_deadline(deadline);
        lane.tasks.push(task.clone());
        debug!(id = %task.id, column = %column_id, "added task");

        if self.persist() {
            self.notifications.success("Task added successfully");
        }
        Ok(task)
    }

    /// Apply a partial update.
    ///
    /// Returns `Ok(None)` for an unknown id. An invalid title rejects the
    /// whole patch.
    pub fn update_task(&mut self, id: &TaskId, mut patch: TaskPatch) -> Result<Option<Task>> {
        if self.state.task(id).is_none() {
            debug!(%id, "update of unknown task ignored");
            return Ok(None);
        }

        if let Some(title) = patch.title.take() {
            patch.title = Some(self.validated_title(&title)?);
        }

        let Some(task) = self.state.task_mut(id) else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(task.clone()));
        }
        patch.apply_to(task);
        let updated = task.clone();
        debug!(%id, "updated task");

        self.persist();
        Ok(Some(updated))
    }

    /// Remove a task. Deleting an unknown or already deleted id does nothing.
    pub fn delete_task(&mut self, id: &TaskId) -> Option<Task> {
        let removed = self.state.take_task(id)?;
        debug!(%id, "deleted task");

        if self.persist() {
            self.notifications.info("Task deleted");
        }
        Some(removed)
    }

    /// Move a task to the end of another column.
    ///
    /// Returns false when nothing changed: unknown ids, or the task is
    /// already in that column.
    pub fn move_task(&mut self, id: &TaskId, new_column: &ColumnId) -> bool {
        let Some((lane, _)) = self.state.locate(id) else {
            return false;
        };
        if &self.state.lanes()[lane].column.id == new_column || !self.state.has_column(new_column)
        {
            return false;
        }
        self.relocate(id, new_column, usize::MAX)
    }

    /// Move a task into a column at an index, clamped to the end of the list.
    ///
    /// Within the task's own column this is a reorder to `index`.
    pub fn move_task_to(&mut self, id: &TaskId, column: &ColumnId, index: usize) -> Result<bool> {
        let (lane, from) = self
            .state
            .locate(id)
            .ok_or_else(|| BoardError::TaskNotFound { id: id.to_string() })?;
        if !self.state.has_column(column) {
            return Err(BoardError::ColumnNotFound {
                id: column.to_string(),
            });
        }

        if &self.state.lanes()[lane].column.id == column {
            let last = self.state.lanes()[lane].tasks.len() - 1;
            let to = index.min(last);
            if to == from {
                return Ok(false);
            }
            self.reorder_within_column(column, from, to)?;
            return Ok(true);
        }

        Ok(self.relocate(id, column, index))
    }

    /// Remove the task at `from` and reinsert it at `to` in the same column
    pub fn reorder_within_column(&mut self, column: &ColumnId, from: usize, to: usize) -> Result<()> {
        let lane = self
            .state
            .lane_mut(column)
            .ok_or_else(|| BoardError::ColumnNotFound {
                id: column.to_string(),
            })?;
        let len = lane.tasks.len();
        lane.tasks
            .move_within(from, to)
            .map_err(|index| BoardError::IndexOutOfRange {
                column: column.to_string(),
                index,
                len,
            })?;

        if from != to {
            debug!(%column, from, to, "reordered task");
            self.persist();
        }
        Ok(())
    }

    /// Flip a task's completed flag, returning the new value.
    ///
    /// Under [`CompletionPolicy::MoveToTerminal`] a task that becomes completed
    /// is also appended to the `done` column.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Option<bool> {
        let task = self.state.task_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        debug!(%id, completed, "toggled task");

        let terminal = ColumnId::from(TERMINAL_COLUMN);
        let relocate = completed
            && self.policy == CompletionPolicy::MoveToTerminal
            && self.state.has_column(&terminal)
            && !self
                .state
                .lane(&terminal)
                .is_some_and(|lane| lane.tasks.contains(id));

        if relocate {
            // relocate persists
            self.relocate(id, &terminal, usize::MAX);
        } else {
            self.persist();
        }
        Some(completed)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Every column with its tasks, in board order
    pub fn tasks_grouped_by_column(&self) -> Vec<ColumnGroup> {
        group_by_column(&self.state, &TaskFilter::default())
    }

    /// Grouped view restricted to tasks matching the filter
    pub fn filtered_view(&self, filter: &TaskFilter) -> Vec<ColumnGroup> {
        group_by_column(&self.state, filter)
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Flat task collection, column by column in position order
    pub fn export_snapshot(&self) -> Vec<Task> {
        self.state.tasks().cloned().collect()
    }

    /// Replace every task with the given collection.
    ///
    /// The collection is validated as a whole first; any invalid element
    /// rejects the import and leaves the board untouched.
    pub fn import_snapshot(&mut self, tasks: Vec<Task>) -> Result<usize> {
        let tasks = validate_tasks(tasks).map_err(|e| self.reject(e))?;
        self.replace_all(tasks)
    }

    /// Parse an export file body and import it
    pub fn import_json(&mut self, raw: &str) -> Result<usize> {
        let tasks = parse_import(raw).map_err(|e| self.reject(e))?;
        self.replace_all(tasks)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn replace_all(&mut self, tasks: Vec<Task>) -> Result<usize> {
        let (state, rejected) = BoardState::from_tasks(tasks);
        debug_assert!(rejected.is_empty(), "validated tasks reference known columns");

        let count = state.task_count();
        self.state = state;
        info!(count, "imported tasks");

        if self.persist() {
            self.notifications.success(format!("Imported {count} tasks"));
        }
        Ok(count)
    }

    fn validated_title(&mut self, raw: &str) -> Result<String> {
        sanitize_title(raw).map_err(|e| self.reject(e))
    }

    /// Report a validation failure to the user and hand it back as an error
    fn reject(&mut self, error: ValidationError) -> BoardError {
        debug!(%error, "rejected input");
        self.notifications.error(error.to_string());
        error.into()
    }

    /// Take a task out of its lane and insert it into another. Ids are
    /// checked by the caller.
    fn relocate(&mut self, id: &TaskId, column: &ColumnId, index: usize) -> bool {
        let Some(target) = self.state.lane_index(column) else {
            return false;
        };
        let Some(mut task) = self.state.take_task(id) else {
            return false;
        };
        task.column_id = column.clone();

        let Some(lane) = self.state.lane_at_mut(target) else {
            return false;
        };
        let at = lane.tasks.insert(index, task);
        debug!(%id, %column, index = at, "moved task");

        self.persist();
        true
    }

    /// Save the board. A failure keeps the in-memory change and replaces any
    /// pending notification with an error.
    fn persist(&mut self) -> bool {
        match self.persistence.save(&self.state) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save board");
                self.notifications.error("Failed to save tasks");
                false
            }
        }
    }
}
