//! Drag gestures and keyboard steps translated into store moves.
//!
//! A drag gesture moves the task across columns as soon as the pointer is
//! over another column, so the board shows where the task will land. The
//! final drop only reorders within the column the task ended up in.
//! Cancelling keeps whatever the previews already did.

use crate::error::Result;
use crate::store::TaskStore;
use crate::types::{ColumnId, TaskId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the pointer is over during a drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum DropTarget {
    /// Another task; the dragged task takes its index
    Task(TaskId),
    /// The empty area of a column; the dragged task goes to the end
    Column(ColumnId),
}

/// Resolved target: column and insertion index. `None` index means the end.
struct Slot {
    column: ColumnId,
    index: Option<usize>,
}

fn resolve(store: &TaskStore, target: &DropTarget) -> Option<Slot> {
    match target {
        DropTarget::Task(id) => {
            let (column, index) = store.position_of(id)?;
            Some(Slot {
                column,
                index: Some(index),
            })
        }
        DropTarget::Column(column) => store.state().has_column(column).then(|| Slot {
            column: column.clone(),
            index: None,
        }),
    }
}

/// One pointer drag of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    active: TaskId,
    previews: usize,
}

impl DragSession {
    /// Begin dragging a task. Nothing moves yet.
    pub fn start(task_id: impl Into<TaskId>) -> Self {
        let active = task_id.into();
        debug!(id = %active, "drag started");
        Self {
            active,
            previews: 0,
        }
    }

    pub fn active(&self) -> &TaskId {
        &self.active
    }

    /// Number of cross-column preview moves made so far
    pub fn previews(&self) -> usize {
        self.previews
    }

    /// Pointer moved over a target.
    ///
    /// When the target lies in another column the task moves there at once,
    /// at the target task's index or at the end of a column zone. Returns
    /// whether the board changed.
    pub fn drag_over(&mut self, store: &mut TaskStore, target: &DropTarget) -> Result<bool> {
        let Some((current, _)) = store.position_of(&self.active) else {
            return Ok(false);
        };
        let Some(slot) = resolve(store, target) else {
            return Ok(false);
        };
        if slot.column == current {
            return Ok(false);
        }

        let moved = store.move_task_to(
            &self.active,
            &slot.column,
            slot.index.unwrap_or(usize::MAX),
        )?;
        if moved {
            self.previews += 1;
            debug!(id = %self.active, column = %slot.column, "drag preview moved task");
        }
        Ok(moved)
    }

    /// Release the task over a target, or over nothing.
    ///
    /// Within the task's current column this reorders to the target's index.
    /// A drop into another column without a preceding preview moves it there.
    pub fn drop(self, store: &mut TaskStore, target: Option<&DropTarget>) -> Result<bool> {
        let Some(target) = target else {
            debug!(id = %self.active, "dropped outside any target");
            return Ok(false);
        };
        let Some((current, from)) = store.position_of(&self.active) else {
            return Ok(false);
        };
        let Some(slot) = resolve(store, target) else {
            return Ok(false);
        };

        if slot.column != current {
            return store.move_task_to(
                &self.active,
                &slot.column,
                slot.index.unwrap_or(usize::MAX),
            );
        }

        let last = store
            .state()
            .lane(&current)
            .map_or(0, |lane| lane.tasks.len().saturating_sub(1));
        let to = slot.index.unwrap_or(last);
        if to == from {
            return Ok(false);
        }
        store.reorder_within_column(&current, from, to)?;
        Ok(true)
    }

    /// Abandon the gesture. Preview moves stay where they are.
    pub fn cancel(self) {
        debug!(id = %self.active, previews = self.previews, "drag cancelled");
    }
}

/// Keyboard step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Keyboard-driven reordering
pub struct KeyboardReorder;

impl KeyboardReorder {
    /// Move a task one step.
    ///
    /// Up and Down shift it one index within its column. Left and Right send it
    /// to the end of the neighbouring column. Steps past an edge do nothing.
    pub fn step(store: &mut TaskStore, id: &TaskId, direction: Direction) -> Result<bool> {
        let Some((column, index)) = store.position_of(id) else {
            return Ok(false);
        };

        match direction {
            Direction::Up => {
                let Some(to) = index.checked_sub(1) else {
                    return Ok(false);
                };
                store.reorder_within_column(&column, index, to)?;
                Ok(true)
            }
            Direction::Down => {
                let len = store.state().lane(&column).map_or(0, |l| l.tasks.len());
                if index + 1 >= len {
                    return Ok(false);
                }
                store.reorder_within_column(&column, index, index + 1)?;
                Ok(true)
            }
            Direction::Left | Direction::Right => {
                let forward = direction == Direction::Right;
                let Some(target) = store.state().adjacent_column(&column, forward).cloned()
                else {
                    return Ok(false);
                };
                Ok(store.move_task(id, &target))
            }
        }
    }
}
