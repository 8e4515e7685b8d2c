//! Board-level types: Column, Lane, BoardState

use super::ids::{ColumnId, TaskId};
use super::list::TaskList;
use super::task::Task;
use serde::{Deserialize, Serialize};

/// Column that completed tasks move to under the move-to-terminal policy
pub const TERMINAL_COLUMN: &str = "done";

/// A column defines a workflow stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// The fixed column set, in display order
    pub fn defaults() -> Vec<Column> {
        vec![
            Column::new("backlog", "Backlog"),
            Column::new("todo", "To Do"),
            Column::new("doing", "Doing"),
            Column::new("done", "Done"),
        ]
    }
}

/// A column together with the tasks it owns
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub column: Column,
    pub tasks: TaskList,
}

/// Full in-memory board: every fixed column and its ordered tasks
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    lanes: Vec<Lane>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Empty board with the default columns
    pub fn new() -> Self {
        Self::with_columns(Column::defaults())
    }

    /// Empty board with a custom column set
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self {
            lanes: columns
                .into_iter()
                .map(|column| Lane {
                    column,
                    tasks: TaskList::new(),
                })
                .collect(),
        }
    }

    /// Build a board from a flat task list in order.
    ///
    /// Tasks are appended to the lane named by their `column_id`. Tasks that
    /// reference an unknown column are returned separately.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> (Self, Vec<Task>) {
        let mut state = Self::new();
        let mut rejected = Vec::new();
        for task in tasks {
            match state.lane_index(&task.column_id) {
                Some(idx) => state.lanes[idx].tasks.push(task),
                None => rejected.push(task),
            }
        }
        (state, rejected)
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.lanes.iter().map(|l| &l.column)
    }

    pub fn has_column(&self, id: &ColumnId) -> bool {
        self.lane_index(id).is_some()
    }

    pub fn lane(&self, id: &ColumnId) -> Option<&Lane> {
        self.lanes.iter().find(|l| &l.column.id == id)
    }

    pub(crate) fn lane_mut(&mut self, id: &ColumnId) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|l| &l.column.id == id)
    }

    pub(crate) fn lane_index(&self, id: &ColumnId) -> Option<usize> {
        self.lanes.iter().position(|l| &l.column.id == id)
    }

    pub(crate) fn lane_at_mut(&mut self, index: usize) -> Option<&mut Lane> {
        self.lanes.get_mut(index)
    }

    /// Column id of the neighbour lane in the given direction
    pub fn adjacent_column(&self, id: &ColumnId, forward: bool) -> Option<&ColumnId> {
        let idx = self.lane_index(id)?;
        let target = if forward {
            idx.checked_add(1)?
        } else {
            idx.checked_sub(1)?
        };
        self.lanes.get(target).map(|l| &l.column.id)
    }

    /// Lane index and in-lane index of a task
    pub fn locate(&self, id: &TaskId) -> Option<(usize, usize)> {
        self.lanes
            .iter()
            .enumerate()
            .find_map(|(li, lane)| lane.tasks.position(id).map(|pos| (li, pos)))
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        let (li, pos) = self.locate(id)?;
        self.lanes[li].tasks.get(pos)
    }

    pub(crate) fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        let (li, pos) = self.locate(id)?;
        self.lanes[li].tasks.get_mut(pos)
    }

    /// Remove a task from whichever lane holds it
    pub(crate) fn take_task(&mut self, id: &TaskId) -> Option<Task> {
        let (li, pos) = self.locate(id)?;
        self.lanes[li].tasks.remove(pos)
    }

    /// All tasks, column by column, in position order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.lanes.iter().flat_map(|l| l.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.lanes.iter().map(|l| l.tasks.len()).sum()
    }
}
