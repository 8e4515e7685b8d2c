//! Ordered task list owned by a column.
//!
//! A task's position is its index in this list. All index arithmetic for
//! moves and reorders lives here so it can be tested apart from the store.

use super::ids::TaskId;
use super::task::Task;

/// Ordered list of tasks in one column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList(Vec<Task>);

impl TaskList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.0.get_mut(index)
    }

    /// Index of the task with the given id
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.0.iter().position(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Append at the end
    pub fn push(&mut self, task: Task) {
        self.0.push(task);
    }

    /// Insert at `index`, clamped to the end of the list
    pub fn insert(&mut self, index: usize, task: Task) -> usize {
        let index = index.min(self.0.len());
        self.0.insert(index, task);
        index
    }

    /// Remove the task at `index`
    pub fn remove(&mut self, index: usize) -> Option<Task> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Single-slot move within the list.
    ///
    /// The task at `from` is removed first, which shifts every later task down
    /// by one, and is then inserted at `to`. Afterwards the task sits exactly
    /// at index `to`. Returns the offending index if either is out of range.
    pub fn move_within(&mut self, from: usize, to: usize) -> Result<(), usize> {
        let len = self.0.len();
        if from >= len {
            return Err(from);
        }
        if to >= len {
            return Err(to);
        }
        if from != to {
            let task = self.0.remove(from);
            self.0.insert(to, task);
        }
        Ok(())
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
