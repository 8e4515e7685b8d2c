//! Derived views: tasks grouped by column, optionally filtered.

use crate::types::{BoardState, Column, Priority, Task};
use serde::Serialize;

/// One column and the tasks shown in it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnGroup {
    pub column: Column,
    pub tasks: Vec<Task>,
}

/// Search and filter criteria for the board view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against title and notes
    pub query: Option<String>,
    pub priority: Option<Priority>,
    pub hide_completed: bool,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then_some(query);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn hide_completed(mut self, hide: bool) -> Self {
        self.hide_completed = hide;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.priority.is_none() && !self.hide_completed
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.hide_completed && task.completed {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match &self.query {
            Some(query) => {
                let needle = query.trim().to_lowercase();
                task.title.to_lowercase().contains(&needle)
                    || task.notes.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Group every task under its column, in board column order
pub fn group_by_column(state: &BoardState, filter: &TaskFilter) -> Vec<ColumnGroup> {
    state
        .lanes()
        .iter()
        .map(|lane| ColumnGroup {
            column: lane.column.clone(),
            tasks: lane
                .tasks
                .iter()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardState {
        let mut done = Task::new("Ship release", "done").with_priority(Priority::High);
        done.completed = true;
        BoardState::from_tasks(vec![
            Task::new("Write docs", "todo").with_notes("API reference"),
            Task::new("Fix login bug", "doing").with_priority(Priority::Urgent),
            done,
        ])
        .0
    }

    fn titles(groups: &[ColumnGroup]) -> Vec<&str> {
        groups
            .iter()
            .flat_map(|g| g.tasks.iter().map(|t| t.title.as_str()))
            .collect()
    }

    #[test]
    fn test_unfiltered_keeps_all_columns() {
        let groups = group_by_column(&board(), &TaskFilter::new());
        assert_eq!(groups.len(), 4);
        assert!(groups[0].tasks.is_empty());
        assert_eq!(titles(&groups), ["Write docs", "Fix login bug", "Ship release"]);
    }

    #[test]
    fn test_query_matches_title_and_notes() {
        let state = board();
        let by_title = group_by_column(&state, &TaskFilter::new().with_query("LOGIN"));
        assert_eq!(titles(&by_title), ["Fix login bug"]);

        let by_notes = group_by_column(&state, &TaskFilter::new().with_query("api"));
        assert_eq!(titles(&by_notes), ["Write docs"]);
    }

    #[test]
    fn test_priority_and_completed() {
        let state = board();
        let urgent = group_by_column(&state, &TaskFilter::new().with_priority(Priority::Urgent));
        assert_eq!(titles(&urgent), ["Fix login bug"]);

        let open = group_by_column(&state, &TaskFilter::new().hide_completed(true));
        assert_eq!(titles(&open), ["Write docs", "Fix login bug"]);
    }

    #[test]
    fn test_blank_query_is_no_filter() {
        assert!(TaskFilter::new().with_query("   ").is_empty());
    }
}
