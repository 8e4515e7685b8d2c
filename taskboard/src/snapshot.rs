//! Export and import of the flat task collection.
//!
//! An export file is a pretty-printed JSON array of tasks. Import accepts the
//! same shape and validates all of it before anything is replaced.

use crate::error::{Result, ValidationError};
use crate::sanitize::sanitize_title;
use crate::types::{BoardState, Task, TaskId};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashSet;

/// Fields every imported element must carry as non-empty strings
const REQUIRED_FIELDS: [&str; 3] = ["id", "title", "columnId"];

/// File name for an export made on the given day
pub fn export_file_name(date: NaiveDate) -> String {
    format!("kanban-tasks-{}.json", date.format("%Y-%m-%d"))
}

/// Serialize tasks as an export file body
pub fn export_json(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Parse and validate an import file body
pub fn parse_import(raw: &str) -> std::result::Result<Vec<Task>, ValidationError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ValidationError::invalid_import(format!("not valid JSON: {e}")))?;

    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::invalid_import("expected an array of tasks"))?;

    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        for field in REQUIRED_FIELDS {
            let present = item
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                return Err(ValidationError::invalid_import(format!(
                    "task {index} is missing '{field}'"
                )));
            }
        }
        let task: Task = serde_json::from_value(item.clone()).map_err(|e| {
            ValidationError::invalid_import(format!("task {index} is malformed: {e}"))
        })?;
        tasks.push(task);
    }

    validate_tasks(tasks)
}

/// Check a task collection against the board invariants.
///
/// Every id, title and column id must be non-empty, every column must exist,
/// and ids must be unique. Titles come back sanitized.
pub fn validate_tasks(tasks: Vec<Task>) -> std::result::Result<Vec<Task>, ValidationError> {
    let board = BoardState::new();
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());

    tasks
        .into_iter()
        .enumerate()
        .map(|(index, mut task)| {
            if task.id.is_blank() {
                return Err(ValidationError::invalid_import(format!(
                    "task {index} is missing 'id'"
                )));
            }
            if task.column_id.is_blank() {
                return Err(ValidationError::invalid_import(format!(
                    "task {index} is missing 'columnId'"
                )));
            }
            if !board.has_column(&task.column_id) {
                return Err(ValidationError::invalid_import(format!(
                    "task {index} references unknown column '{}'",
                    task.column_id
                )));
            }
            if !seen.insert(task.id.clone()) {
                return Err(ValidationError::invalid_import(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
            task.title = sanitize_title(&task.title).map_err(|e| {
                ValidationError::invalid_import(format!("task {index}: {e}"))
            })?;
            Ok(task)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "kanban-tasks-2024-03-09.json");
    }

    #[test]
    fn test_export_is_array() {
        let tasks = vec![Task::new("A", "todo")];
        let raw = export_json(&tasks).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["title"], "A");
        assert_eq!(value[0]["columnId"], "todo");
    }

    #[test]
    fn test_parse_minimal_elements() {
        let tasks = parse_import(r#"[{"id": "1", "title": "x", "columnId": "todo"}]"#).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "1");
        assert!(!tasks[0].completed);
    }

    #[test]
    fn test_rejects_non_array() {
        let err = parse_import(r#"{"id": "1"}"#).unwrap_err();
        assert!(err.to_string().contains("expected an array"));
        assert!(parse_import("nope").is_err());
    }

    #[test]
    fn test_rejects_missing_column() {
        let err = parse_import(r#"[{"id": "1", "title": "x"}]"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::invalid_import("task 0 is missing 'columnId'")
        );
    }

    #[test]
    fn test_rejects_empty_fields() {
        assert!(parse_import(r#"[{"id": "", "title": "x", "columnId": "todo"}]"#).is_err());
        assert!(parse_import(r#"[{"id": "1", "title": "  ", "columnId": "todo"}]"#).is_err());
        assert!(parse_import(r#"[{"id": 7, "title": "x", "columnId": "todo"}]"#).is_err());
    }

    #[test]
    fn test_rejects_unknown_column_and_duplicates() {
        assert!(parse_import(r#"[{"id": "1", "title": "x", "columnId": "archive"}]"#).is_err());

        let err = parse_import(
            r#"[{"id": "1", "title": "x", "columnId": "todo"},
                {"id": "1", "title": "y", "columnId": "done"}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate task id '1'"));
    }

    #[test]
    fn test_titles_are_sanitized() {
        let tasks = parse_import(r#"[{"id": "1", "title": " <b>bold</b> ", "columnId": "todo"}]"#)
            .unwrap();
        assert_eq!(tasks[0].title, "bbold/b");
    }

    #[test]
    fn test_title_length_checked_after_sanitizing() {
        let title = format!("{}{}", "<>".repeat(100), "a".repeat(400));
        let raw = serde_json::json!([{ "id": "1", "title": title, "columnId": "todo" }]);
        let tasks = parse_import(&raw.to_string()).unwrap();
        assert_eq!(tasks[0].title, "a".repeat(400));

        let long = serde_json::json!([{ "id": "1", "title": "a".repeat(501), "columnId": "todo" }]);
        assert!(parse_import(&long.to_string()).is_err());
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_import("[]").unwrap().is_empty());
    }
}
