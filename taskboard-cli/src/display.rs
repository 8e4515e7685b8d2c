//! Table and JSON rendering of board data

use crate::cli::OutputFormat;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use taskboard::{ColumnGroup, Task};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn deadline_cell(task: &Task, today: NaiveDate) -> String {
    match task.deadline {
        Some(date) if task.is_overdue(today) => format!("{date} (overdue)"),
        Some(date) => date.to_string(),
        None => String::new(),
    }
}

fn done_cell(task: &Task) -> &'static str {
    if task.completed {
        "✓"
    } else {
        ""
    }
}

/// Render the grouped board
pub fn print_board(groups: &[ColumnGroup], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(groups);
    }

    let total: usize = groups.iter().map(|g| g.tasks.len()).sum();
    if total == 0 {
        println!("No tasks");
        return Ok(());
    }

    println!("{}", board_table(groups, today()));
    println!("{total} task{}", if total == 1 { "" } else { "s" });
    Ok(())
}

fn board_table(groups: &[ColumnGroup], today: NaiveDate) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Column", "#", "ID", "Title", "Priority", "Deadline", "Done"]);

    for group in groups {
        for (index, task) in group.tasks.iter().enumerate() {
            table.add_row(vec![
                Cell::new(&group.column.title),
                Cell::new(index),
                Cell::new(&task.id),
                Cell::new(&task.title),
                Cell::new(task.priority),
                Cell::new(deadline_cell(task, today)),
                Cell::new(done_cell(task)),
            ]);
        }
    }
    table
}

/// Render a single task
pub fn print_task(task: &Task, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(task);
    }
    println!("{}", task_table(task, today()));
    Ok(())
}

fn task_table(task: &Task, today: NaiveDate) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID", task.id.as_str()]);
    table.add_row(vec!["Title", task.title.as_str()]);
    table.add_row(vec!["Column", task.column_id.as_str()]);
    table.add_row(vec!["Priority", task.priority.as_str()]);
    table.add_row(vec![
        "Completed".to_string(),
        if task.completed { "yes" } else { "no" }.to_string(),
    ]);
    table.add_row(vec!["Deadline".to_string(), deadline_cell(task, today)]);
    table.add_row(vec!["Notes", task.notes.as_str()]);
    table.add_row(vec![
        "Created".to_string(),
        task.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard::{Column, Priority};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overdue_marker() {
        let task = Task::new("Taxes", "todo").with_deadline(Some(date(2024, 4, 15)));
        assert_eq!(deadline_cell(&task, date(2024, 4, 1)), "2024-04-15");
        assert_eq!(deadline_cell(&task, date(2024, 5, 1)), "2024-04-15 (overdue)");
    }

    #[test]
    fn test_board_table_rows() {
        let groups = vec![
            ColumnGroup {
                column: Column::new("todo", "To Do"),
                tasks: vec![
                    Task::new("Write docs", "todo"),
                    Task::new("Fix bug", "todo").with_priority(Priority::Urgent),
                ],
            },
            ColumnGroup {
                column: Column::new("done", "Done"),
                tasks: vec![],
            },
        ];
        let rendered = board_table(&groups, date(2024, 1, 1)).to_string();
        assert!(rendered.contains("Write docs"));
        assert!(rendered.contains("urgent"));
        assert_eq!(rendered.matches("To Do").count(), 2);
    }

    #[test]
    fn test_task_table_fields() {
        let task = Task::new("Write docs", "doing").with_notes("API reference");
        let rendered = task_table(&task, date(2024, 1, 1)).to_string();
        assert!(rendered.contains("doing"));
        assert!(rendered.contains("API reference"));
        assert!(rendered.contains(task.id.as_str()));
    }
}
