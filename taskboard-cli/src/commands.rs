//! Command dispatch against a file-backed board

use crate::cli::{BoardCommand, Cli, Commands, OutputFormat};
use crate::display::{print_board, print_json, print_task};
use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use anyhow::{Context, Result};
use chrono::Local;
use serde_json::json;
use std::path::{Path, PathBuf};
use taskboard::{
    import_from_path, snapshot, BoardConfig, BoardError, ColumnId, ImportGate,
    KeyboardReorder, NotificationKind, TaskFilter, TaskId, TaskPatch, TaskStore,
};
use tokio::sync::Mutex;

/// Load the board, run one command and report the outcome as an exit code
pub async fn run(cli: Cli) -> Result<i32> {
    let config =
        BoardConfig::load(cli.data_dir.as_deref()).context("failed to load configuration")?;
    tracing::debug!(data_dir = %config.data_dir.display(), "opening board");

    let mut store = TaskStore::from_config(&config);
    let format = cli.format;

    let accepted = match cli.command {
        Commands::Import { path } => {
            let shared = Mutex::new(store);
            let gate = ImportGate::new();
            let result = import_from_path(&shared, &gate, &path).await;
            store = shared.into_inner();
            match accept(result)? {
                Some(count) => {
                    if format == OutputFormat::Json {
                        print_json(&json!({ "imported": count }))?;
                    }
                    true
                }
                None => false,
            }
        }
        Commands::Board(command) => execute(&mut store, command, format)?,
    };

    Ok(finish(&store, accepted))
}

fn execute(store: &mut TaskStore, command: BoardCommand, format: OutputFormat) -> Result<bool> {
    match command {
        BoardCommand::Add {
            title,
            column,
            deadline,
        } => match accept(store.add_task(column, &title, deadline))? {
            Some(task) => {
                print_task(&task, format)?;
                Ok(true)
            }
            None => Ok(false),
        },

        BoardCommand::List {
            query,
            priority,
            hide_completed,
        } => {
            let mut filter = TaskFilter::new().hide_completed(hide_completed);
            if let Some(query) = query {
                filter = filter.with_query(query);
            }
            if let Some(priority) = priority {
                filter = filter.with_priority(priority);
            }
            print_board(&store.filtered_view(&filter), format)?;
            Ok(true)
        }

        BoardCommand::Show { id } => {
            let id = TaskId::from(id);
            match store.find_task(&id) {
                Some(task) => {
                    print_task(task, format)?;
                    Ok(true)
                }
                None => Ok(not_found(&id)),
            }
        }

        BoardCommand::Update {
            id,
            title,
            notes,
            deadline,
            clear_deadline,
            priority,
        } => {
            let id = TaskId::from(id);
            let mut patch = TaskPatch::new();
            if let Some(title) = title {
                patch = patch.with_title(title);
            }
            if let Some(notes) = notes {
                patch = patch.with_notes(notes);
            }
            if clear_deadline {
                patch = patch.with_deadline(None);
            } else if deadline.is_some() {
                patch = patch.with_deadline(deadline);
            }
            if let Some(priority) = priority {
                patch = patch.with_priority(priority);
            }

            match accept(store.update_task(&id, patch))? {
                Some(Some(task)) => {
                    print_task(&task, format)?;
                    Ok(true)
                }
                Some(None) => Ok(not_found(&id)),
                None => Ok(false),
            }
        }

        BoardCommand::Delete { id } => {
            let id = TaskId::from(id);
            match store.delete_task(&id) {
                Some(task) => {
                    if format == OutputFormat::Json {
                        print_json(&task)?;
                    }
                    Ok(true)
                }
                None => Ok(not_found(&id)),
            }
        }

        BoardCommand::Move { id, column, index } => {
            let id = TaskId::from(id);
            let column = ColumnId::from(column);
            let moved = match index {
                Some(index) => accept(store.move_task_to(&id, &column, index))?,
                None => {
                    if store.find_task(&id).is_none() {
                        return Ok(not_found(&id));
                    }
                    if !store.state().has_column(&column) {
                        return Ok(reject(BoardError::ColumnNotFound {
                            id: column.to_string(),
                        }));
                    }
                    Some(store.move_task(&id, &column))
                }
            };
            match moved {
                Some(_) => report_position(store, &id, format),
                None => Ok(false),
            }
        }

        BoardCommand::Reorder { column, from, to } => {
            let column = ColumnId::from(column);
            match accept(store.reorder_within_column(&column, from, to))? {
                Some(()) => {
                    print_board(&store.tasks_grouped_by_column(), format)?;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        BoardCommand::Step { id, direction } => {
            let id = TaskId::from(id);
            if store.find_task(&id).is_none() {
                return Ok(not_found(&id));
            }
            match accept(KeyboardReorder::step(store, &id, direction))? {
                Some(_) => report_position(store, &id, format),
                None => Ok(false),
            }
        }

        BoardCommand::Toggle { id } => {
            let id = TaskId::from(id);
            if store.toggle_complete(&id).is_none() {
                return Ok(not_found(&id));
            }
            match store.find_task(&id) {
                Some(task) => print_task(task, format)?,
                None => return Ok(not_found(&id)),
            }
            Ok(true)
        }

        BoardCommand::Export { path } => {
            let tasks = store.export_snapshot();
            let target = export_target(&path);
            let body = snapshot::export_json(&tasks)?;
            std::fs::write(&target, body)
                .with_context(|| format!("failed to write {}", target.display()))?;
            tracing::info!(path = %target.display(), count = tasks.len(), "exported tasks");

            if format == OutputFormat::Json {
                print_json(&json!({ "path": target, "exported": tasks.len() }))?;
            } else {
                println!("Exported {} tasks to {}", tasks.len(), target.display());
            }
            Ok(true)
        }
    }
}

/// Directories get the dated export file name; anything else is used as is
fn export_target(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(snapshot::export_file_name(Local::now().date_naive()))
    } else {
        path.to_path_buf()
    }
}

/// Sort a library result into accepted, rejected or failed.
///
/// Rejections come back as `None`. Validation failures were already pushed to
/// the notification channel; other rejections are printed here.
fn accept<T>(result: taskboard::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_validation() => Ok(None),
        Err(
            e @ (BoardError::TaskNotFound { .. }
            | BoardError::ColumnNotFound { .. }
            | BoardError::IndexOutOfRange { .. }
            | BoardError::ImportInProgress),
        ) => {
            reject(e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn reject(error: BoardError) -> bool {
    eprintln!("Error: {error}");
    false
}

fn not_found(id: &TaskId) -> bool {
    reject(BoardError::TaskNotFound { id: id.to_string() })
}

fn report_position(store: &TaskStore, id: &TaskId, format: OutputFormat) -> Result<bool> {
    let Some((column, index)) = store.position_of(id) else {
        return Ok(not_found(id));
    };
    if format == OutputFormat::Json {
        print_json(&json!({ "id": id, "column": column, "index": index }))?;
    } else {
        println!("{id} is in {column} at position {index}");
    }
    Ok(true)
}

/// Print the pending notification and turn the outcome into an exit code.
/// An error notification fails the command even when the mutation happened.
fn finish(store: &TaskStore, accepted: bool) -> i32 {
    let failed = match store.notifications().current() {
        Some(note) => {
            eprintln!("{}: {}", note.kind, note.message);
            note.kind == NotificationKind::Error
        }
        None => false,
    };

    if accepted && !failed {
        EXIT_SUCCESS
    } else {
        EXIT_ERROR
    }
}
