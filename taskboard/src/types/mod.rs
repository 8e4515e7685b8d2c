//! Core types for the task board

mod board;
mod ids;
mod list;
mod task;

// Re-export all types
pub use board::{BoardState, Column, Lane, TERMINAL_COLUMN};
pub use ids::{ColumnId, TaskId};
pub use list::TaskList;
pub use task::{Priority, Task, TaskPatch};
