use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taskboard::{Direction, Priority};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Kanban task board in your terminal")]
#[command(long_about = "
taskboard keeps a four column kanban board (Backlog, To Do, Doing, Done)
in a data directory and lets you add, move, reorder and complete tasks.

Global arguments can be used with any command:
  --data-dir    Board directory (default: platform data dir, or TASKBOARD_DATA_DIR)
  --format      Output format (table, json)
  --verbose     Show debug logging
  --quiet       Only log errors

Example usage:
  taskboard add \"Write release notes\" --column todo
  taskboard list --query notes
  taskboard move 01J8Z... doing
  taskboard export ./backups
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the board
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Board(BoardCommand),

    /// Replace the board with the tasks in an export file
    Import { path: PathBuf },
}

/// Commands that run synchronously against the loaded board
#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// Add a task to the end of a column
    Add {
        /// Task title
        title: String,

        /// Column to add the task to
        #[arg(short, long, default_value = "todo")]
        column: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },

    /// Show the board grouped by column
    List {
        /// Only tasks whose title or notes contain this text
        #[arg(long)]
        query: Option<String>,

        /// Only tasks with this priority
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,

        /// Leave out completed tasks
        #[arg(long)]
        hide_completed: bool,
    },

    /// Show one task
    Show { id: String },

    /// Change task fields
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_deadline: bool,

        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Delete a task
    Delete { id: String },

    /// Move a task to another column
    Move {
        id: String,

        /// Target column
        column: String,

        /// Position in the target column (default: end)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Move the task at one index of a column to another index
    Reorder {
        column: String,
        from: usize,
        to: usize,
    },

    /// Move a task one step: up, down, left or right
    Step {
        id: String,

        #[arg(value_parser = parse_direction)]
        direction: Direction,
    },

    /// Flip a task between open and completed
    Toggle { id: String },

    /// Write every task to a dated JSON file
    Export {
        /// Output file, or directory for the dated file name
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse()
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taskboard", "list", "--format", "json", "--data-dir", "/tmp/b", "-v",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir.unwrap(), PathBuf::from("/tmp/b"));
    }

    #[test]
    fn test_add_defaults_to_todo() {
        let cli = Cli::try_parse_from(["taskboard", "add", "Write docs"]).unwrap();
        match cli.command {
            Commands::Board(BoardCommand::Add { column, deadline, .. }) => {
                assert_eq!(column, "todo");
                assert!(deadline.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_import_is_separate_from_board_commands() {
        let cli = Cli::try_parse_from(["taskboard", "import", "tasks.json"]).unwrap();
        match cli.command {
            Commands::Import { path } => assert_eq!(path, PathBuf::from("tasks.json")),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["taskboard", "export"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Board(BoardCommand::Export { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["taskboard", "add", "x", "--deadline", "soon"]).is_err());
        assert!(Cli::try_parse_from(["taskboard", "step", "id", "sideways"]).is_err());
        assert!(Cli::try_parse_from(["taskboard", "-v", "-q", "list"]).is_err());
    }
}
