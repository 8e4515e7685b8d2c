//! End-to-end tests of the taskboard binary against a temporary data directory

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn taskboard(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskboard").unwrap();
    cmd.arg("--data-dir")
        .arg(data_dir)
        .env_remove("TASKBOARD_DATA_DIR")
        .env_remove("TASKBOARD_COMPLETION_POLICY")
        .env_remove("TASKBOARD_NOTIFICATION_TIMEOUT_SECS");
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("--format").arg("json").output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add(data_dir: &Path, title: &str, column: &str) -> String {
    let task = json_output(taskboard(data_dir).args(["add", title, "--column", column]));
    task["id"].as_str().unwrap().to_string()
}

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    taskboard(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reorder"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_add_and_list() {
    let temp = TempDir::new().unwrap();

    taskboard(temp.path())
        .args(["add", "Write release notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write release notes"))
        .stderr(predicate::str::contains("Task added successfully"));

    taskboard(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("To Do"))
        .stdout(predicate::str::contains("1 task"));

    assert!(temp.path().join("kanbanTasks.json").exists());
}

#[test]
fn test_blank_title_is_rejected() {
    let temp = TempDir::new().unwrap();
    taskboard(temp.path())
        .args(["add", "   "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Task title cannot be empty"));
}

#[test]
fn test_unknown_task_is_rejected() {
    let temp = TempDir::new().unwrap();
    for command in ["show", "delete", "toggle"] {
        taskboard(temp.path())
            .args([command, "does-not-exist"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("task not found"));
    }
}

#[test]
fn test_move_and_reorder() {
    let temp = TempDir::new().unwrap();
    let a = add(temp.path(), "A", "todo");
    add(temp.path(), "B", "doing");

    let moved = json_output(taskboard(temp.path()).args(["move", &a, "doing"]));
    assert_eq!(moved["column"], "doing");
    assert_eq!(moved["index"], 1);

    taskboard(temp.path())
        .args(["reorder", "doing", "1", "0"])
        .assert()
        .success();

    let board = json_output(taskboard(temp.path()).arg("list"));
    let doing = board
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["column"]["id"] == "doing")
        .unwrap();
    assert_eq!(doing["tasks"][0]["title"], "A");
    assert_eq!(doing["tasks"][1]["title"], "B");

    taskboard(temp.path())
        .args(["reorder", "doing", "0", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_step_and_toggle() {
    let temp = TempDir::new().unwrap();
    let a = add(temp.path(), "A", "doing");

    let stepped = json_output(taskboard(temp.path()).args(["step", &a, "right"]));
    assert_eq!(stepped["column"], "done");

    let toggled = json_output(taskboard(temp.path()).args(["toggle", &a]));
    assert_eq!(toggled["completed"], true);
}

#[test]
fn test_update_fields() {
    let temp = TempDir::new().unwrap();
    let a = add(temp.path(), "Draft", "backlog");

    let updated = json_output(taskboard(temp.path()).args([
        "update",
        &a,
        "--title",
        "Final",
        "--priority",
        "high",
        "--deadline",
        "2030-01-31",
    ]));
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["priority"], "high");
    assert_eq!(updated["deadline"], "2030-01-31");

    let cleared = json_output(taskboard(temp.path()).args(["update", &a, "--clear-deadline"]));
    assert!(cleared["deadline"].is_null());
}

#[test]
fn test_export_then_import() {
    let board = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    add(board.path(), "Keep me", "todo");
    add(board.path(), "Me too", "done");

    let exported = json_output(
        taskboard(board.path())
            .arg("export")
            .arg(out.path()),
    );
    assert_eq!(exported["exported"], 2);
    let file = exported["path"].as_str().unwrap().to_string();
    assert!(file.contains("kanban-tasks-"));

    let other = TempDir::new().unwrap();
    taskboard(other.path())
        .args(["import", &file])
        .assert()
        .success()
        .stderr(predicate::str::contains("Imported 2 tasks"));

    taskboard(other.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me"))
        .stdout(predicate::str::contains("Me too"));
}

#[test]
fn test_invalid_import_keeps_board() {
    let temp = TempDir::new().unwrap();
    add(temp.path(), "Existing", "todo");

    let bad = temp.path().join("bad.json");
    std::fs::write(&bad, r#"[{"id": "1", "title": "x"}]"#).unwrap();

    taskboard(temp.path())
        .arg("import")
        .arg(&bad)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid import file"));

    taskboard(temp.path())
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Existing"));
}

#[test]
fn test_config_file_policy() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("taskboard.toml"),
        "completion_policy = \"move_to_terminal\"\n",
    )
    .unwrap();
    let a = add(temp.path(), "Ship it", "todo");

    let toggled = json_output(taskboard(temp.path()).args(["toggle", &a]));
    assert_eq!(toggled["columnId"], "done");
}
