use crate::domain::Task;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("import failed: file is not valid JSON ({0})")]
    Parse(#[from] serde_json::Error),
    #[error("import failed: file has no \"todos\" list")]
    MissingTodos,
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Export document written by `export` and accepted by `import`
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument<'a> {
    pub todos: &'a [Task],
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
struct ImportDocument {
    todos: Option<Vec<Task>>,
}

/// Default backup filename, e.g. todo-list-backup-2024-03-01.json
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("todo-list-backup-{}.json", now.format("%Y-%m-%d"))
}

/// Render the export document as pretty JSON
pub fn export_json(todos: &[Task], now: DateTime<Utc>) -> Result<String, TransferError> {
    let doc = ExportDocument {
        todos,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse an import document and return its task list
pub fn parse_import(content: &str) -> Result<Vec<Task>, TransferError> {
    let doc: ImportDocument = serde_json::from_str(content)?;
    doc.todos.ok_or(TransferError::MissingTodos)
}

/// Write an export file. A directory target gets the default filename.
pub fn export_to_path(todos: &[Task], target: &Path, now: DateTime<Utc>) -> Result<PathBuf, TransferError> {
    let path = if target.is_dir() {
        target.join(export_file_name(now))
    } else {
        target.to_path_buf()
    };

    let json = export_json(todos, now)?;
    fs::write(&path, json).map_err(|source| TransferError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Read and parse an import file
pub fn import_from_path(path: &Path) -> Result<Vec<Task>, TransferError> {
    let content = fs::read_to_string(path).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_import(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskDraft};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_tasks() -> Vec<Task> {
        let mut a = Task::from_draft(
            1_700_000_000_000,
            TaskDraft::new("Write docs", Priority::High, ["work", "docs"], 4).unwrap(),
        );
        a.completed_pomodoros = 2;
        a.total_work_time = 50;
        a.start_time = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());

        let mut b = Task::from_draft(
            1_700_000_000_001,
            TaskDraft::new("Groceries", Priority::Low, Vec::<String>::new(), 1).unwrap(),
        );
        b.toggle_completed(Utc.with_ymd_and_hms(2024, 3, 2, 18, 30, 0).unwrap());
        vec![a, b]
    }

    #[test]
    fn test_export_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        assert_eq!(export_file_name(now), "todo-list-backup-2024-03-01.json");
    }

    #[test]
    fn test_export_document_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let json = export_json(&sample_tasks(), now).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["timestamp"], "2024-03-01T12:00:00.000Z");
        assert_eq!(value["todos"].as_array().unwrap().len(), 2);
        assert_eq!(value["todos"][0]["pomodoroCount"], 4);
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let tasks = sample_tasks();
        let json = export_json(&tasks, Utc::now()).unwrap();
        let imported = parse_import(&json).unwrap();
        assert_eq!(imported, tasks);
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let err = parse_import("this is not json").unwrap_err();
        assert!(matches!(err, TransferError::Parse(_)));
        assert!(err.to_string().starts_with("import failed"));
    }

    #[test]
    fn test_import_requires_todos() {
        let err = parse_import(r#"{"timestamp": "2024-01-01T00:00:00Z"}"#).unwrap_err();
        assert!(matches!(err, TransferError::MissingTodos));
    }

    #[test]
    fn test_export_to_directory_uses_default_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let path = export_to_path(&sample_tasks(), temp_dir.path(), now).unwrap();
        assert_eq!(path, temp_dir.path().join("todo-list-backup-2024-05-06.json"));

        let imported = import_from_path(&path).unwrap();
        assert_eq!(imported, sample_tasks());
    }

    #[test]
    fn test_import_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = import_from_path(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TransferError::Io { .. }));
    }
}
