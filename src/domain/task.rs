use super::enums::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Task identifier: the creation timestamp in milliseconds
pub type TaskId = u64;

/// Rejected task input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("task text cannot be empty")]
    EmptyText,
}

/// User input for a new task, before it gets an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub priority: Priority,
    pub tags: BTreeSet<String>,
    pub pomodoro_count: u32,
}

impl TaskDraft {
    /// Build a draft, trimming text and tags. A planned count below 1 becomes 1.
    pub fn new<I, S>(text: &str, priority: Priority, tags: I, pomodoro_count: u32) -> Result<Self, DraftError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(DraftError::EmptyText);
        }

        let tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self {
            text: text.to_string(),
            priority,
            tags,
            pomodoro_count: pomodoro_count.max(1),
        })
    }

    /// Parse a comma-separated tag list ("work, home,")
    pub fn parse_tags(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// A todo item with its Pomodoro progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default = "default_pomodoro_count")]
    pub pomodoro_count: u32,
    #[serde(default)]
    pub completed_pomodoros: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_time: Option<DateTime<Utc>>,
    /// Accumulated focus time in whole minutes
    #[serde(default)]
    pub total_work_time: u32,
}

fn default_pomodoro_count() -> u32 {
    1
}

impl Task {
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            text: draft.text,
            priority: draft.priority,
            tags: draft.tags,
            pomodoro_count: draft.pomodoro_count,
            completed_pomodoros: 0,
            completed: false,
            start_time: None,
            completion_time: None,
            total_work_time: 0,
        }
    }

    /// Flip completion, stamping or clearing the completion time
    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completion_time = if self.completed { Some(now) } else { None };
    }

    /// Mark completed if not already, keeping an existing completion time
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        if !self.completed {
            self.completed = true;
            self.completion_time = Some(now);
        }
    }

    /// Stamp the start time on first use
    pub fn mark_started(&mut self, now: DateTime<Utc>) -> bool {
        if self.start_time.is_none() {
            self.start_time = Some(now);
            true
        } else {
            false
        }
    }

    /// Whether the planned number of Pomodoros has been reached
    pub fn reached_target(&self) -> bool {
        self.completed_pomodoros >= self.pomodoro_count
    }

    /// Record one finished focus session
    pub fn record_pomodoro(&mut self, work_minutes: u32) {
        self.completed_pomodoros = self.completed_pomodoros.saturating_add(1);
        self.total_work_time = self.total_work_time.saturating_add(work_minutes);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// "2/4" progress label
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.completed_pomodoros, self.pomodoro_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(text: &str) -> TaskDraft {
        TaskDraft::new(text, Priority::High, ["work", " deep ", ""], 3).unwrap()
    }

    #[test]
    fn test_draft_trims_and_coerces() {
        let d = TaskDraft::new("  Write report ", Priority::Low, Vec::<String>::new(), 0).unwrap();
        assert_eq!(d.text, "Write report");
        assert_eq!(d.pomodoro_count, 1);

        let d = draft("x");
        assert_eq!(d.tags.len(), 2);
        assert!(d.tags.contains("deep"));
    }

    #[test]
    fn test_draft_rejects_blank_text() {
        let err = TaskDraft::new("   ", Priority::Medium, Vec::<String>::new(), 1).unwrap_err();
        assert_eq!(err, DraftError::EmptyText);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(TaskDraft::parse_tags("a, b,,c "), vec!["a", "b", "c"]);
        assert!(TaskDraft::parse_tags("  ").is_empty());
    }

    #[test]
    fn test_task_from_draft_zeroes_counters() {
        let task = Task::from_draft(42, draft("Read"));
        assert_eq!(task.id, 42);
        assert_eq!(task.completed_pomodoros, 0);
        assert_eq!(task.total_work_time, 0);
        assert!(!task.completed);
        assert!(task.start_time.is_none());
        assert!(task.completion_time.is_none());
    }

    #[test]
    fn test_toggle_completed_sets_and_clears_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::from_draft(1, draft("Read"));

        task.toggle_completed(now);
        assert!(task.completed);
        assert_eq!(task.completion_time, Some(now));

        task.toggle_completed(now);
        assert!(!task.completed);
        assert!(task.completion_time.is_none());
    }

    #[test]
    fn test_mark_completed_keeps_first_time() {
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        let mut task = Task::from_draft(1, draft("Read"));

        task.mark_completed(first);
        task.mark_completed(later);
        assert_eq!(task.completion_time, Some(first));
    }

    #[test]
    fn test_mark_started_only_once() {
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::from_draft(1, draft("Read"));
        assert!(task.mark_started(first));
        assert!(!task.mark_started(Utc::now()));
        assert_eq!(task.start_time, Some(first));
    }

    #[test]
    fn test_serde_uses_camel_case_and_defaults() {
        let task = Task::from_draft(7, draft("Read"));
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"pomodoroCount\":3"));
        assert!(json.contains("\"completedPomodoros\":0"));
        assert!(json.contains("\"totalWorkTime\":0"));
        assert!(json.contains("\"startTime\":null"));

        let minimal: Task = serde_json::from_str(r#"{"id": 5, "text": "Bare"}"#).unwrap();
        assert_eq!(minimal.priority, Priority::Medium);
        assert_eq!(minimal.pomodoro_count, 1);
        assert!(minimal.tags.is_empty());
        assert!(!minimal.completed);
    }

    #[test]
    fn test_progress_label() {
        let mut task = Task::from_draft(1, draft("Read"));
        task.record_pomodoro(25);
        assert_eq!(task.progress_label(), "1/3");
        assert_eq!(task.total_work_time, 25);
        assert!(!task.reached_target());
    }

    #[test]
    fn test_record_pomodoro_saturates() {
        let mut task = Task::from_draft(1, draft("Huge"));
        task.completed_pomodoros = u32::MAX;
        task.total_work_time = u32::MAX - 10;
        task.record_pomodoro(25);
        assert_eq!(task.completed_pomodoros, u32::MAX);
        assert_eq!(task.total_work_time, u32::MAX);
    }
}
