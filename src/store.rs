//! Active and archived task lists, persisted on every change.

use crate::domain::{visible_tasks, Task, TaskDraft, TaskFilter, TaskId};
use crate::persistence::storage::{load_json, save_json, SharedStore, ARCHIVED_KEY, TODOS_KEY};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Owner of the two task lists. Every mutation writes through to storage
/// before returning.
pub struct TaskStore {
    active: Vec<Task>,
    archived: Vec<Task>,
    storage: SharedStore,
}

impl TaskStore {
    /// Load both lists; missing keys start empty
    pub fn load(storage: SharedStore) -> Result<Self> {
        let active = load_json(storage.as_ref(), TODOS_KEY)
            .context("Failed to load active tasks")?
            .unwrap_or_default();
        let archived = load_json(storage.as_ref(), ARCHIVED_KEY)
            .context("Failed to load archived tasks")?
            .unwrap_or_default();

        Ok(Self {
            active,
            archived,
            storage,
        })
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    pub fn archived(&self) -> &[Task] {
        &self.archived
    }

    /// Active tasks followed by archived tasks
    pub fn all(&self) -> Vec<Task> {
        self.active.iter().chain(self.archived.iter()).cloned().collect()
    }

    /// Look up an active task
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.active.iter().find(|t| t.id == id)
    }

    /// Unique tags across active tasks, sorted
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&String> = self.active.iter().flat_map(|t| t.tags.iter()).collect();
        tags.into_iter().cloned().collect()
    }

    /// Active tasks matching the filter, high priority first
    pub fn visible(&self, filter: &TaskFilter) -> Vec<&Task> {
        visible_tasks(&self.active, filter)
    }

    /// Append a new task and return its id
    pub fn add(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<TaskId> {
        let id = self.next_id(now);
        self.active.push(Task::from_draft(id, draft));
        self.persist_active()?;
        tracing::debug!(id, "task added");
        Ok(id)
    }

    /// Flip completion of an active task. Returns false for an unknown id.
    pub fn toggle(&mut self, id: TaskId, now: DateTime<Utc>) -> Result<bool> {
        let Some(task) = self.active.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.toggle_completed(now);
        self.persist_active()?;
        Ok(true)
    }

    /// Remove an active task. Returns false for an unknown id.
    pub fn delete(&mut self, id: TaskId) -> Result<bool> {
        let before = self.active.len();
        self.active.retain(|t| t.id != id);
        if self.active.len() == before {
            return Ok(false);
        }
        self.persist_active()?;
        Ok(true)
    }

    /// Move every completed active task to the archive. Returns how many moved.
    /// Both lists are saved before the move is applied in memory; on failure
    /// nothing changes.
    pub fn archive(&mut self) -> Result<usize> {
        let (done, remaining): (Vec<Task>, Vec<Task>) =
            self.active.iter().cloned().partition(|t| t.completed);
        if done.is_empty() {
            return Ok(0);
        }

        let moved = done.len();
        let mut archived = self.archived.clone();
        archived.extend(done);

        self.write_archived(&archived)?;
        if let Err(e) = self.write_active(&remaining) {
            // Undo the archive write so no task is stored in both lists
            if let Err(restore) = self.write_archived(&self.archived) {
                tracing::warn!(error = %restore, "failed to restore archived tasks");
            }
            return Err(e);
        }

        self.active = remaining;
        self.archived = archived;
        tracing::info!(moved, "archived completed tasks");
        Ok(moved)
    }

    /// Replace an active task with an updated copy (timer progress).
    /// Returns false if the task is no longer active.
    pub fn apply(&mut self, updated: Task) -> Result<bool> {
        let Some(slot) = self.active.iter_mut().find(|t| t.id == updated.id) else {
            tracing::debug!(id = updated.id, "dropping update for inactive task");
            return Ok(false);
        };
        *slot = updated;
        self.persist_active()?;
        Ok(true)
    }

    /// Replace the active list wholesale (import)
    pub fn replace_active(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.active = tasks;
        self.persist_active()
    }

    /// Creation timestamp in ms, bumped past any id already in use
    fn next_id(&self, now: DateTime<Utc>) -> TaskId {
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let max_used = self
            .active
            .iter()
            .chain(self.archived.iter())
            .map(|t| t.id)
            .max();
        match max_used {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        }
    }

    fn persist_active(&self) -> Result<()> {
        self.write_active(&self.active)
    }

    fn write_active(&self, tasks: &[Task]) -> Result<()> {
        save_json(self.storage.as_ref(), TODOS_KEY, tasks).context("Failed to save tasks")
    }

    fn write_archived(&self, tasks: &[Task]) -> Result<()> {
        save_json(self.storage.as_ref(), ARCHIVED_KEY, tasks).context("Failed to save archived tasks")
    }
}
