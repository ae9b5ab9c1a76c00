use crate::domain::{Task, TaskId, TimerDirection, TimerMode};
use chrono::Utc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Pause between a finished phase and the automatic start of the next one,
/// so the alert is noticed before the clock moves again
pub const AUTO_RESTART_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("pause or stop the timer before changing its settings")]
    Running,
}

/// Something the host has to act on after a timer operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The selected task changed; the store owner must apply it
    TaskUpdated(Task),
    /// A countdown phase reached zero (sound + notification)
    PhaseFinished(TimerMode),
    /// Sound only, played when a stopwatch session is stopped
    Chime(TimerMode),
    /// The task hit its planned Pomodoros
    Celebrate,
    /// The next phase starts after `AUTO_RESTART_DELAY`
    PhaseScheduled(TimerMode),
    /// A scheduled phase started running
    PhaseStarted(TimerMode),
}

#[derive(Debug, Clone, Copy)]
struct PendingPhase {
    mode: TimerMode,
    due: Instant,
}

/// Pomodoro state machine. Running/idle, work/break and countdown/stopwatch
/// are independent flags; the clock only moves through `tick`.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    running: bool,
    mode: TimerMode,
    direction: TimerDirection,
    work_minutes: u32,
    break_minutes: u32,
    remaining_secs: u64,
    elapsed_secs: u64,
    selected: Option<Task>,
    pending: Option<PendingPhase>,
}

impl TimerEngine {
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let work_minutes = work_minutes.max(1);
        Self {
            running: false,
            mode: TimerMode::Work,
            direction: TimerDirection::Countdown,
            work_minutes,
            break_minutes: break_minutes.max(1),
            remaining_secs: u64::from(work_minutes) * 60,
            elapsed_secs: 0,
            selected: None,
            pending: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn direction(&self) -> TimerDirection {
        self.direction
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Seconds to show on the clock face
    pub fn display_seconds(&self) -> u64 {
        match self.direction {
            TimerDirection::Countdown => self.remaining_secs,
            TimerDirection::Stopwatch => self.elapsed_secs,
        }
    }

    /// Full length of a phase in seconds
    pub fn phase_secs(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Work => u64::from(self.work_minutes) * 60,
            TimerMode::Break => u64::from(self.break_minutes) * 60,
        }
    }

    /// Phase waiting for its auto-restart, if any
    pub fn pending_mode(&self) -> Option<TimerMode> {
        self.pending.map(|p| p.mode)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.selected.as_ref().map(|t| t.id)
    }

    /// Account future sessions against this task
    pub fn select(&mut self, task: Task) {
        self.selected = Some(task);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Refresh the snapshot after the store changed. A task that is no
    /// longer active is dropped.
    pub fn sync_selected(&mut self, current: Option<&Task>) {
        match current {
            Some(task) => self.selected = Some(task.clone()),
            None => {
                if let Some(old) = self.selected.take() {
                    tracing::debug!(id = old.id, "selected task left the active list");
                }
            }
        }
    }

    /// Start or resume. Stamps the selected task's start time on first use.
    pub fn start(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        if self.running {
            return events;
        }

        self.pending = None;
        if self.direction == TimerDirection::Countdown && self.remaining_secs == 0 {
            self.remaining_secs = self.phase_secs(self.mode);
        }
        self.running = true;

        if let Some(task) = self.selected.as_mut() {
            if task.mark_started(Utc::now()) {
                events.push(TimerEvent::TaskUpdated(task.clone()));
            }
        }

        tracing::debug!(mode = self.mode.name(), "timer started");
        events
    }

    /// Stop the clock, keeping the time on it
    pub fn pause(&mut self) {
        self.running = false;
        self.pending = None;
    }

    /// Stop and settle. A stopwatch session with a task counts as one
    /// Pomodoro; otherwise the clock resets to a fresh work phase.
    pub fn stop(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        self.running = false;
        self.pending = None;

        if self.direction == TimerDirection::Stopwatch {
            if let Some(task) = self.selected.as_mut() {
                let minutes = u32::try_from(self.elapsed_secs / 60).unwrap_or(u32::MAX);
                task.record_pomodoro(minutes);

                // Completion follows the count on every stop, even for a
                // task that was completed by hand.
                if task.reached_target() {
                    task.mark_completed(Utc::now());
                } else {
                    task.completed = false;
                    task.completion_time = None;
                }

                events.push(TimerEvent::Chime(TimerMode::Work));
                events.push(TimerEvent::TaskUpdated(task.clone()));
                events.push(TimerEvent::Celebrate);
                self.elapsed_secs = 0;
                return events;
            }
        }

        self.mode = TimerMode::Work;
        self.remaining_secs = self.phase_secs(TimerMode::Work);
        self.elapsed_secs = 0;
        events
    }

    /// One second passed
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.running {
            return Vec::new();
        }

        match self.direction {
            TimerDirection::Stopwatch => {
                self.elapsed_secs += 1;
                Vec::new()
            }
            TimerDirection::Countdown => {
                if self.remaining_secs == 0 {
                    return Vec::new();
                }
                self.remaining_secs -= 1;
                if self.remaining_secs == 0 {
                    self.complete_phase()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Start a scheduled phase once its delay has passed
    pub fn fire_due(&mut self, now: Instant) -> Vec<TimerEvent> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                self.mode = pending.mode;
                self.remaining_secs = self.phase_secs(pending.mode);
                self.running = true;
                tracing::info!(mode = pending.mode.name(), "next phase started");
                vec![TimerEvent::PhaseStarted(pending.mode)]
            }
            _ => Vec::new(),
        }
    }

    /// Change durations. Values below one minute become one.
    pub fn configure(&mut self, work_minutes: u32, break_minutes: u32) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::Running);
        }
        self.work_minutes = work_minutes.max(1);
        self.break_minutes = break_minutes.max(1);
        if self.direction == TimerDirection::Countdown {
            self.remaining_secs = self.phase_secs(self.mode);
        }
        Ok(())
    }

    /// Switch between countdown and stopwatch, resetting the clock
    pub fn set_direction(&mut self, direction: TimerDirection) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::Running);
        }
        self.direction = direction;
        self.pending = None;
        self.mode = TimerMode::Work;
        self.elapsed_secs = 0;
        self.remaining_secs = self.phase_secs(TimerMode::Work);
        Ok(())
    }

    pub fn toggle_direction(&mut self) -> Result<TimerDirection, TimerError> {
        let next = match self.direction {
            TimerDirection::Countdown => TimerDirection::Stopwatch,
            TimerDirection::Stopwatch => TimerDirection::Countdown,
        };
        self.set_direction(next)?;
        Ok(next)
    }

    fn complete_phase(&mut self) -> Vec<TimerEvent> {
        self.running = false;
        let finished = self.mode;
        let work_minutes = self.work_minutes;

        // Without a task the clock just stops at zero
        let Some(task) = self.selected.as_mut() else {
            tracing::info!(mode = finished.name(), "phase finished with no task selected");
            return Vec::new();
        };

        let mut events = vec![TimerEvent::PhaseFinished(finished)];
        tracing::info!(mode = finished.name(), "phase finished");

        match finished {
            TimerMode::Work => {
                task.record_pomodoro(work_minutes);
                if task.reached_target() {
                    task.mark_completed(Utc::now());
                }
                events.push(TimerEvent::TaskUpdated(task.clone()));
                // The break is taken even after the final session
                events.push(self.schedule(TimerMode::Break));
            }
            TimerMode::Break => {
                if task.reached_target() {
                    if !task.completed {
                        task.mark_completed(Utc::now());
                        events.push(TimerEvent::TaskUpdated(task.clone()));
                    }
                    events.push(TimerEvent::Celebrate);
                    self.mode = TimerMode::Work;
                    self.remaining_secs = self.phase_secs(TimerMode::Work);
                } else {
                    events.push(self.schedule(TimerMode::Work));
                }
            }
        }
        events
    }

    fn schedule(&mut self, mode: TimerMode) -> TimerEvent {
        self.pending = Some(PendingPhase {
            mode,
            due: Instant::now() + AUTO_RESTART_DELAY,
        });
        TimerEvent::PhaseScheduled(mode)
    }
}
