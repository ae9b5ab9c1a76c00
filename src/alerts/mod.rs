//! Best-effort side effects of the timer: sound, notifications and the
//! screen wake lock. Failures are logged and otherwise ignored.

pub mod notify;
pub mod sound;
pub mod wake_lock;

use crate::domain::TimerMode;
use crate::persistence::Settings;
use std::path::PathBuf;
use std::process::Child;
use std::thread;

pub use wake_lock::{InhibitCommand, WakeLock};

/// Alert preferences plus the wake lock, owned by the app
#[derive(Debug)]
pub struct Alerts {
    sound_enabled: bool,
    notifications_enabled: bool,
    work_sound: Option<PathBuf>,
    break_sound: Option<PathBuf>,
    pub wake_lock: WakeLock,
}

impl Alerts {
    pub fn new(settings: &Settings, wake_lock: WakeLock) -> Self {
        let mut alerts = Self {
            sound_enabled: false,
            notifications_enabled: false,
            work_sound: None,
            break_sound: None,
            wake_lock,
        };
        alerts.apply_settings(settings);
        alerts
    }

    /// Silent alerts with no wake lock
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            sound_enabled: false,
            notifications_enabled: false,
            work_sound: None,
            break_sound: None,
            wake_lock: WakeLock::new(None),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sound_enabled = settings.sound_enabled;
        self.notifications_enabled = settings.notifications_enabled && notify::is_available();
        self.work_sound = settings.work_sound.clone();
        self.break_sound = settings.break_sound.clone();
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    /// A countdown phase ended: sound and notification
    pub fn phase_finished(&self, mode: TimerMode) {
        self.chime(mode);
        if self.notifications_enabled {
            let body = match mode {
                TimerMode::Work => notify::WORK_FINISHED_BODY,
                TimerMode::Break => notify::BREAK_FINISHED_BODY,
            };
            notify::notify(notify::NOTIFICATION_TITLE, body);
        }
    }

    /// Sound only
    pub fn chime(&self, mode: TimerMode) {
        if !self.sound_enabled {
            return;
        }
        let configured = match mode {
            TimerMode::Work => self.work_sound.as_deref(),
            TimerMode::Break => self.break_sound.as_deref(),
        };
        sound::play(configured);
    }
}

/// Wait for a spawned helper off the UI thread so it doesn't linger as a zombie
fn reap(mut child: Child) {
    thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::debug!(error = %e, "failed to wait for helper process");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerts_follow_settings() {
        let mut settings = Settings::default();
        settings.sound_enabled = false;
        settings.notifications_enabled = false;
        settings.work_sound = Some(PathBuf::from("/tmp/work.wav"));

        let alerts = Alerts::new(&settings, WakeLock::new(None));
        assert!(!alerts.sound_enabled);
        assert!(!alerts.notifications_enabled());
        assert_eq!(alerts.work_sound, settings.work_sound);

        // Both disabled: nothing is spawned
        alerts.phase_finished(TimerMode::Work);
    }
}
