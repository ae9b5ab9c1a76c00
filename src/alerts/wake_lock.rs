use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Program and arguments that block sleep for as long as the process lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InhibitCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl InhibitCommand {
    /// The platform's idle inhibitor, if installed
    pub fn platform() -> Option<Self> {
        #[cfg(target_os = "macos")]
        {
            which::which("caffeinate").ok().map(|program| Self {
                program,
                args: vec!["-d".to_string()],
            })
        }
        #[cfg(target_os = "linux")]
        {
            which::which("systemd-inhibit").ok().map(|program| Self {
                program,
                args: [
                    "--what=idle",
                    "--who=tomatodo",
                    "--why=Pomodoro timer running",
                    "sleep",
                    "infinity",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            })
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

/// Keeps the screen awake while the timer runs and the terminal has focus.
/// The lock is a held child process; releasing it kills the child.
#[derive(Debug)]
pub struct WakeLock {
    command: Option<InhibitCommand>,
    child: Option<Child>,
    focused: bool,
}

impl WakeLock {
    pub fn new(command: Option<InhibitCommand>) -> Self {
        Self {
            command,
            child: None,
            focused: true,
        }
    }

    pub fn is_held(&self) -> bool {
        self.child.is_some()
    }

    /// Record a focus change and reconcile
    pub fn set_focus(&mut self, focused: bool, running: bool) {
        self.focused = focused;
        self.update(running);
    }

    /// Hold the lock only while running and focused
    pub fn update(&mut self, running: bool) {
        if running && self.focused {
            self.acquire();
        } else {
            self.release();
        }
    }

    fn acquire(&mut self) {
        if self.child.is_some() {
            return;
        }
        let Some(command) = &self.command else {
            return;
        };

        let spawned = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                tracing::debug!(pid = child.id(), "wake lock acquired");
                self.child = Some(child);
            }
            Err(e) => {
                tracing::warn!(error = %e, "wake lock unavailable, not retrying");
                self.command = None;
            }
        }
    }

    pub fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::warn!(error = %e, "failed to release wake lock");
            }
            let _ = child.wait();
            tracing::debug!("wake lock released");
        }
    }
}

impl Drop for WakeLock {
    fn drop(&mut self) {
        self.release();
    }
}
