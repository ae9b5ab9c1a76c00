//! Desktop notifications through the platform notifier

use std::process::{Command, Stdio};

pub const NOTIFICATION_TITLE: &str = "Pomodoro";
pub const WORK_FINISHED_BODY: &str = "Work session finished, time for a break!";
pub const BREAK_FINISHED_BODY: &str = "Break is over, back to work!";

#[cfg(target_os = "macos")]
const NOTIFIER: &str = "osascript";
#[cfg(not(target_os = "macos"))]
const NOTIFIER: &str = "notify-send";

/// Whether a notifier is installed. This plays the role of notification
/// permission: without one, notifications are skipped.
pub fn is_available() -> bool {
    which::which(NOTIFIER).is_ok()
}

/// Show a notification. Never blocks on the notifier.
pub fn notify(title: &str, body: &str) {
    let program = match which::which(NOTIFIER) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(notifier = NOTIFIER, error = %e, "notifier unavailable");
            return;
        }
    };

    let mut command = Command::new(program);
    command.args(notifier_args(title, body));
    command.stdout(Stdio::null()).stderr(Stdio::null());

    match command.spawn() {
        Ok(child) => super::reap(child),
        Err(e) => tracing::warn!(error = %e, "failed to show notification"),
    }
}

#[cfg(target_os = "macos")]
fn notifier_args(title: &str, body: &str) -> Vec<String> {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        escape(body),
        escape(title)
    );
    vec!["-e".to_string(), script]
}

#[cfg(not(target_os = "macos"))]
fn notifier_args(title: &str, body: &str) -> Vec<String> {
    vec!["--app-name=tomatodo".to_string(), title.to_string(), body.to_string()]
}

#[cfg(target_os = "macos")]
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_carry_title_and_body() {
        let args = notifier_args(NOTIFICATION_TITLE, WORK_FINISHED_BODY);
        let joined = args.join(" ");
        assert!(joined.contains(NOTIFICATION_TITLE));
        assert!(joined.contains(WORK_FINISHED_BODY));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
    }
}
