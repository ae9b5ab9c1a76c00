use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[cfg(target_os = "macos")]
const PLAYERS: &[&str] = &["afplay"];
#[cfg(not(target_os = "macos"))]
const PLAYERS: &[&str] = &["paplay", "aplay"];

#[cfg(target_os = "macos")]
const SYSTEM_SOUNDS: &[&str] = &["/System/Library/Sounds/Glass.aiff"];
#[cfg(not(target_os = "macos"))]
const SYSTEM_SOUNDS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/alsa/Front_Center.wav",
];

/// Pick the file to play: the configured one if it exists, else a system sound
pub fn resolve_sound(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        tracing::warn!(path = %path.display(), "configured sound file not found");
    }
    SYSTEM_SOUNDS.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Play a sound in the background, falling back to the terminal bell
pub fn play(configured: Option<&Path>) {
    let Some(file) = resolve_sound(configured) else {
        bell();
        return;
    };
    let Some(player) = PLAYERS.iter().find_map(|p| which::which(p).ok()) else {
        tracing::debug!("no audio player found");
        bell();
        return;
    };

    let spawned = Command::new(&player)
        .arg(&file)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(child) => super::reap(child),
        Err(e) => {
            tracing::warn!(player = %player.display(), error = %e, "failed to play sound");
            bell();
        }
    }
}

fn bell() {
    let mut stdout = io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        tracing::warn!(error = %e, "failed to ring terminal bell");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_existing_configured_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("ding.wav");
        std::fs::write(&file, b"RIFF").unwrap();
        assert_eq!(resolve_sound(Some(&file)), Some(file));
    }

    #[test]
    fn test_resolve_skips_missing_configured_file() {
        let missing = Path::new("/definitely/not/here.wav");
        assert_ne!(resolve_sound(Some(missing)).as_deref(), Some(missing));
    }
}
