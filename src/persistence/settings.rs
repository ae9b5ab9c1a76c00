use super::storage::{load_json, save_json, KeyValueStore, SETTINGS_KEY};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_PRIMARY_COLOR: &str = "#2196f3";
pub const DEFAULT_SECONDARY_COLOR: &str = "#f50057";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("'{0}' is not a #rrggbb colour")]
    InvalidColor(String),
}

/// Cosmetic and audio preferences, stored under the `settings` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    pub primary_color: String,
    pub secondary_color: String,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    /// Audio file played when a work session ends
    pub work_sound: Option<PathBuf>,
    /// Audio file played when a break ends
    pub break_sound: Option<PathBuf>,
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            sound_enabled: true,
            notifications_enabled: true,
            work_sound: None,
            break_sound: None,
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl Settings {
    pub fn set_primary_color(&mut self, value: &str) -> Result<(), SettingsError> {
        self.primary_color = normalize_color(value)?;
        Ok(())
    }

    pub fn set_secondary_color(&mut self, value: &str) -> Result<(), SettingsError> {
        self.secondary_color = normalize_color(value)?;
        Ok(())
    }

    /// Durations below one minute are coerced to one
    pub fn set_durations(&mut self, work_minutes: u32, break_minutes: u32) {
        self.work_minutes = work_minutes.max(1);
        self.break_minutes = break_minutes.max(1);
    }

    /// Primary colour as RGB, falling back to the default when the stored value is bad
    pub fn primary_rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(&self.primary_color)
            .or_else(|| parse_hex_color(DEFAULT_PRIMARY_COLOR))
            .unwrap_or((33, 150, 243))
    }

    pub fn secondary_rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(&self.secondary_color)
            .or_else(|| parse_hex_color(DEFAULT_SECONDARY_COLOR))
            .unwrap_or((245, 0, 87))
    }
}

/// Parse "#rrggbb" (leading '#' optional)
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn normalize_color(value: &str) -> Result<String, SettingsError> {
    let (r, g, b) = parse_hex_color(value).ok_or_else(|| SettingsError::InvalidColor(value.to_string()))?;
    Ok(format!("#{:02x}{:02x}{:02x}", r, g, b))
}

/// Parse a minutes or count input, coercing anything invalid or below one to one
pub fn coerce_positive(input: &str) -> u32 {
    input.trim().parse::<u32>().unwrap_or(1).max(1)
}

/// Load settings; a missing key yields defaults
pub fn load_settings(store: &dyn KeyValueStore) -> Result<Settings> {
    Ok(load_json(store, SETTINGS_KEY)?.unwrap_or_default())
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<()> {
    save_json(store, SETTINGS_KEY, settings)
}
