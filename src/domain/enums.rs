use serde::{Deserialize, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parse priority from user input like "high" or "h"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "high" | "h" => Some(Self::High),
            "medium" | "med" | "m" => Some(Self::Medium),
            "low" | "l" => Some(Self::Low),
            _ => None,
        }
    }

    /// Lowercase wire/display name
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank, higher sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Cycle to the next priority (used by the add form)
    pub fn next(&self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low => Self::High,
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::High, Priority::Medium, Priority::Low]
    }
}

/// Timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Work,
    Break,
}

impl TimerMode {
    pub fn name(&self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::Break => "Break",
        }
    }
}

/// Which way the clock runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDirection {
    /// Counts down from the configured duration to zero
    Countdown,
    /// Counts up from zero until stopped ("forward timing")
    Stopwatch,
}

impl TimerDirection {
    pub fn name(&self) -> &'static str {
        match self {
            TimerDirection::Countdown => "countdown",
            TimerDirection::Stopwatch => "stopwatch",
        }
    }
}

/// Which tasks the list pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    All,
    #[default]
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !completed,
            StatusFilter::Completed => completed,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Stats,
    Archive,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Tasks, Tab::Stats, Tab::Archive]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Stats => "Stats",
            Tab::Archive => "Archive",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Tasks => 0,
            Tab::Stats => 1,
            Tab::Archive => 2,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Tasks => Tab::Stats,
            Tab::Stats => Tab::Archive,
            Tab::Archive => Tab::Tasks,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    TimerSettings,
    ImportPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_tag() {
        assert_eq!(Priority::from_tag("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_tag("m"), Some(Priority::Medium));
        assert_eq!(Priority::from_tag(" low "), Some(Priority::Low));
        assert_eq!(Priority::from_tag("urgent"), None);
    }

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_rank_orders_high_first() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(true));
        assert!(StatusFilter::All.matches(false));
        assert!(StatusFilter::Active.matches(false));
        assert!(!StatusFilter::Active.matches(true));
        assert!(StatusFilter::Completed.matches(true));
    }
}
