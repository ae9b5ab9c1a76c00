pub mod enums;
pub mod task;
pub mod views;

pub use enums::{Priority, StatusFilter, Tab, TimerDirection, TimerMode, UiMode};
pub use task::{Task, TaskDraft, TaskId};
pub use views::{cycle_option, format_clock, format_minutes, status_badge, visible_tasks, TaskFilter};
