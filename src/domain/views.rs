use super::enums::{Priority, StatusFilter};
use super::task::Task;

/// List-pane selectors: optional tag, optional priority, completion status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub tag: Option<String>,
    pub priority: Option<Priority>,
    pub status: StatusFilter,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(tag) = &self.tag {
            if !task.has_tag(tag) {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        self.status.matches(task.completed)
    }
}

/// Filter tasks and sort them high priority first.
/// The sort is stable, so insertion order is kept within a priority.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let mut rows: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    rows.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    rows
}

/// Step a selector through `None -> options[0] -> ... -> None`
pub fn cycle_option<T: Clone + PartialEq>(current: &Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().cloned(),
        Some(value) => {
            let pos = options.iter().position(|o| o == value);
            match pos {
                Some(i) if i + 1 < options.len() => Some(options[i + 1].clone()),
                _ => None,
            }
        }
    }
}

/// Format seconds as "MM:SS" (minutes are not wrapped at 60)
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format minutes as "Xh Ym" (omits 0 values)
pub fn format_minutes(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}

/// Status badge for list rows
pub fn status_badge(task: &Task) -> &'static str {
    if task.completed {
        "[x]"
    } else if task.start_time.is_some() {
        "[~]"
    } else {
        "[ ]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;

    fn task(id: u64, text: &str, priority: Priority, tags: &[&str], completed: bool) -> Task {
        let draft = TaskDraft::new(text, priority, tags.iter().copied(), 1).unwrap();
        let mut task = Task::from_draft(id, draft);
        task.completed = completed;
        task
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "low one", Priority::Low, &["home"], false),
            task(2, "high one", Priority::High, &["work"], false),
            task(3, "medium one", Priority::Medium, &["work"], true),
            task(4, "high two", Priority::High, &[], false),
        ]
    }

    #[test]
    fn test_visible_tasks_sorted_by_priority_stable() {
        let tasks = sample();
        let filter = TaskFilter {
            status: StatusFilter::All,
            ..Default::default()
        };
        let ids: Vec<u64> = visible_tasks(&tasks, &filter).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_visible_tasks_default_hides_completed() {
        let tasks = sample();
        let ids: Vec<u64> = visible_tasks(&tasks, &TaskFilter::default())
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1]);
    }

    #[test]
    fn test_visible_tasks_by_tag_and_priority() {
        let tasks = sample();
        let filter = TaskFilter {
            tag: Some("work".to_string()),
            priority: Some(Priority::Medium),
            status: StatusFilter::All,
        };
        let ids: Vec<u64> = visible_tasks(&tasks, &filter).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_cycle_option() {
        let options = vec!["a".to_string(), "b".to_string()];
        let mut current = None;
        current = cycle_option(&current, &options);
        assert_eq!(current.as_deref(), Some("a"));
        current = cycle_option(&current, &options);
        assert_eq!(current.as_deref(), Some("b"));
        current = cycle_option(&current, &options);
        assert_eq!(current, None);

        let stale = Some("gone".to_string());
        assert_eq!(cycle_option(&stale, &options), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(100 * 60 + 5), "100:05");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(90), "1h 30m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(0), "0m");
    }
}
