use crate::domain::{format_minutes, status_badge, Task};
use crate::report::stats::{calculate_statistics, StatsFilter, Statistics, TimeRange};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn tags_suffix(task: &Task) -> String {
    if task.tags.is_empty() {
        String::new()
    } else {
        let tags: Vec<&str> = task.tags.iter().map(String::as_str).collect();
        format!(" ({})", tags.join(", "))
    }
}

fn push_task_line(report: &mut String, task: &Task) {
    report.push_str(&format!(
        "- {} **{}** [{}]{}\n",
        status_badge(task),
        task.text,
        task.priority.to_tag(),
        tags_suffix(task)
    ));
    report.push_str(&format!(
        "  - Pomodoros: {} | Focus: {}\n",
        task.progress_label(),
        format_minutes(u64::from(task.total_work_time))
    ));
}

/// Render statistics as a markdown document
pub fn render_report(
    active: &[Task],
    archived: &[Task],
    filter: &StatsFilter,
    range: TimeRange,
    now: DateTime<Local>,
) -> String {
    let Statistics {
        completion,
        pomodoros,
        work_time,
        trend,
    } = calculate_statistics(active, archived, filter, range, now);

    let mut report = String::new();

    report.push_str(&format!("# Pomodoro Report - {}\n\n", now.format("%Y-%m-%d")));

    let priority = filter.priority.map_or("all", |p| p.to_tag());
    report.push_str(&format!(
        "_Filter: {}, priority {}, {} trend_\n\n",
        filter.tag.label(),
        priority,
        range.name()
    ));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Tasks:** {} (Completed: {}, Pending: {})\n",
        completion.total(),
        completion.completed,
        completion.pending
    ));
    report.push_str(&format!(
        "- **Completion Rate:** {}\n",
        format_percent(completion.ratio() * 100.0)
    ));
    report.push_str(&format!(
        "- **Pomodoros (completed tasks):** {} done / {} planned\n",
        pomodoros.completed, pomodoros.planned
    ));
    let total_minutes: u64 = work_time.iter().map(|(_, m)| u64::from(*m)).sum();
    report.push_str(&format!("- **Total Focus Time:** {}\n\n", format_minutes(total_minutes)));

    if !work_time.is_empty() {
        report.push_str("## Focus Time by Task\n\n");
        let mut sorted = work_time.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        for (text, minutes) in sorted {
            let share = if total_minutes > 0 {
                f64::from(minutes) / total_minutes as f64 * 100.0
            } else {
                0.0
            };
            report.push_str(&format!(
                "- **{}:** {} ({})\n",
                text,
                format_minutes(u64::from(minutes)),
                format_percent(share)
            ));
        }
        report.push('\n');
    }

    report.push_str("## Trend\n\n");
    report.push_str("| Period | Completed | Focus |\n");
    report.push_str("|---|---|---|\n");
    for bucket in &trend {
        report.push_str(&format!(
            "| {} | {} | {} |\n",
            bucket.label,
            bucket.completed,
            format_minutes(bucket.work_minutes)
        ));
    }
    report.push('\n');

    // Tasks Breakdown Section
    let matching_active: Vec<&Task> = active.iter().filter(|t| filter.matches(t)).collect();
    let matching_archived: Vec<&Task> = archived.iter().filter(|t| filter.matches(t)).collect();

    if !matching_active.is_empty() || !matching_archived.is_empty() {
        report.push_str("## Tasks\n\n");
    }
    if !matching_active.is_empty() {
        report.push_str("### Active List\n\n");
        for task in matching_active {
            push_task_line(&mut report, task);
        }
        report.push('\n');
    }
    if !matching_archived.is_empty() {
        report.push_str("### Archived\n\n");
        for task in matching_archived {
            push_task_line(&mut report, task);
        }
        report.push('\n');
    }

    report
}

/// Default report location inside the data directory
pub fn default_report_path(data_dir: &Path, now: DateTime<Local>) -> PathBuf {
    data_dir.join(format!("report-{}.md", now.format("%Y-%m-%d")))
}

/// Write a rendered report to disk
pub fn write_report(report: &str, output: &Path) -> Result<()> {
    fs::write(output, report).with_context(|| format!("Failed to write report: {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskDraft};
    use crate::report::stats::TagSelector;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn tasks() -> Vec<Task> {
        let mut done = Task::from_draft(1, TaskDraft::new("Write", Priority::High, ["work"], 2).unwrap());
        done.completed_pomodoros = 2;
        done.total_work_time = 90;
        done.completed = true;
        done.completion_time = Some(now().with_timezone(&chrono::Utc));

        let open = Task::from_draft(2, TaskDraft::new("Shop", Priority::Low, Vec::<String>::new(), 1).unwrap());
        vec![done, open]
    }

    #[test]
    fn test_report_sections() {
        let report = render_report(&tasks(), &[], &StatsFilter::default(), TimeRange::Week, now());

        assert!(report.starts_with("# Pomodoro Report - 2024-03-10"));
        assert!(report.contains("- **Tasks:** 2 (Completed: 1, Pending: 1)"));
        assert!(report.contains("- **Completion Rate:** 50.0%"));
        assert!(report.contains("2 done / 2 planned"));
        assert!(report.contains("- **Write:** 1h 30m (100.0%)"));
        assert!(report.contains("| 03-10 | 1 | 1h 30m |"));
        assert!(report.contains("- [x] **Write** [high] (work)"));
        assert!(report.contains("- [ ] **Shop** [low]"));
        assert!(!report.contains("### Archived"));
    }

    #[test]
    fn test_report_respects_filter() {
        let filter = StatsFilter {
            tag: TagSelector::Untagged,
            priority: None,
        };
        let report = render_report(&tasks(), &[], &filter, TimeRange::Year, now());
        assert!(report.contains("_Filter: untagged, priority all, year trend_"));
        assert!(!report.contains("**Write**"));
        assert!(!report.contains("## Focus Time by Task"));
    }

    #[test]
    fn test_write_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = default_report_path(temp_dir.path(), now());
        assert!(path.ends_with("report-2024-03-10.md"));

        write_report("# hi\n", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# hi\n");
    }
}
