use crate::domain::{Priority, Task};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

/// Tag selector for statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagSelector {
    #[default]
    All,
    /// Only tasks without any tag
    Untagged,
    Tag(String),
}

impl TagSelector {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TagSelector::All => true,
            TagSelector::Untagged => task.tags.is_empty(),
            TagSelector::Tag(tag) => task.has_tag(tag),
        }
    }

    pub fn label(&self) -> String {
        match self {
            TagSelector::All => "all tags".to_string(),
            TagSelector::Untagged => "untagged".to_string(),
            TagSelector::Tag(tag) => format!("#{}", tag),
        }
    }

    /// Step through `All -> Untagged -> tags[0] -> ... -> All`
    pub fn next(&self, tags: &[String]) -> Self {
        match self {
            TagSelector::All => TagSelector::Untagged,
            TagSelector::Untagged => tags.first().cloned().map(TagSelector::Tag).unwrap_or_default(),
            TagSelector::Tag(current) => match tags.iter().position(|t| t == current) {
                Some(i) if i + 1 < tags.len() => TagSelector::Tag(tags[i + 1].clone()),
                _ => TagSelector::All,
            },
        }
    }
}

/// Trend window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn name(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            TimeRange::Week => TimeRange::Month,
            TimeRange::Month => TimeRange::Year,
            TimeRange::Year => TimeRange::Week,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "week" => Some(TimeRange::Week),
            "month" => Some(TimeRange::Month),
            "year" => Some(TimeRange::Year),
            _ => None,
        }
    }
}

/// Selection applied before any statistic is computed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    pub tag: TagSelector,
    pub priority: Option<Priority>,
}

impl StatsFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.tag.matches(task) && self.priority.map_or(true, |p| task.priority == p)
    }
}

/// Completed vs pending tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionStats {
    pub completed: usize,
    pub pending: usize,
}

impl CompletionStats {
    pub fn total(&self) -> usize {
        self.completed + self.pending
    }

    /// Completed share in [0, 1]
    pub fn ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.completed as f64 / self.total() as f64
        }
    }
}

/// Planned vs completed Pomodoros, over completed tasks only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PomodoroStats {
    pub planned: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendBucket {
    pub label: String,
    pub completed: usize,
    pub work_minutes: u64,
}

/// Everything the stats view and the report show
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub completion: CompletionStats,
    pub pomodoros: PomodoroStats,
    pub work_time: Vec<(String, u32)>,
    pub trend: Vec<TrendBucket>,
}

pub fn filter_tasks<'a, I>(tasks: I, filter: &StatsFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| filter.matches(t)).collect()
}

pub fn calculate_completion_stats(tasks: &[&Task]) -> CompletionStats {
    let completed = tasks.iter().filter(|t| t.completed).count();
    CompletionStats {
        completed,
        pending: tasks.len() - completed,
    }
}

pub fn calculate_pomodoro_stats(tasks: &[&Task]) -> PomodoroStats {
    tasks
        .iter()
        .filter(|t| t.completed)
        .fold(PomodoroStats::default(), |acc, t| PomodoroStats {
            planned: acc.planned + u64::from(t.pomodoro_count),
            completed: acc.completed + u64::from(t.completed_pomodoros),
        })
}

/// `(text, minutes)` for every task with recorded focus time
pub fn calculate_work_time(tasks: &[&Task]) -> Vec<(String, u32)> {
    tasks
        .iter()
        .filter(|t| t.total_work_time > 0)
        .map(|t| (t.text.clone(), t.total_work_time))
        .collect()
}

/// Local date a task is charted on: completion, else start, else today
fn trend_date(task: &Task, now: DateTime<Local>) -> NaiveDate {
    task.completion_time
        .or(task.start_time)
        .map(|t| t.with_timezone(&Local).date_naive())
        .unwrap_or_else(|| now.date_naive())
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Buckets ending today, oldest first. Week and Month are daily, Year is monthly.
pub fn calculate_trend(tasks: &[&Task], range: TimeRange, now: DateTime<Local>) -> Vec<TrendBucket> {
    let today = now.date_naive();
    let dated: Vec<(NaiveDate, &Task)> = tasks.iter().map(|t| (trend_date(t, now), *t)).collect();

    let collect = |label: String, hits: Vec<&Task>| TrendBucket {
        label,
        completed: hits.iter().filter(|t| t.completed).count(),
        work_minutes: hits.iter().map(|t| u64::from(t.total_work_time)).sum(),
    };

    match range {
        TimeRange::Week | TimeRange::Month => {
            let days = if range == TimeRange::Week { 7 } else { 30 };
            (0..days)
                .rev()
                .map(|offset| {
                    let day = today - Duration::days(offset);
                    let hits = dated.iter().filter(|(d, _)| *d == day).map(|(_, t)| *t).collect();
                    collect(day.format("%m-%d").to_string(), hits)
                })
                .collect()
        }
        TimeRange::Year => {
            let current = month_index(today);
            (0..12)
                .rev()
                .map(|offset| {
                    let index = current - offset;
                    let hits = dated
                        .iter()
                        .filter(|(d, _)| month_index(*d) == index)
                        .map(|(_, t)| *t)
                        .collect();
                    let label = format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1);
                    collect(label, hits)
                })
                .collect()
        }
    }
}

/// Compute every statistic over active and archived tasks
pub fn calculate_statistics(
    active: &[Task],
    archived: &[Task],
    filter: &StatsFilter,
    range: TimeRange,
    now: DateTime<Local>,
) -> Statistics {
    let tasks = filter_tasks(active.iter().chain(archived.iter()), filter);
    Statistics {
        completion: calculate_completion_stats(&tasks),
        pomodoros: calculate_pomodoro_stats(&tasks),
        work_time: calculate_work_time(&tasks),
        trend: calculate_trend(&tasks, range, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn local(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Local.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap().with_timezone(&Utc)
    }

    fn task(id: u64, text: &str, priority: Priority, tags: &[&str]) -> Task {
        Task::from_draft(id, TaskDraft::new(text, priority, tags.iter().copied(), 2).unwrap())
    }

    fn sample() -> (Vec<Task>, Vec<Task>) {
        let mut write = task(1, "Write", Priority::High, &["work"]);
        write.completed_pomodoros = 2;
        write.total_work_time = 50;
        write.completed = true;
        write.completion_time = Some(local(2024, 3, 10));

        let mut read = task(2, "Read", Priority::Low, &[]);
        read.completed_pomodoros = 1;
        read.total_work_time = 25;
        read.start_time = Some(local(2024, 3, 8));

        let plan = task(3, "Plan", Priority::Medium, &["work"]);

        let mut old = task(4, "Old", Priority::High, &["home"]);
        old.pomodoro_count = 3;
        old.completed_pomodoros = 1;
        old.total_work_time = 30;
        old.completed = true;
        old.completion_time = Some(local(2023, 12, 5));

        (vec![write, read, plan], vec![old])
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let mut a = task(1, "A", Priority::High, &[]);
        let mut b = task(2, "B", Priority::High, &[]);
        for t in [&mut a, &mut b] {
            t.pomodoro_count = u32::MAX;
            t.completed_pomodoros = u32::MAX;
            t.total_work_time = u32::MAX;
            t.completed = true;
            t.completion_time = Some(local(2024, 3, 10));
        }

        let stats = calculate_statistics(&[a, b], &[], &StatsFilter::default(), TimeRange::Week, now());
        let expected = 2 * u64::from(u32::MAX);
        assert_eq!(stats.pomodoros, PomodoroStats { planned: expected, completed: expected });
        assert_eq!(stats.trend[6].work_minutes, expected);
    }

    #[test]
    fn test_tag_selector() {
        let tagged = task(1, "A", Priority::Medium, &["work"]);
        let untagged = task(2, "B", Priority::Medium, &[]);

        assert!(TagSelector::All.matches(&untagged));
        assert!(TagSelector::Untagged.matches(&untagged));
        assert!(!TagSelector::Untagged.matches(&tagged));
        assert!(TagSelector::Tag("work".into()).matches(&tagged));
        assert!(!TagSelector::Tag("work".into()).matches(&untagged));
    }

    #[test]
    fn test_tag_selector_cycle() {
        let tags = vec!["home".to_string(), "work".to_string()];
        let mut selector = TagSelector::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            selector = selector.next(&tags);
            seen.push(selector.clone());
        }
        assert_eq!(
            seen,
            vec![
                TagSelector::Untagged,
                TagSelector::Tag("home".into()),
                TagSelector::Tag("work".into()),
                TagSelector::All,
            ]
        );
        assert_eq!(TagSelector::Untagged.next(&[]), TagSelector::All);
    }

    #[test]
    fn test_completion_and_pomodoros_over_all_lists() {
        let (active, archived) = sample();
        let stats = calculate_statistics(&active, &archived, &StatsFilter::default(), TimeRange::Week, now());

        assert_eq!(stats.completion, CompletionStats { completed: 2, pending: 2 });
        assert_eq!(stats.completion.ratio(), 0.5);
        // Only completed tasks count: Write (2/2) and Old (1/3)
        assert_eq!(stats.pomodoros, PomodoroStats { planned: 5, completed: 3 });
        assert_eq!(
            stats.work_time,
            vec![("Write".to_string(), 50), ("Read".to_string(), 25), ("Old".to_string(), 30)]
        );
    }

    #[test]
    fn test_filters_narrow_statistics() {
        let (active, archived) = sample();
        let filter = StatsFilter {
            tag: TagSelector::Tag("work".into()),
            priority: None,
        };
        let stats = calculate_statistics(&active, &archived, &filter, TimeRange::Week, now());
        assert_eq!(stats.completion, CompletionStats { completed: 1, pending: 1 });

        let filter = StatsFilter {
            tag: TagSelector::Untagged,
            priority: Some(Priority::Low),
        };
        let stats = calculate_statistics(&active, &archived, &filter, TimeRange::Week, now());
        assert_eq!(stats.completion.total(), 1);
        assert_eq!(stats.pomodoros, PomodoroStats::default());
    }

    #[test]
    fn test_empty_ratio() {
        assert_eq!(CompletionStats::default().ratio(), 0.0);
    }

    #[test]
    fn test_week_trend_buckets_by_date() {
        let (active, archived) = sample();
        let stats = calculate_statistics(&active, &archived, &StatsFilter::default(), TimeRange::Week, now());
        let trend = stats.trend;

        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].label, "03-04");
        assert_eq!(trend[6].label, "03-10");

        // Today: Write (completed) and Plan (no dates, charted today)
        assert_eq!(trend[6].completed, 1);
        assert_eq!(trend[6].work_minutes, 50);
        // Read started on the 8th
        assert_eq!(trend[4].label, "03-08");
        assert_eq!(trend[4].completed, 0);
        assert_eq!(trend[4].work_minutes, 25);
        // Old is outside the window
        assert_eq!(trend.iter().map(|b| b.completed).sum::<usize>(), 1);
    }

    #[test]
    fn test_month_trend_has_thirty_days() {
        let trend = calculate_trend(&[], TimeRange::Month, now());
        assert_eq!(trend.len(), 30);
        assert_eq!(trend[0].label, "02-10");
        assert_eq!(trend[29].label, "03-10");
    }

    #[test]
    fn test_year_trend_buckets_by_month() {
        let (active, archived) = sample();
        let stats = calculate_statistics(&active, &archived, &StatsFilter::default(), TimeRange::Year, now());
        let trend = stats.trend;

        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].label, "2023-04");
        assert_eq!(trend[11].label, "2024-03");

        let december = trend.iter().find(|b| b.label == "2023-12").unwrap();
        assert_eq!(december.completed, 1);
        assert_eq!(december.work_minutes, 30);
        assert_eq!(trend[11].completed, 1);
        assert_eq!(trend[11].work_minutes, 75);
    }

    #[test]
    fn test_time_range_cycle_and_parse() {
        assert_eq!(TimeRange::Week.next(), TimeRange::Month);
        assert_eq!(TimeRange::Year.next(), TimeRange::Week);
        assert_eq!(TimeRange::parse("Month"), Some(TimeRange::Month));
        assert_eq!(TimeRange::parse("decade"), None);
    }
}
