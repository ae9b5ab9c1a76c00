use crate::app::AppState;
use crate::domain::{format_minutes, Task};
use crate::ui::styles::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Create a line for an archived task
fn create_archived_line<'a>(task: &'a Task, theme: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled("✓ ", theme.done_style()),
        Span::raw(task.text.as_str()),
        Span::raw("  "),
        Span::styled(
            format!(
                "(🍅 {} · {})",
                task.progress_label(),
                format_minutes(u64::from(task.total_work_time))
            ),
            theme.done_style(),
        ),
    ];
    if let Some(done_at) = task.completion_time {
        let local = done_at.with_timezone(&chrono::Local);
        spans.push(Span::styled(
            format!("  {}", local.format("%Y-%m-%d %H:%M")),
            theme.hint_style(),
        ));
    }
    Line::from(spans)
}

/// Render the archived tasks pane
pub fn render_archive_pane(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let archived = app.store.archived();
    let count = archived.len();

    let items: Vec<ListItem> = archived
        .iter()
        .skip(app.archive_scroll)
        .map(|task| ListItem::new(create_archived_line(task, theme)))
        .collect();

    let title = if count == 0 {
        " Archive (0) ".to_string()
    } else if app.archive_scroll > 0 {
        format!(" Archive ({}) [scrolled +{}] ", count, app.archive_scroll)
    } else {
        format!(" Archive ({}) ", count)
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(Span::styled(title, theme.title_style())),
    );

    f.render_widget(list, area);
}
