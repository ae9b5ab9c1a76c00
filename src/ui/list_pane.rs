use crate::app::AppState;
use crate::domain::{status_badge, Task};
use crate::ui::styles::{priority_style, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let timer_task = app.engine.selected_id();
    let rows = app.visible_tasks();

    let items: Vec<ListItem> = rows
        .iter()
        .map(|task| {
            let line = create_task_line(task, timer_task == Some(task.id), theme);
            ListItem::new(line)
        })
        .collect();

    let tag = app.filter.tag.as_deref().unwrap_or("all");
    let priority = app.filter.priority.map_or("all", |p| p.to_tag());
    let title = format!(
        " Tasks ({}) · tag: {} · priority: {} · {} ",
        rows.len(),
        tag,
        priority,
        app.filter.status.name()
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(title, theme.title_style()));

    if items.is_empty() {
        let hint = List::new(vec![ListItem::new(Line::styled(
            "  No tasks here. Press 'a' to add one.",
            theme.hint_style(),
        ))])
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected_style());

    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut state);
}

/// Create a single line for a task
/// Format: ▶ [~] Write proposal  !high  🍅 1/4  #work #writing
fn create_task_line(task: &Task, in_timer: bool, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();

    // Marker for the task the timer is working on
    if in_timer {
        spans.push(Span::styled("▶ ", theme.title_style()));
    } else {
        spans.push(Span::raw("  "));
    }

    let badge_style = if task.completed {
        theme.done_style()
    } else {
        theme.default_style()
    };
    spans.push(Span::styled(format!("{} ", status_badge(task)), badge_style));
    spans.push(Span::raw(task.text.clone()));
    spans.push(Span::raw("  "));

    spans.push(Span::styled(
        format!("!{}", task.priority.to_tag()),
        priority_style(task.priority),
    ));
    spans.push(Span::raw(format!("  🍅 {}", task.progress_label())));

    if !task.tags.is_empty() {
        spans.push(Span::raw(" "));
        for tag in &task.tags {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("#{}", tag), theme.tag_style()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskDraft};
    use crate::persistence::Settings;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_create_task_line() {
        let theme = Theme::from_settings(&Settings::default());
        let draft = TaskDraft::new("Write proposal", Priority::High, ["work"], 4).unwrap();
        let mut task = Task::from_draft(1, draft);
        task.completed_pomodoros = 1;

        let text = line_text(&create_task_line(&task, false, &theme));
        assert!(text.starts_with("  [ ] Write proposal"));
        assert!(text.contains("!high"));
        assert!(text.contains("1/4"));
        assert!(text.contains("#work"));
    }

    #[test]
    fn test_timer_marker() {
        let theme = Theme::from_settings(&Settings::default());
        let draft = TaskDraft::new("Focus", Priority::Low, Vec::<String>::new(), 1).unwrap();
        let task = Task::from_draft(1, draft);

        let text = line_text(&create_task_line(&task, true, &theme));
        assert!(text.starts_with("▶ "));
        assert!(!text.contains('#'));
    }
}
