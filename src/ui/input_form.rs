use crate::app::AppState;
use crate::ui::{layout::create_modal_area, styles::Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Label line plus "> value█" input line for one form field
fn push_field<'a>(lines: &mut Vec<Line<'a>>, label: &str, value: &'a str, editing: bool, theme: &Theme) {
    let label = if editing {
        format!("{}: (editing)", label)
    } else {
        format!("{}:", label)
    };
    lines.push(Line::raw(label));
    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(value, theme.modal_title_style()),
        if editing {
            Span::styled("█", theme.modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]));
    lines.push(Line::raw(""));
}

fn render_modal(f: &mut Frame, title: &str, lines: Vec<Line>, theme: &Theme, area: Rect) {
    let height = lines.len() as u16 + 2;
    let modal_area = create_modal_area(area, height);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), theme.modal_title_style()))
                .style(theme.modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the add-task form
pub fn render_add_form(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let Some(form) = &app.add_form else {
        return;
    };

    let mut lines = vec![Line::raw("")];
    push_field(&mut lines, "Task", &form.text, form.editing_field == 0, theme);
    push_field(&mut lines, "Pomodoros", &form.pomodoros, form.editing_field == 1, theme);

    let priority_label = if form.editing_field == 2 {
        "Priority (←/→ to change): (editing)"
    } else {
        "Priority:"
    };
    lines.push(Line::raw(priority_label));
    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(form.priority.to_tag(), theme.modal_title_style()),
    ]));
    lines.push(Line::raw(""));

    push_field(&mut lines, "Tags (comma-separated)", &form.tags, form.editing_field == 3, theme);
    lines.push(Line::raw("Tab to switch fields  ·  Enter to add  ·  Esc to cancel"));

    render_modal(f, " Add Task ", lines, theme, area);
}

/// Render the timer settings form
pub fn render_timer_form(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let Some(form) = &app.timer_form else {
        return;
    };

    let mut lines = vec![Line::raw("")];
    push_field(&mut lines, "Work minutes", &form.work, form.editing_field == 0, theme);
    push_field(&mut lines, "Break minutes", &form.rest, form.editing_field == 1, theme);
    lines.push(Line::raw("Values below 1 become 1"));
    lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

    render_modal(f, " Timer Settings ", lines, theme, area);
}

/// Render the import path prompt
pub fn render_import_prompt(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let Some(input) = &app.import_input else {
        return;
    };

    let mut lines = vec![Line::raw("")];
    push_field(&mut lines, "Path to a JSON export", input, true, theme);
    lines.push(Line::raw("Imported tasks replace the current list."));
    lines.push(Line::raw("Enter to import  ·  Esc to cancel"));

    render_modal(f, " Import Tasks ", lines, theme, area);
}
