use crate::app::AppState;
use crate::domain::format_minutes;
use crate::report::Statistics;
use crate::ui::layout::split_stats_view;
use crate::ui::styles::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

fn pane_block<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(title, theme.title_style()))
}

/// Render the statistics tab
pub fn render_stats_pane(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let stats = app.statistics();
    let [completion_area, pomodoro_area, work_area, trend_area] = split_stats_view(area);

    render_completion(f, app, &stats, theme, completion_area);
    render_pomodoros(f, &stats, theme, pomodoro_area);
    render_work_time(f, &stats, theme, work_area);
    render_trend(f, app, &stats, theme, trend_area);
}

fn render_completion(f: &mut Frame, app: &AppState, stats: &Statistics, theme: &Theme, area: Rect) {
    let priority = app.stats_filter.priority.map_or("all", |p| p.to_tag());
    let block = pane_block(
        format!(" Completion · {} · priority: {} ", app.stats_filter.tag.label(), priority),
        theme,
    );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let completion = stats.completion;
    let summary = Paragraph::new(vec![
        Line::raw(format!(
            " {} task(s): {} completed, {} pending",
            completion.total(),
            completion.completed,
            completion.pending
        )),
        Line::raw(""),
    ]);
    f.render_widget(summary, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.primary).bg(theme.muted))
        .ratio(completion.ratio())
        .label(format!("{:.0}%", completion.ratio() * 100.0));
    f.render_widget(gauge, chunks[1]);
}

fn render_pomodoros(f: &mut Frame, stats: &Statistics, theme: &Theme, area: Rect) {
    let planned = Bar::default()
        .value(stats.pomodoros.planned)
        .label(Line::raw("planned"))
        .style(Style::default().fg(theme.primary));
    let completed = Bar::default()
        .value(stats.pomodoros.completed)
        .label(Line::raw("done"))
        .style(Style::default().fg(theme.secondary));

    let chart = BarChart::default()
        .block(pane_block(" Pomodoros (completed tasks) ".to_string(), theme))
        .data(BarGroup::default().bars(&[planned, completed]))
        .bar_width(9)
        .bar_gap(2);
    f.render_widget(chart, area);
}

fn render_work_time(f: &mut Frame, stats: &Statistics, theme: &Theme, area: Rect) {
    let mut rows = stats.work_time.clone();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    let total: u64 = rows.iter().map(|(_, m)| u64::from(*m)).sum();

    let mut items: Vec<ListItem> = rows
        .into_iter()
        .map(|(text, minutes)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>7} ", format_minutes(u64::from(minutes))), theme.tag_style()),
                Span::raw(text),
            ]))
        })
        .collect();
    if items.is_empty() {
        items.push(ListItem::new(Line::styled(" No focus time yet", theme.hint_style())));
    }

    let list = List::new(items).block(pane_block(
        format!(" Focus Time · {} ", format_minutes(total)),
        theme,
    ));
    f.render_widget(list, area);
}

fn render_trend(f: &mut Frame, app: &AppState, stats: &Statistics, theme: &Theme, area: Rect) {
    let data: Vec<(&str, u64)> = stats
        .trend
        .iter()
        .map(|b| (b.label.as_str(), b.completed as u64))
        .collect();

    // Narrow bars for the 30-day range so every day fits
    let inner_width = area.width.saturating_sub(2) as usize;
    let slots = data.len().max(1);
    let bar_width = ((inner_width / slots).saturating_sub(1)).clamp(1, 7) as u16;

    let chart = BarChart::default()
        .block(pane_block(
            format!(" Completed per period · {} ", app.time_range.name()),
            theme,
        ))
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.primary))
        .value_style(Style::default().fg(theme.background).bg(theme.primary));
    f.render_widget(chart, area);
}
