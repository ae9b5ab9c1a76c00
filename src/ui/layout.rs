use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub tabs_area: Rect,
    pub keybindings_area: Rect,
    pub content_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top: tab bar (3 rows) and keybindings (1 row)
/// - Middle: content of the current tab
/// - Bottom: status line (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    MainLayout {
        tabs_area: chunks[0],
        keybindings_area: chunks[1],
        content_area: chunks[2],
        status_area: chunks[3],
    }
}

/// Split the tasks tab: list on the left (65%), timer on the right (35%)
pub fn split_tasks_view(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split the stats tab into a 2x2 grid
pub fn split_stats_view(area: Rect) -> [Rect; 4] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);
    [top[0], top[1], bottom[0], bottom[1]]
}

/// Create a centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area);

        assert_eq!(layout.tabs_area.height, 3);
        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.content_area.height, 45);
        assert_eq!(layout.status_area.y, 49);
    }

    #[test]
    fn test_split_views() {
        let area = Rect::new(0, 0, 100, 40);
        let (list, timer) = split_tasks_view(area);
        assert_eq!(list.width + timer.width, 100);
        assert!(list.width > timer.width);

        let grid = split_stats_view(area);
        assert!(grid.iter().all(|r| r.width > 0 && r.height > 0));
        assert_eq!(grid[0].y, grid[1].y);
        assert!(grid[2].y > grid[0].y);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 12);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 12);
    }
}
