pub mod feed;
pub mod lightbox;
pub mod month_picker;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// A rectangle `percent_x` by `percent_y` of `r`, centred in it.
pub fn center_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A three-row notice box along the bottom edge of `area`.
pub fn render_notice(frame: &mut Frame, area: Rect, message: &str) {
    let notice_area = Rect::new(
        area.x + 2,
        area.y + area.height.saturating_sub(3),
        area.width.saturating_sub(4),
        3.min(area.height),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(Clear, notice_area);
    frame.render_widget(paragraph, notice_area);
}
