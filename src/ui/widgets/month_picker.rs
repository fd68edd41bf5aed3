use super::center_rect;
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let modal_area = center_rect(30, 70, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Jump to month ");

    let current = app.pager.current_month();
    let items: Vec<ListItem> = app
        .pager
        .months()
        .iter()
        .map(|month| {
            let marker = if Some(month) == current { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::raw(month.to_string()),
            ]))
        })
        .collect();

    if items.is_empty() {
        let list = List::new(vec![ListItem::new("No months in the archive.")]).block(block);
        frame.render_widget(list, modal_area);
        return;
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(app.picker_index));
    frame.render_stateful_widget(list, modal_area, &mut state);
}
