use super::center_rect;
use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// The enlarged view of the selected message's current photo. The terminal
/// cannot show the image itself, so this lists what it is and where it lives.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(message) = app.selected_message() else {
        return;
    };
    let Some((photo, url)) = app.current_photo() else {
        return;
    };

    let modal_area = center_rect(80, 60, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(
            " Photo {}/{} ",
            app.photo_index + 1,
            message.photos.len()
        ));

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            photo.path.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} × {}", photo.width, photo.height)),
        Line::from(format!("posted {} {}", message.date(), message.time())),
        Line::from(""),
        Line::from(Span::styled(
            url.unwrap_or_else(|| "(no dated location)".to_string()),
            Style::default().fg(Color::LightBlue),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "←/→ cycle | o open in browser | Esc close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
