pub mod widgets;

use crate::app::{App, Mode};
use crate::pager::PagerState;
use crate::routes::Route;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use widgets::{center_rect, feed, lightbox, month_picker, render_notice};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if let Route::NotFound(path) = &app.route {
        render_not_found(frame, area, path);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    feed::render(frame, chunks[1], app);
    render_status_line(frame, chunks[2], app);

    match app.mode {
        Mode::Browse => {}
        Mode::Search => render_search(frame, chunks[1], app),
        Mode::MonthPicker => month_picker::render(frame, area, app),
        Mode::Lightbox => lightbox::render(frame, area, app),
    }

    if let Some(notice) = &app.notice {
        render_notice(frame, chunks[1], notice);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " chanfeed ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(app.author.clone(), Style::default().fg(Color::Cyan)),
    ];
    if !app.search.is_empty() {
        spans.push(Span::styled(
            format!("  search: {}", app.search),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let pager = &app.pager;
    let shown = app.visible_len();
    let state = match pager.state() {
        PagerState::Loading => Span::styled("Loading…", Style::default().fg(Color::Yellow)),
        PagerState::Exhausted => {
            Span::styled("No more messages", Style::default().fg(Color::DarkGray))
        }
        PagerState::Idle => Span::styled("ready", Style::default().fg(Color::Green)),
    };

    let mut spans = vec![
        Span::raw(format!(" {}/{} ", shown, pager.store().len())),
        state,
        Span::styled(
            format!(" | {} ", pager.policy().label()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(error) = pager.last_error() {
        spans.push(Span::styled(
            format!("| {} ", error),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        "| j/k move  / search  m month  Enter photo  p quote  r reload  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let bar = Rect::new(area.x + 2, area.y + 1, area.width.saturating_sub(4), 3.min(area.height));
    frame.render_widget(Clear, bar);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Search ");
    let text = Line::from(vec![
        Span::raw(app.search.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        Span::styled(
            "  Enter to keep | Esc to clear",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(text).block(block), bar);
}

fn render_not_found(frame: &mut Frame, area: Rect, path: &str) {
    let modal_area = center_rect(60, 40, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" 404 ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Page not found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Nothing lives at {:?}.", path)),
        Line::from(""),
        Line::from(Span::styled(
            "Start with --route / for the feed | q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, modal_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feeds::{FetchError, Message, PageFetcher};
    use crate::months::YearMonth;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct NoFetch;

    #[async_trait]
    impl PageFetcher for NoFetch {
        async fn fetch(&self, _month: YearMonth) -> Result<Vec<Message>, FetchError> {
            Ok(Vec::new())
        }
    }

    fn app(route: Route) -> App {
        let config = Config {
            author: "Ferris".to_string(),
            base_url: "https://example.org".to_string(),
            archive_start: "2024-06".parse().unwrap(),
            ..Config::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 8, 20).unwrap();
        App::new(&config, Arc::new(NoFetch), today, route)
    }

    /// Feed a page straight into the pager without going through a task.
    fn load(app: &mut App, messages: Vec<Message>) {
        let ticket = app.pager.request_more().unwrap();
        app.pager.complete(ticket, Ok(messages));
    }

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn numbered(count: usize) -> Vec<Message> {
        (0..count)
            .map(|i| Message::new(i.to_string(), format!("message number {}", i), "2024-08-01T10:00:00"))
            .collect()
    }

    #[test]
    fn test_draw_feed_shows_messages() {
        let mut app = app(Route::Feed);
        load(&mut app, numbered(3));

        let out = screen(&mut app, 60, 20);
        assert!(out.contains("chanfeed"));
        assert!(out.contains("Ferris · 2024-08"));
        assert!(out.contains("message number 0"));
        assert!(out.contains("message number 2"));
        assert!(out.contains("3/3"));
        assert_eq!(app.viewport_rows, 16);
        assert_eq!(app.virtualizer.len(), 3);
    }

    #[test]
    fn test_draw_only_lays_out_visible_window() {
        let mut app = app(Route::Feed);
        load(&mut app, numbered(200));

        let out = screen(&mut app, 60, 20);
        assert!(out.contains("message number 0"));
        assert!(!out.contains("message number 199"));
        // Each short message takes three rows: header, text, blank.
        assert_eq!(app.virtualizer.total_height(), 600);
    }

    #[test]
    fn test_selection_scrolls_into_view() {
        let mut app = app(Route::Feed);
        load(&mut app, numbered(50));
        screen(&mut app, 60, 20);

        app.handle_key(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::NONE));
        let out = screen(&mut app, 60, 20);
        assert!(out.contains("message number 49"));
        assert!(!out.contains("message number 0 "));
        assert_eq!(app.scroll, 150 - 16);
    }

    #[test]
    fn test_draw_search_filters_list() {
        let mut app = app(Route::Feed);
        load(&mut app, numbered(12));
        app.search = "number 11".to_string();

        let out = screen(&mut app, 60, 20);
        assert!(out.contains("message number 11"));
        assert!(!out.contains("message number 10"));
        assert!(out.contains("1/12"));
    }

    #[test]
    fn test_draw_empty_exhausted() {
        let mut app = app(Route::Feed);
        load(&mut app, Vec::new());

        let out = screen(&mut app, 60, 20);
        assert!(out.contains("Nothing here yet"));
        assert!(out.contains("No more messages"));
    }

    #[test]
    fn test_draw_not_found() {
        let mut app = app(Route::resolve("/about"));
        let out = screen(&mut app, 80, 24);
        assert!(out.contains("Page not found"));
        assert!(out.contains("/about"));
    }

    #[test]
    fn test_draw_month_picker() {
        let mut app = app(Route::Feed);
        load(&mut app, numbered(1));
        app.handle_key(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE));

        let out = screen(&mut app, 80, 30);
        assert!(out.contains("Jump to month"));
        assert!(out.contains("2024-07"));
        assert!(out.contains("2024-06"));
    }
}
