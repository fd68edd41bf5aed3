use crate::app::App;
use crate::feeds::Message;
use crate::markup::{self, Segment};
use crate::pager::PagerState;
use crate::virtualizer::HeightModel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const INDENT: &str = "  ";

/// Draw the message list. Only the messages intersecting the viewport are
/// laid out; everything above and below exists only as estimated heights.
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let title = match app.pager.current_month() {
        Some(month) => format!(" {} · {} ", app.author, month),
        None => format!(" {} ", app.author),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.viewport_rows = inner.height;
    app.virtualizer.set_model(HeightModel::rows(inner.width));

    let items: Vec<&Message> = app.pager.store().filtered_view(&app.search).collect();
    app.virtualizer
        .sync(app.pager.store().revision(), &app.search, &items);

    if items.is_empty() {
        let text = placeholder(app);
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, inner);
        return;
    }

    let viewport = u64::from(inner.height);
    app.scroll = app
        .virtualizer
        .scroll_to_reveal(app.scroll, viewport, app.selected);
    let range = app.virtualizer.visible_range(app.scroll, viewport);
    let model = app.virtualizer.model();

    let mut lines = Vec::new();
    for index in range.clone() {
        let message = items[index];
        lines.extend(message_lines(
            message,
            &app.author,
            app.avatars.glyph_for_row(index),
            index == app.selected,
            &model,
        ));
    }

    let skip = app.scroll - app.virtualizer.offset_of(range.start);
    let paragraph = Paragraph::new(lines).scroll((u16::try_from(skip).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, inner);
}

fn placeholder(app: &App) -> String {
    let pager = &app.pager;
    match pager.state() {
        PagerState::Loading => match pager.current_month() {
            Some(month) => format!("Loading {}…", month),
            None => "Loading…".to_string(),
        },
        _ if !app.search.is_empty() => format!("No messages match \"{}\"", app.search),
        PagerState::Exhausted => "Nothing here yet".to_string(),
        PagerState::Idle => String::new(),
    }
}

/// The rows of one message, exactly `model.estimate(message)` of them.
/// Each section is cut or padded to the rows the estimate gives it.
pub fn message_lines(
    message: &Message,
    author: &str,
    avatar: String,
    selected: bool,
    model: &HeightModel,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let base = model.base as usize;
    let text_rows = model.text_height(&message.text) as usize;
    let width = model.chars_per_line as usize;

    let header_style = if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let header = Line::from(vec![
        Span::styled(format!("{} ", avatar), header_style.fg(Color::Yellow)),
        Span::styled(author.to_string(), header_style.fg(Color::Cyan)),
        Span::styled(
            format!("  {} {}", message.date(), message.time()),
            header_style.fg(Color::DarkGray),
        ),
    ]);
    if base > 0 {
        lines.push(header);
    }

    let body = wrap_segments(&markup::segments(&message.text), width)
        .into_iter()
        .map(|line| indent(line, selected))
        .collect();
    lines.extend(fit(body, text_rows));

    let photo_rows = match message.photos.len() {
        0 => 0,
        1 => model.single_photo,
        _ => model.multi_photo,
    } as usize;
    lines.extend(fit(photo_lines(message), photo_rows));

    if !message.tags.is_empty() {
        let tags = message
            .tags
            .iter()
            .map(|tag| format!("#{}", tag))
            .collect::<Vec<_>>()
            .join(" ");
        let line = Line::from(vec![
            Span::raw(INDENT),
            Span::styled(tags, Style::default().fg(Color::Magenta)),
        ]);
        lines.extend(fit(vec![line], model.tags as usize));
    }

    if let Some(quoted) = &message.quoted_message {
        let quote_rows = (model.quote_base
            + rows_for(&quoted.text, model.quote_chars_per_line) * model.quote_line_height)
            as usize;
        let quote_width = (model.quote_chars_per_line as usize).max(1);
        let quote = textwrap::wrap(&quoted.text.replace('\n', " "), quote_width)
            .into_iter()
            .map(|part| {
                Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(part.into_owned(), Style::default().fg(Color::Gray)),
                ])
            })
            .collect();
        lines.extend(fit(quote, quote_rows));
    }

    lines.extend(fit(Vec::new(), base.saturating_sub(1)));
    lines
}

fn rows_for(text: &str, per_line: u32) -> u32 {
    (text.chars().count() as u32).div_ceil(per_line.max(1))
}

fn fit(mut lines: Vec<Line<'static>>, rows: usize) -> Vec<Line<'static>> {
    lines.truncate(rows);
    lines.resize(rows, Line::default());
    lines
}

fn indent(line: Line<'static>, selected: bool) -> Line<'static> {
    let marker = if selected {
        Span::styled("▌ ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw(INDENT)
    };
    let mut spans = vec![marker];
    spans.extend(line.spans);
    Line::from(spans)
}

fn photo_lines(message: &Message) -> Vec<Line<'static>> {
    let style = Style::default().fg(Color::LightBlue);
    match message.photos.as_slice() {
        [] => Vec::new(),
        [photo] => vec![Line::from(vec![
            Span::raw(INDENT),
            Span::styled(
                format!("▣ {} {}×{}", photo.path, photo.width, photo.height),
                style,
            ),
        ])],
        photos => {
            let names = photos
                .iter()
                .map(|p| p.path.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(format!("▣ {} photos: {}", photos.len(), names), style),
                ]),
                Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(
                        "Enter to browse, o to open",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ]
        }
    }
}

fn segment_style(segment: &Segment) -> (&str, Style) {
    match segment {
        Segment::Plain(text) => (text, Style::default()),
        Segment::Bold(text) => (text, Style::default().add_modifier(Modifier::BOLD)),
        Segment::Italic(text) => (text, Style::default().add_modifier(Modifier::ITALIC)),
        Segment::Code(text) => (text, Style::default().fg(Color::LightYellow)),
        Segment::Link { label, .. } => (
            label,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        ),
    }
}

/// Hard-wrap styled segments at `width` characters. A `\n` ends the line.
pub fn wrap_segments(segments: &[Segment], width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for segment in segments {
        let (text, style) = segment_style(segment);
        let mut chunk = String::new();
        for c in text.chars() {
            if c == '\n' {
                if !chunk.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                lines.push(Line::from(std::mem::take(&mut spans)));
                used = 0;
                continue;
            }
            if used == width {
                if !chunk.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                lines.push(Line::from(std::mem::take(&mut spans)));
                used = 0;
            }
            chunk.push(c);
            used += 1;
        }
        if !chunk.is_empty() {
            spans.push(Span::styled(chunk, style));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}
