//! The four inline substitutions applied to message text.
//!
//! Rules run once each, in order: bold, italic, code, link. A rule only
//! sees the plain text left over by the rules before it, so nothing is
//! re-scanned. Overlapping spans therefore interact: a link inside a bold
//! span stays literal text within the bold segment.

use regex::{Captures, Regex};
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { label: String, url: String },
}

struct Rule {
    pattern: Regex,
    build: fn(&Captures<'_>) -> Segment,
}

impl Rule {
    fn new(pattern: &str, build: fn(&Captures<'_>) -> Segment) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid markup pattern"),
            build,
        }
    }

    fn split(&self, text: &str, out: &mut Vec<Segment>) {
        let mut last = 0;
        for caps in self.pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                out.push(Segment::Plain(text[last..whole.start()].to_string()));
            }
            out.push((self.build)(&caps));
            last = whole.end();
        }
        if last < text.len() {
            out.push(Segment::Plain(text[last..].to_string()));
        }
    }
}

static RULES: LazyLock<[Rule; 4]> = LazyLock::new(|| {
    [
        Rule::new(r"\*\*(.+?)\*\*", |c| Segment::Bold(c[1].to_string())),
        Rule::new(r"__(.+?)__", |c| Segment::Italic(c[1].to_string())),
        Rule::new(r"`([^`]+)`", |c| Segment::Code(c[1].to_string())),
        Rule::new(r"\[([^\]]+)\]\((https?://[^\s)]+)\)", |c| Segment::Link {
            label: c[1].to_string(),
            url: c[2].to_string(),
        }),
    ]
});

pub fn segments(text: &str) -> Vec<Segment> {
    let mut segments = vec![Segment::Plain(text.to_string())];
    for rule in RULES.iter() {
        let mut next = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Plain(plain) => rule.split(&plain, &mut next),
                other => next.push(other),
            }
        }
        segments = next;
    }
    segments
}

/// Render `text` as an HTML fragment.
///
/// The text is escaped before any rule runs, so markup in the source can
/// only come out as text, and link targets cannot leave their attribute.
pub fn to_html(text: &str) -> String {
    let escaped = escape_html(text);
    let mut html = String::with_capacity(escaped.len());
    for segment in segments(&escaped) {
        match segment {
            Segment::Plain(t) => html.push_str(&t),
            Segment::Bold(t) => {
                html.push_str("<strong>");
                html.push_str(&t);
                html.push_str("</strong>");
            }
            Segment::Italic(t) => {
                html.push_str("<em>");
                html.push_str(&t);
                html.push_str("</em>");
            }
            Segment::Code(t) => {
                html.push_str("<code>");
                html.push_str(&t);
                html.push_str("</code>");
            }
            Segment::Link { label, url } => {
                html.push_str(&format!(
                    r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{label}</a>"#
                ));
            }
        }
    }
    html
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
