//! Non-interactive renderings of loaded messages, used by `chanfeed dump`.

use crate::feeds::channel::photo_url;
use crate::feeds::Message;
use crate::markup::{escape_html, to_html};

/// One message as plain text: a header line, the text, then photos, tags
/// and the quoted message, each on its own line.
pub fn message_text(message: &Message, author: &str, avatar: &str) -> String {
    let mut out = format!("{} {}  {} {}\n", avatar, author, message.date(), message.time());
    if !message.text.is_empty() {
        out.push_str(&message.text);
        out.push('\n');
    }
    for photo in &message.photos {
        out.push_str(&format!("  [photo] {} {}x{}\n", photo.path, photo.width, photo.height));
    }
    if !message.tags.is_empty() {
        let tags: Vec<String> = message.tags.iter().map(|t| format!("#{}", t)).collect();
        out.push_str(&format!("  {}\n", tags.join(" ")));
    }
    if let Some(quoted) = &message.quoted_message {
        out.push_str(&format!("  > {}\n", quoted.text.replace('\n', " ")));
    }
    out
}

/// One message as an HTML `<article>`. Every interpolated value is escaped;
/// the text goes through the markup rules after escaping.
pub fn message_html(message: &Message, author: &str, avatar: Option<&str>, base_url: &str) -> String {
    let mut out = format!(r#"<article class="message" id="msg-{}">"#, escape_html(&message.id));
    out.push('\n');
    if let Some(avatar) = avatar {
        out.push_str(&format!(
            "  <img class=\"avatar\" src=\"{}\" alt=\"\">\n",
            escape_html(avatar)
        ));
    }
    out.push_str(&format!(
        "  <header><span class=\"author\">{}</span> <time datetime=\"{}\">{} {}</time></header>\n",
        escape_html(author),
        escape_html(&message.created_at),
        escape_html(message.date()),
        escape_html(message.time()),
    ));
    if !message.text.is_empty() {
        out.push_str(&format!("  <div class=\"text\">{}</div>\n", to_html(&message.text)));
    }

    if !message.photos.is_empty() {
        // A single photo is shown large; several go in a scrolling strip.
        let (class, height) = if message.photos.len() == 1 {
            ("photo", 300)
        } else {
            ("photos strip", 250)
        };
        out.push_str(&format!("  <div class=\"{}\">\n", class));
        for photo in &message.photos {
            let src = photo_url(base_url, message, photo).unwrap_or_else(|| photo.path.clone());
            out.push_str(&format!(
                "    <img src=\"{}\" height=\"{}\" data-width=\"{}\" data-height=\"{}\" loading=\"lazy\" alt=\"\">\n",
                escape_html(&src),
                height,
                photo.width,
                photo.height
            ));
        }
        out.push_str("  </div>\n");
    }

    if !message.tags.is_empty() {
        out.push_str("  <ul class=\"tags\">");
        for tag in &message.tags {
            out.push_str(&format!("<li>#{}</li>", escape_html(tag)));
        }
        out.push_str("</ul>\n");
    }

    if let Some(quoted) = &message.quoted_message {
        out.push_str(&format!(
            "  <blockquote><a href=\"#msg-{}\">{}</a></blockquote>\n",
            escape_html(&quoted.id),
            to_html(&quoted.text)
        ));
    }
    out.push_str("</article>\n");
    out
}
