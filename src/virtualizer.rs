//! Estimated row heights and the visible window of a long message list.

use crate::feeds::Message;
use std::ops::Range;

/// Constants for [`HeightModel::estimate`]. All increments are non-negative
/// and `multi_photo >= single_photo`, which keeps the estimate monotone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightModel {
    pub base: u32,
    pub chars_per_line: u32,
    pub line_height: u32,
    /// Extra height per hard line break in the text.
    pub line_break: u32,
    pub single_photo: u32,
    pub multi_photo: u32,
    pub tags: u32,
    pub quote_base: u32,
    pub quote_chars_per_line: u32,
    pub quote_line_height: u32,
}

impl HeightModel {
    /// Pixel estimate matching the web layout (avatar row, 300px single
    /// image, 250px scroll strip plus its scrollbar and gap).
    pub const PIXELS: Self = Self {
        base: 84,
        chars_per_line: 40,
        line_height: 24,
        line_break: 24,
        single_photo: 308,
        multi_photo: 316,
        tags: 36,
        quote_base: 24,
        quote_chars_per_line: 44,
        quote_line_height: 24,
    };

    /// Terminal rows for a list `width` columns wide.
    pub fn rows(width: u16) -> Self {
        let text_width = u32::from(width.saturating_sub(2)).max(1);
        Self {
            // header line and trailing blank line
            base: 2,
            chars_per_line: text_width,
            line_height: 1,
            line_break: 1,
            single_photo: 1,
            multi_photo: 2,
            tags: 1,
            quote_base: 0,
            quote_chars_per_line: text_width.saturating_sub(2).max(1),
            quote_line_height: 1,
        }
    }

    pub fn estimate(&self, message: &Message) -> u32 {
        let mut height = self.base + self.text_height(&message.text);
        height += match message.photos.len() {
            0 => 0,
            1 => self.single_photo,
            _ => self.multi_photo,
        };
        if !message.tags.is_empty() {
            height += self.tags;
        }
        if let Some(quoted) = &message.quoted_message {
            height += self.quote_base
                + lines(&quoted.text, self.quote_chars_per_line) * self.quote_line_height;
        }
        height
    }

    /// Height of the message text alone. Each `\n` starts a new line.
    pub fn text_height(&self, text: &str) -> u32 {
        let breaks = text.matches('\n').count() as u32;
        lines(text, self.chars_per_line) * self.line_height + breaks * self.line_break
    }
}

fn lines(text: &str, per_line: u32) -> u32 {
    let chars = text.chars().count() as u32;
    chars.div_ceil(per_line.max(1))
}

/// Prefix sums of estimated heights for the current list.
///
/// Any change in the underlying list (store revision, search term or model)
/// throws the whole table away and rebuilds from index 0.
#[derive(Debug)]
pub struct Virtualizer {
    model: HeightModel,
    offsets: Vec<u64>,
    key: Option<(u64, String)>,
}

impl Virtualizer {
    pub fn new(model: HeightModel) -> Self {
        Self {
            model,
            offsets: vec![0],
            key: None,
        }
    }

    pub fn model(&self) -> HeightModel {
        self.model
    }

    pub fn set_model(&mut self, model: HeightModel) {
        if model != self.model {
            self.model = model;
            self.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.offsets.clear();
        self.offsets.push(0);
    }

    /// Rebuild the table if `(revision, filter)` differs from the last sync.
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, revision: u64, filter: &str, items: &[&Message]) -> bool {
        let fresh = matches!(&self.key, Some((rev, term)) if *rev == revision && term == filter)
            && self.len() == items.len();
        if fresh {
            return false;
        }

        self.offsets.clear();
        self.offsets.reserve(items.len() + 1);
        let mut total = 0u64;
        self.offsets.push(total);
        for message in items {
            total += u64::from(self.model.estimate(message));
            self.offsets.push(total);
        }
        self.key = Some((revision, filter.to_string()));
        true
    }

    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_height(&self) -> u64 {
        self.offsets.last().copied().unwrap_or(0)
    }

    pub fn offset_of(&self, index: usize) -> u64 {
        self.offsets[index.min(self.len())]
    }

    pub fn height_of(&self, index: usize) -> u64 {
        if index >= self.len() {
            return 0;
        }
        self.offsets[index + 1] - self.offsets[index]
    }

    /// Index of the item covering `offset`.
    pub fn index_at(&self, offset: u64) -> usize {
        let index = self.offsets.partition_point(|&start| start <= offset);
        index.saturating_sub(1).min(self.len().saturating_sub(1))
    }

    /// Items that intersect `[scroll, scroll + viewport)`.
    pub fn visible_range(&self, scroll: u64, viewport: u64) -> Range<usize> {
        if self.is_empty() || viewport == 0 {
            return 0..0;
        }
        let start = self.index_at(scroll);
        let end_offset = scroll.saturating_add(viewport);
        let end = self.offsets.partition_point(|&start| start < end_offset) - 1;
        start..(end + 1).clamp(start + 1, self.len())
    }

    /// Smallest change to `scroll` that brings `index` fully into view,
    /// or puts its top at the top when it is taller than the viewport.
    pub fn scroll_to_reveal(&self, scroll: u64, viewport: u64, index: usize) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let index = index.min(self.len() - 1);
        let top = self.offset_of(index);
        let bottom = top + self.height_of(index);
        let max_scroll = self.total_height().saturating_sub(viewport);

        let scroll = if top < scroll {
            top
        } else if bottom > scroll + viewport {
            if bottom - top > viewport {
                top
            } else {
                bottom - viewport
            }
        } else {
            scroll
        };
        scroll.min(max_scroll)
    }
}
