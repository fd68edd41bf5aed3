use crate::feeds::Message;

/// The messages currently on screen, in arrival order.
///
/// `append` and `reset` are the only mutators. Every change bumps
/// `revision` so height caches know to start over.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    revision: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.revision += 1;
    }

    /// Append the displayable part of a page, returning how many were kept.
    pub fn append(&mut self, page: impl IntoIterator<Item = Message>) -> usize {
        let before = self.messages.len();
        self.messages
            .extend(page.into_iter().filter(Message::is_displayable));
        let added = self.messages.len() - before;
        if added > 0 {
            self.revision += 1;
        }
        added
    }

    /// Messages whose text or tags contain `term`, ignoring case.
    /// An empty term passes everything through.
    pub fn filtered_view<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Message> + 'a {
        let needle = term.to_lowercase();
        self.messages
            .iter()
            .filter(move |message| message.matches(&needle))
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
