pub mod channel;

use crate::months::YearMonth;
use crate::pager::FetchTicket;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Photo {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// One archived channel post.
///
/// Built only by decoding a page; `date` is settled at construction and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMessage")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub photos: Vec<Photo>,
    pub tags: Vec<String>,
    pub quoted_message: Option<Box<Message>>,
    pub created_at: String,
    date: String,
}

impl Message {
    pub fn new(id: impl Into<String>, text: impl Into<String>, created_at: impl Into<String>) -> Self {
        let created_at = created_at.into();
        Self {
            id: id.into(),
            text: text.into(),
            photos: Vec::new(),
            tags: Vec::new(),
            quoted_message: None,
            date: derive_date(None, &created_at),
            created_at,
        }
    }

    pub fn with_photos(mut self, photos: Vec<Photo>) -> Self {
        self.photos = photos;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_quote(mut self, quoted: Message) -> Self {
        self.quoted_message = Some(Box::new(quoted));
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = derive_date(Some(date.into()), &self.created_at);
        self
    }

    /// The day this post belongs to, `YYYY-MM-DD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// `HH:MM` taken from `created_at`, empty when it carries no time.
    pub fn time(&self) -> &str {
        self.created_at.get(11..16).unwrap_or("")
    }

    /// The month directory holding this post's photos.
    pub fn month(&self) -> Option<YearMonth> {
        self.date.get(..7)?.parse().ok()
    }

    pub fn is_displayable(&self) -> bool {
        !self.text.is_empty() || !self.photos.is_empty()
    }

    /// Case-insensitive match against the text and every tag.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.text.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

fn derive_date(date: Option<String>, created_at: &str) -> String {
    match date {
        Some(date) if !date.is_empty() => date,
        _ => created_at.get(..10).unwrap_or(created_at).to_string(),
    }
}

// The publisher writes quoted messages with only a handful of fields and
// uses numeric ids, so everything beyond `id` is lenient here.
#[derive(Deserialize)]
struct RawMessage {
    #[serde(deserialize_with = "de_id")]
    id: String,
    #[serde(default, deserialize_with = "de_null_default")]
    text: String,
    #[serde(default, deserialize_with = "de_null_default")]
    photos: Vec<Photo>,
    #[serde(default, deserialize_with = "de_null_default")]
    tags: Vec<String>,
    #[serde(default)]
    quoted_message: Option<Box<RawMessage>>,
    #[serde(default, deserialize_with = "de_null_default")]
    created_at: String,
    #[serde(default)]
    date: Option<String>,
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        let date = derive_date(raw.date, &raw.created_at);
        Self {
            id: raw.id,
            text: raw.text,
            photos: raw.photos,
            tags: raw.tags,
            quoted_message: raw.quoted_message.map(|quoted| Box::new(Message::from(*quoted))),
            created_at: raw.created_at,
            date,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(id) => id,
        IdRepr::Number(id) => id.to_string(),
    })
}

fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("malformed page at {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Parse { .. } => "parse",
        }
    }
}

/// Result of one page fetch, sent from the fetch task back to the UI loop.
#[derive(Debug)]
pub struct PageMessage {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Message>, FetchError>,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, month: YearMonth) -> Result<Vec<Message>, FetchError>;
}
