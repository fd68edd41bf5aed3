use super::{FetchError, Message, PageFetcher, Photo};
use crate::months::YearMonth;
use async_trait::async_trait;
use std::time::Duration;

pub struct ChannelFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl ChannelFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chanfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

fn channel_root(base_url: &str) -> String {
    format!("{}/assets/channel", base_url.trim_end_matches('/'))
}

/// `{base}/assets/channel/{YYYY-MM}/data.json`
pub fn page_url(base_url: &str, month: YearMonth) -> String {
    format!("{}/{}/data.json", channel_root(base_url), month)
}

/// Where a photo of `message` lives: `{base}/assets/channel/{YYYY-MM}/{date}/{path}`.
///
/// Returns `None` when the message's date does not name a month.
pub fn photo_url(base_url: &str, message: &Message, photo: &Photo) -> Option<String> {
    let month = message.month()?;
    let path = photo
        .path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Some(format!(
        "{}/{}/{}/{}",
        channel_root(base_url),
        month,
        message.date(),
        path
    ))
}

/// Decode a page body. Anything but a JSON array of message objects fails.
pub fn parse_page(url: &str, body: &str) -> Result<Vec<Message>, FetchError> {
    serde_json::from_str(body).map_err(|source| FetchError::Parse {
        url: url.to_string(),
        source,
    })
}

#[async_trait]
impl PageFetcher for ChannelFetcher {
    async fn fetch(&self, month: YearMonth) -> Result<Vec<Message>, FetchError> {
        let url = page_url(&self.base_url, month);
        let network = |reason: String| FetchError::Network {
            url: url.clone(),
            reason,
        };

        tracing::debug!(%url, "fetching page");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(network(format!("HTTP {}", response.status())));
        }

        let body = response.text().await.map_err(|e| network(e.to_string()))?;
        let messages = parse_page(&url, &body)?;
        tracing::debug!(%url, count = messages.len(), "page decoded");
        Ok(messages)
    }
}
