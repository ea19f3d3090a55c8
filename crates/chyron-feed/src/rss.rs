//! RSS headline extraction over blocking HTTP.
//!
//! The parser is deliberately regex-based: the feed is fetched whole,
//! `<item>` blocks are scanned in document order (newest first in the feeds
//! this runs against) and only the `<title>` text is lifted out. Markup the
//! scan cannot make sense of yields fewer titles, never an error; transport
//! and HTTP-status failures are the only error paths.

use std::time::Duration;

use regex_lite::Regex;
use reqwest::blocking::Client;

use crate::error::{FeedError, Result};

/// Feed polled when the caller does not configure one.
pub const DEFAULT_FEED_URL: &str = "http://feeds.bbci.co.uk/news/rss.xml";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking headline source for a single RSS feed URL.
#[derive(Debug)]
pub struct RssHeadlines {
    client: Client,
    url: String,
    item_block: Regex,
    item_title: Regex,
}

impl RssHeadlines {
    /// Build a client for `url` with short connect and read timeouts, sized
    /// for a fetch loop that must never stall the producer for long.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            item_block: Regex::new(r"(?is)<item[\s>].*?</item>").expect("item regex"),
            item_title: Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex"),
        })
    }

    /// Fetch the feed and return up to `limit` titles in document order.
    pub fn fetch(&self, limit: usize) -> Result<Vec<String>> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                code: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text()?;
        let titles = self.extract_titles(&body, limit);
        tracing::debug!(target: "chyron.feed", count = titles.len(), url = %self.url, "parsed feed");
        Ok(titles)
    }

    /// Lift `<title>` text out of each `<item>` block. Channel-level titles
    /// never match because the scan is confined to item blocks; items with a
    /// missing or blank title are dropped.
    fn extract_titles(&self, xml: &str, limit: usize) -> Vec<String> {
        let mut titles = Vec::new();
        for block in self.item_block.find_iter(xml) {
            if titles.len() == limit {
                break;
            }
            let Some(caps) = self.item_title.captures(block.as_str()) else {
                continue;
            };
            let title = decode_entities(unwrap_cdata(caps[1].trim()));
            if !title.is_empty() {
                titles.push(title);
            }
        }
        titles
    }
}

fn unwrap_cdata(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|inner| inner.strip_suffix("]]>"))
        .map(str::trim)
        .unwrap_or(text)
}

/// Decode the predefined XML entities plus the numeric apostrophe common in
/// news feeds. `&amp;` goes last so doubly escaped text decodes once.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
