//! Locate and persist the most recent earnings call transcript for a symbol.
//!
//! Every network or decode failure here is a soft outcome: logged and mapped
//! to `None`, because a missing transcript is expected and recoverable (the
//! next scheduled run simply tries again). Only client construction can fail
//! hard.

use std::path::{Path, PathBuf};

use chrono::Local;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::RapidApiSettings;
use crate::service::dates::parse_flexible_date;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const TRANSCRIPTS_DIR: &str = "transcripts";

/// A field extractor tried against a response payload; first success wins.
type Extractor = for<'a> fn(&'a Value) -> Option<&'a str>;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct TranscriptClient {
    client: reqwest::Client,
    api_key: String,
    host: String,
}

impl TranscriptClient {
    pub fn new(settings: &RapidApiSettings) -> Result<Self, TranscriptError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            host: settings.host.clone(),
        })
    }

    /// Find the article id of the latest transcript for `symbol`.
    ///
    /// Returns `None` when no transcript-like article exists or when the API
    /// call fails in any way; callers cannot tell the two apart.
    pub async fn find_transcript_article(&self, symbol: &str) -> Option<String> {
        let url = format!("https://{}/news/v2/list-by-symbol", self.host);
        let symbol_upper = symbol.to_uppercase();
        let payload = self
            .get_json(&url, &[("symbol", symbol_upper.as_str())])
            .await?;

        let items = match payload.get("data").and_then(Value::as_array) {
            Some(items) if !items.is_empty() => items,
            _ => {
                info!("No articles returned for symbol {symbol}");
                return None;
            }
        };

        match select_transcript_id(items) {
            Some(id) => {
                info!("Found transcript article ID: {id}");
                Some(id)
            }
            None => {
                info!("No transcript found in articles for symbol {symbol}");
                None
            }
        }
    }

    /// Fetch the transcript detail payload for a previously located article.
    pub async fn fetch_transcript_details(&self, article_id: &str) -> Option<Value> {
        let url = format!("https://{}/transcripts/v2/get-details", self.host);
        self.get_json(&url, &[("id", article_id)]).await
    }

    /// Fetch the latest transcript for `symbol` and persist it under
    /// `transcripts/{SYMBOL}_{date}_transcript.txt`, returning the path.
    pub async fn fetch_latest_transcript(&self, symbol: &str) -> Option<PathBuf> {
        info!("Fetching earnings transcript for {symbol}");

        let article_id = self.find_transcript_article(symbol).await?;
        let details = self.fetch_transcript_details(&article_id).await?;

        let content = extract_transcript_text(&details);
        if content.trim().is_empty() {
            warn!("Could not extract transcript content for article {article_id}");
            return None;
        }

        let call_date = first_match(&details, DATE_EXTRACTORS)
            .and_then(parse_flexible_date)
            .unwrap_or_else(|| Local::now().date_naive());

        let dir = Path::new(TRANSCRIPTS_DIR);
        if let Err(err) = std::fs::create_dir_all(dir) {
            warn!("Failed to create {TRANSCRIPTS_DIR} directory: {err}");
            return None;
        }

        let path = dir.join(format!(
            "{}_{}_transcript.txt",
            symbol.to_uppercase(),
            call_date.format("%Y-%m-%d")
        ));
        if let Err(err) = std::fs::write(&path, &content) {
            warn!("Failed to write transcript to {}: {err}", path.display());
            return None;
        }

        info!("Transcript saved to {}", path.display());
        Some(path)
    }

    /// GET with the RapidAPI header pair, mapping every failure mode to
    /// `None` with a logged reason.
    async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Option<Value> {
        let response = match self
            .client
            .get(url)
            .query(params)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("Request to {url} failed: {err}");
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            info!("{url} returned 204 No Content");
            return None;
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!("Authentication failed; check the RapidAPI key");
            return None;
        }
        if status == StatusCode::FORBIDDEN {
            warn!("Access forbidden; check the API subscription plan");
            return None;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{url} returned {status}: {}", preview(&body));
            return None;
        }

        match response.json::<Value>().await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!("Failed to decode response from {url}: {err}");
                None
            }
        }
    }
}

/// Pick the first item that looks like a call transcript, skipping slide
/// decks and plain articles. Order-stable: the earliest qualifying item wins.
pub fn select_transcript_id(items: &[Value]) -> Option<String> {
    for item in items {
        let attributes = item.get("attributes");
        let title = attributes
            .and_then(|a| a.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_lowercase();
        let content_type = attributes
            .and_then(|a| a.get("contentType"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_lowercase();

        if title.contains("slide deck") || content_type.contains("slideshow") {
            continue;
        }
        if title.contains("transcript") || content_type.contains("transcript") {
            if let Some(id) = item.get("id").and_then(value_as_id) {
                return Some(id);
            }
        }
    }
    None
}

/// Pull the transcript body out of whichever shape the detail endpoint used,
/// falling back to the raw payload when no known field matches.
pub fn extract_transcript_text(details: &Value) -> String {
    if let Some(text) = first_match(details, CONTENT_EXTRACTORS) {
        return text.to_string();
    }
    serde_json::to_string_pretty(details).unwrap_or_default()
}

const CONTENT_EXTRACTORS: &[Extractor] = &[
    |v| attribute_str(v, "content"),
    |v| attribute_str(v, "transcript"),
    |v| v.get("data").and_then(|d| d.get("content")).and_then(Value::as_str),
    |v| v.get("transcript").and_then(Value::as_str),
    |v| v.get("content").and_then(Value::as_str),
    |v| v.get("text").and_then(Value::as_str),
    |v| v.as_str(),
];

const DATE_EXTRACTORS: &[Extractor] = &[
    |v| attribute_str(v, "publishDate"),
    |v| attribute_str(v, "publishOn"),
    |v| attribute_str(v, "date"),
    |v| v.get("date").and_then(Value::as_str),
    |v| v.get("earnings_date").and_then(Value::as_str),
    |v| v.get("published_date").and_then(Value::as_str),
    |v| v.get("data").and_then(|d| d.get("date")).and_then(Value::as_str),
];

fn first_match<'a>(value: &'a Value, extractors: &[Extractor]) -> Option<&'a str> {
    extractors.iter().find_map(|extract| extract(value))
}

fn attribute_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get("data")
        .and_then(|d| d.get("attributes"))
        .and_then(|a| a.get(field))
        .and_then(Value::as_str)
}

fn value_as_id(value: &Value) -> Option<String> {
    if let Some(id) = value.as_str() {
        return Some(id.to_string());
    }
    value.as_i64().map(|id| id.to_string())
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
