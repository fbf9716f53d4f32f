//! Fetch and persist upcoming earnings call dates for a batch of tickers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::RapidApiSettings;
use crate::models::EarningsEvent;
use crate::service::dates::parse_flexible_datetime;

const CALENDAR_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("calendar file not found: {0}")]
    NotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to decode calendar file: {0}")]
    Decode(#[from] serde_json::Error),
}

/// On-disk form of an event; the date is kept as a string so a reload can
/// re-parse it tolerantly and drop what no longer parses.
#[derive(Debug, Serialize, Deserialize)]
struct SavedEvent {
    symbol: String,
    earnings_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company: Option<String>,
}

pub struct CalendarClient {
    client: reqwest::Client,
    api_key: String,
    host: String,
}

impl CalendarClient {
    pub fn new(settings: &RapidApiSettings) -> Result<Self, CalendarError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(CALENDAR_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            host: settings.host.clone(),
        })
    }

    /// Fetch the next earnings date for one ticker.
    ///
    /// Any request, status, or extraction failure is logged and returns
    /// `None` so a batch can keep going.
    pub async fn fetch_earnings_event(&self, symbol: &str) -> Option<EarningsEvent> {
        let url = format!("https://{}/earnings/v2/list", self.host);
        let symbol_lower = symbol.to_lowercase();

        let response = match self
            .client
            .get(&url)
            .query(&[("id", symbol_lower.as_str()), ("size", "1"), ("page", "1")])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("Error contacting earnings calendar API for {symbol}: {err}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Failed to fetch earnings calendar for {symbol}: {status} {}",
                body.chars().take(200).collect::<String>()
            );
            return None;
        }

        let payload = match response.json::<Value>().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Failed to decode earnings calendar response for {symbol}: {err}");
                return None;
            }
        };

        let earnings_date = match extract_first_date(&payload) {
            Some(date) => date,
            None => {
                warn!("No earnings date found in response for {symbol}");
                return None;
            }
        };

        Some(EarningsEvent {
            symbol: symbol.to_uppercase(),
            earnings_date,
            company: extract_company(&payload),
        })
    }

    /// Fetch earnings dates for all `tickers`, skipping individual failures,
    /// and overwrite `output_path` with the recovered list as JSON.
    pub async fn fetch_earnings_calendar(
        &self,
        tickers: &[String],
        output_path: &Path,
    ) -> Result<Vec<EarningsEvent>, CalendarError> {
        let mut events = Vec::new();
        for ticker in tickers {
            if let Some(event) = self.fetch_earnings_event(ticker).await {
                events.push(event);
            }
        }

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let saved: Vec<SavedEvent> = events.iter().map(to_saved).collect();
        std::fs::write(output_path, serde_json::to_string_pretty(&saved)?)?;
        info!(
            "Saved {} earnings event(s) to {}",
            events.len(),
            output_path.display()
        );

        Ok(events)
    }
}

/// Reload a previously saved calendar file, dropping entries whose stored
/// date no longer parses.
pub fn load_saved_calendar(path: &Path) -> Result<Vec<EarningsEvent>, CalendarError> {
    if !path.exists() {
        return Err(CalendarError::NotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path)?;
    let saved: Vec<SavedEvent> = serde_json::from_str(&raw)?;

    let events = saved
        .into_iter()
        .filter_map(|entry| {
            let earnings_date = parse_flexible_datetime(&entry.earnings_date)?;
            Some(EarningsEvent {
                symbol: entry.symbol,
                earnings_date,
                company: entry.company,
            })
        })
        .collect();

    Ok(events)
}

/// Pull an earnings date out of the known calendar response shapes: a
/// `data` list with per-item attributes, or a bare `data` object.
pub fn extract_first_date(payload: &Value) -> Option<chrono::NaiveDateTime> {
    if let Some(first) = payload
        .get("data")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
    {
        let attributes = first.get("attributes");
        for field in [
            "earningsDate",
            "earningsDateUtc",
            "date",
            "reportDate",
            "startDateTime",
        ] {
            if let Some(parsed) = attributes
                .and_then(|a| a.get(field))
                .and_then(Value::as_str)
                .and_then(parse_flexible_datetime)
            {
                return Some(parsed);
            }
        }
        return None;
    }

    let data = payload.get("data").filter(|d| d.is_object())?;
    for field in ["earningsDate", "date", "reportDate"] {
        if let Some(parsed) = data
            .get(field)
            .and_then(Value::as_str)
            .and_then(parse_flexible_datetime)
        {
            return Some(parsed);
        }
    }
    None
}

fn extract_company(payload: &Value) -> Option<String> {
    let attributes = payload
        .get("data")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("attributes"))?;

    attributes
        .get("company")
        .or_else(|| attributes.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn to_saved(event: &EarningsEvent) -> SavedEvent {
    SavedEvent {
        symbol: event.symbol.clone(),
        earnings_date: event.earnings_date.format("%Y-%m-%dT%H:%M:%S").to_string(),
        company: event.company.clone(),
    }
}
