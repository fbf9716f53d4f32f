use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One entry of the ticker configuration file.
///
/// Symbols are not deduplicated; the file is the source of truth and is
/// rewritten wholesale after a successful scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerConfig {
    pub symbol: String,
    pub company: String,
    pub earnings_date: NaiveDate,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_earnings_date: Option<NaiveDate>,
}

impl TickerConfig {
    /// Advance the tracked dates after a processed earnings call.
    ///
    /// `earnings_date` moves to the stored `next_earnings_date` when one is
    /// present, otherwise `interval_days` ahead; `next_earnings_date` is then
    /// set `interval_days` past the new `earnings_date`.
    pub fn roll_forward(&mut self, interval_days: i64) {
        let next = self
            .next_earnings_date
            .unwrap_or(self.earnings_date + Duration::days(interval_days));
        self.next_earnings_date = Some(next + Duration::days(interval_days));
        self.earnings_date = next;
    }
}
