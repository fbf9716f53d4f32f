use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Upcoming earnings call for a ticker, as recovered from the calendar API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    pub symbol: String,
    pub earnings_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}
