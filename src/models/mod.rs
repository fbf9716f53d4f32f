pub mod earnings;
pub mod ticker;
pub mod transcript;

pub use earnings::EarningsEvent;
pub use ticker::TickerConfig;
pub use transcript::TranscriptSummary;
