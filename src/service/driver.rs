//! Scheduled driver: run the pipeline for every ticker whose earnings call
//! was yesterday, then roll its tracked dates forward and rewrite the
//! configuration file.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{OpenAiSettings, RapidApiSettings, SmtpSettings};
use crate::models::TickerConfig;
use crate::service::pipeline::{generate_and_email_transcript, PipelineRequest};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to decode ticker config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// YAML document shape: a single top-level `tickers` list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TickerFile {
    #[serde(default)]
    tickers: Vec<TickerConfig>,
}

pub fn load_ticker_config(path: &Path) -> Result<Vec<TickerConfig>, DriverError> {
    let raw = std::fs::read_to_string(path)?;
    let file: TickerFile = serde_yaml::from_str(&raw)?;
    Ok(file.tickers)
}

pub fn save_ticker_config(path: &Path, tickers: &[TickerConfig]) -> Result<(), DriverError> {
    let file = TickerFile {
        tickers: tickers.to_vec(),
    };
    std::fs::write(path, serde_yaml::to_string(&file)?)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    pub config_path: PathBuf,
    pub interval_days: i64,
}

/// One scheduled run over the whole ticker list. Returns how many tickers
/// were processed and rolled forward.
///
/// Ticker failures are isolated: a failing pipeline run is logged and the
/// loop moves on, so one bad ticker cannot discard another's rollover. The
/// configuration file is rewritten only when at least one ticker processed.
pub async fn run_scheduled(
    options: &ScheduleOptions,
    rapidapi: &RapidApiSettings,
    openai: &OpenAiSettings,
    smtp: &SmtpSettings,
) -> Result<usize, DriverError> {
    let mut tickers = load_ticker_config(&options.config_path)?;
    if tickers.is_empty() {
        info!("No tickers configured; exiting.");
        return Ok(0);
    }

    let yesterday = Local::now().date_naive() - Duration::days(1);
    let mut processed = 0usize;

    for entry in tickers.iter_mut() {
        if entry.earnings_date != yesterday {
            continue;
        }
        if entry.recipients.is_empty() {
            info!("Skipping {}: no recipients configured", entry.symbol);
            continue;
        }

        info!(
            "Processing {} for earnings date {}",
            entry.symbol, entry.earnings_date
        );
        let request = PipelineRequest::new(
            entry.symbol.clone(),
            entry.company.clone(),
            entry.recipients.clone(),
        );

        match generate_and_email_transcript(&request, rapidapi, openai, smtp).await {
            Ok(summary) => {
                entry.roll_forward(options.interval_days);
                processed += 1;
                info!(
                    "Emailed {} digest from {}",
                    entry.symbol,
                    summary.transcript_path.display()
                );
            }
            Err(err) => {
                warn!("Pipeline failed for {}: {err}", entry.symbol);
            }
        }
    }

    if processed == 0 {
        info!("No tickers matched yesterday's earnings date; no updates saved.");
        return Ok(0);
    }

    save_ticker_config(&options.config_path, &tickers)?;
    info!("Processed {processed} ticker(s) and updated configuration.");
    Ok(processed)
}
