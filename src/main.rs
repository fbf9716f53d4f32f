use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::info;

use earnings_digest::config::{OpenAiSettings, RapidApiSettings, SmtpSettings};
use earnings_digest::service::calendar::CalendarClient;
use earnings_digest::service::driver::{run_scheduled, ScheduleOptions};
use earnings_digest::service::pipeline::{generate_and_email_transcript, PipelineRequest};
use earnings_digest::service::transcripts::TranscriptClient;

#[derive(Parser)]
#[command(name = "earnings-digest")]
#[command(about = "Fetch, summarize, and email earnings call transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduled driver against the ticker configuration file
    Run {
        #[arg(long, default_value = "config/tickers.yml")]
        config: PathBuf,
        /// Days between expected earnings calls, used to roll dates forward
        #[arg(long, default_value_t = 90)]
        interval_days: i64,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        max_output_tokens: Option<u32>,
    },
    /// Fetch, summarize, and email one ticker immediately
    Send {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        company: String,
        /// Recipient email address; repeat for multiple recipients
        #[arg(long = "recipient")]
        recipients: Vec<String>,
        /// Use an existing transcript file instead of fetching
        #[arg(long)]
        transcript_path: Option<PathBuf>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        max_output_tokens: Option<u32>,
    },
    /// Fetch upcoming earnings dates for symbols and save them as JSON
    Calendar {
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,
        #[arg(long, default_value = "earnings_calendar.json")]
        out: PathBuf,
    },
    /// Fetch and save the latest transcript for a symbol
    Fetch {
        #[arg(long)]
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            interval_days,
            model,
            max_output_tokens,
        } => {
            let rapidapi = RapidApiSettings::from_env()?;
            let openai = OpenAiSettings::from_env(model.as_deref(), max_output_tokens)?;
            let smtp = SmtpSettings::from_env()?;

            let options = ScheduleOptions {
                config_path: config,
                interval_days,
            };
            let processed = run_scheduled(&options, &rapidapi, &openai, &smtp).await?;
            info!("Scheduled run finished; {processed} ticker(s) processed");
        }
        Commands::Send {
            symbol,
            company,
            recipients,
            transcript_path,
            model,
            max_output_tokens,
        } => {
            let rapidapi = RapidApiSettings::from_env()?;
            let openai = OpenAiSettings::from_env(model.as_deref(), max_output_tokens)?;
            let smtp = SmtpSettings::from_env()?;

            let mut request = PipelineRequest::new(symbol, company, recipients);
            request.transcript_path = transcript_path;

            let summary =
                generate_and_email_transcript(&request, &rapidapi, &openai, &smtp).await?;
            println!(
                "Sent digest for {} (transcript: {})",
                request.symbol,
                summary.transcript_path.display()
            );
        }
        Commands::Calendar { symbols, out } => {
            let rapidapi = RapidApiSettings::from_env()?;
            let client = CalendarClient::new(&rapidapi)?;
            let events = client.fetch_earnings_calendar(&symbols, &out).await?;
            for event in &events {
                println!(
                    "{}: {}{}",
                    event.symbol,
                    event.earnings_date.format("%Y-%m-%d"),
                    event
                        .company
                        .as_deref()
                        .map(|name| format!(" ({name})"))
                        .unwrap_or_default()
                );
            }
            println!("Saved {} event(s) to {}", events.len(), out.display());
        }
        Commands::Fetch { symbol } => {
            let rapidapi = RapidApiSettings::from_env()?;
            let client = TranscriptClient::new(&rapidapi)?;
            match client.fetch_latest_transcript(&symbol).await {
                Some(path) => println!("Transcript saved to {}", path.display()),
                None => println!("No transcript found for {symbol}"),
            }
        }
    }

    Ok(())
}
