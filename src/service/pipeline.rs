//! End-to-end orchestration: fetch, summarize, email — in that order, with
//! no retry and no partial-completion recovery. A failed run is re-triggered
//! from scratch by the next scheduled invocation.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{OpenAiSettings, RapidApiSettings, SmtpSettings};
use crate::models::TranscriptSummary;
use crate::service::emailer::{build_email, send_email, EmailRequest, EmailerError};
use crate::service::summarizer::{Summarizer, SummarizerError};
use crate::service::transcripts::{TranscriptClient, TranscriptError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no transcript available for {0}; check the ticker and API credentials")]
    TranscriptNotFound(String),
    #[error("transcript file not found: {0}")]
    TranscriptFileMissing(PathBuf),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error(transparent)]
    Summarize(#[from] SummarizerError),
    #[error(transparent)]
    Email(#[from] EmailerError),
    #[error("failed to stage transcript override: {0}")]
    Io(#[from] std::io::Error),
}

/// One pipeline invocation for a single ticker.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub symbol: String,
    pub company: String,
    pub recipients: Vec<String>,
    pub subject: Option<String>,
    pub transcript_path: Option<PathBuf>,
    pub transcript_text_override: Option<String>,
    pub extra_instructions: Vec<String>,
}

impl PipelineRequest {
    pub fn new(
        symbol: impl Into<String>,
        company: impl Into<String>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            company: company.into(),
            recipients,
            subject: None,
            transcript_path: None,
            transcript_text_override: None,
            extra_instructions: Vec::new(),
        }
    }
}

/// Fetch (or accept) a transcript, summarize it, and email both documents.
pub async fn generate_and_email_transcript(
    request: &PipelineRequest,
    rapidapi: &RapidApiSettings,
    openai: &OpenAiSettings,
    smtp: &SmtpSettings,
) -> Result<TranscriptSummary, PipelineError> {
    let transcript_path = resolve_transcript(request, rapidapi).await?;

    let summarizer = Summarizer::new(openai)?;
    let summary = summarizer
        .summarize(
            &transcript_path,
            &request.company,
            &request.extra_instructions,
            request.transcript_text_override.as_deref(),
        )
        .await?;

    let subject = request.subject.clone().unwrap_or_else(|| {
        format!(
            "{} earnings call summary ({})",
            request.company, request.symbol
        )
    });

    let email = build_email(&EmailRequest::new(
        subject,
        smtp.sender.clone(),
        request.recipients.clone(),
        summary.summary_text.clone(),
        summary.transcript_path.clone(),
        request.company.clone(),
        request.symbol.clone(),
    ))?;
    send_email(email, smtp).await?;

    info!(
        "Pipeline complete for {}: emailed {} recipient(s)",
        request.symbol,
        request.recipients.len()
    );
    Ok(summary)
}

/// Transcript source precedence: literal override text (staged to disk so
/// the durable artifact exists), then a caller-supplied path, then a fetch.
async fn resolve_transcript(
    request: &PipelineRequest,
    rapidapi: &RapidApiSettings,
) -> Result<PathBuf, PipelineError> {
    if let Some(text) = &request.transcript_text_override {
        let path = request.transcript_path.clone().unwrap_or_else(|| {
            Path::new("transcripts").join(format!("{}_transcript.txt", request.symbol))
        });
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, text)?;
        return Ok(path);
    }

    if let Some(path) = &request.transcript_path {
        if !path.exists() {
            return Err(PipelineError::TranscriptFileMissing(path.clone()));
        }
        return Ok(path.clone());
    }

    let client = TranscriptClient::new(rapidapi)?;
    client
        .fetch_latest_transcript(&request.symbol)
        .await
        .ok_or_else(|| PipelineError::TranscriptNotFound(request.symbol.clone()))
}

pub use PipelineError as Error;
