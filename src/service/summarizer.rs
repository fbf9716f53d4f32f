//! Turn a transcript into a numbered-section narrative summary via the
//! chat-completion API.
//!
//! Unlike the fetch side, failures here are hard errors: a missing summary
//! has no fallback, so the pipeline must know about it.

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::OpenAiSettings;
use crate::models::TranscriptSummary;

const COMPLETION_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("failed to read transcript {path}: {source}")]
    ReadTranscript {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion API returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("completion API returned no usable summary text")]
    EmptyCompletion,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct Summarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    base_url: String,
}

impl Summarizer {
    pub fn new(settings: &OpenAiSettings) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(COMPLETION_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            max_output_tokens: settings.max_output_tokens,
            base_url: settings.base_url.clone(),
        })
    }

    /// Summarize the transcript at `transcript_path` for `company`.
    ///
    /// `text_override` skips the file read and summarizes the given text
    /// instead; the path is still recorded as the summary's source.
    pub async fn summarize(
        &self,
        transcript_path: &Path,
        company: &str,
        extra_instructions: &[String],
        text_override: Option<&str>,
    ) -> Result<TranscriptSummary, SummarizerError> {
        let transcript = match text_override {
            Some(text) => text.to_string(),
            None => std::fs::read_to_string(transcript_path).map_err(|source| {
                SummarizerError::ReadTranscript {
                    path: transcript_path.to_path_buf(),
                    source,
                }
            })?,
        };

        let prompt = build_prompt(company, extra_instructions, &transcript);
        info!(
            "Requesting summary for {company} with model {} ({} max tokens)",
            self.model, self.max_output_tokens
        );

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_output_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let completion: ChatResponse = response.json().await?;
        let summary_text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummarizerError::EmptyCompletion)?;

        Ok(TranscriptSummary {
            summary_text,
            transcript_path: transcript_path.to_path_buf(),
        })
    }
}

const SYSTEM_INSTRUCTION: &str = "You are an equity research assistant who writes \
concise, factual earnings call summaries for busy investors.";

fn build_prompt(company: &str, extra_instructions: &[String], transcript: &str) -> String {
    let mut lines = vec![
        format!(
            "Summarize the {company} earnings call transcript below into numbered sections, \
each introduced by a header on its own line in the form \"1) Heading\"."
        ),
        "Cover: financial results versus expectations, forward guidance, management \
commentary, analyst Q&A themes, and notable risks."
            .to_string(),
        "Keep each section to a few short paragraphs of plain prose.".to_string(),
    ];
    lines.extend(extra_instructions.iter().cloned());
    lines.push(String::new());
    lines.push("Transcript:".to_string());
    lines.push(transcript.to_string());
    lines.join("\n")
}
