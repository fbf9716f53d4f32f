//! Compose and send summary/transcript emails to stakeholders.

pub mod pdf;

use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpSettings;
use self::pdf::{extract_call_date, render_summary_pdf, render_transcript_pdf, PdfError};

const SUMMARY_PDF_DIR: &str = "summary_pdfs";
const TRANSCRIPT_PDF_DIR: &str = "transcript_pdfs";

#[derive(Debug, thiserror::Error)]
pub enum EmailerError {
    #[error("transcript file not found: {0}")]
    TranscriptMissing(PathBuf),
    #[error("at least one recipient email is required")]
    NoRecipients,
    #[error("invalid email address {address:?}: {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid attachment content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    #[error("failed to assemble email: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Everything needed to build one digest email.
#[derive(Debug, Clone)]
pub struct EmailRequest {
    pub subject: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub summary_text: String,
    pub transcript_path: PathBuf,
    pub company: String,
    pub symbol: String,
    pub summary_dir: PathBuf,
    pub transcript_dir: PathBuf,
}

impl EmailRequest {
    pub fn new(
        subject: impl Into<String>,
        sender: impl Into<String>,
        recipients: Vec<String>,
        summary_text: impl Into<String>,
        transcript_path: impl Into<PathBuf>,
        company: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            sender: sender.into(),
            recipients,
            summary_text: summary_text.into(),
            transcript_path: transcript_path.into(),
            company: company.into(),
            symbol: symbol.into(),
            summary_dir: PathBuf::from(SUMMARY_PDF_DIR),
            transcript_dir: PathBuf::from(TRANSCRIPT_PDF_DIR),
        }
    }
}

/// Build the digest email: validation, PDF rendering, body, attachments.
///
/// Input validation runs before any rendering or network activity so a
/// misconfigured call fails immediately.
pub fn build_email(request: &EmailRequest) -> Result<Message, EmailerError> {
    if !request.transcript_path.exists() {
        return Err(EmailerError::TranscriptMissing(
            request.transcript_path.clone(),
        ));
    }
    if request.recipients.is_empty() {
        return Err(EmailerError::NoRecipients);
    }

    let transcript = std::fs::read_to_string(&request.transcript_path)?;

    let summary_pdf = render_summary_pdf(
        &request.summary_text,
        &request.transcript_path,
        &request.company,
        &request.symbol,
        &request.summary_dir,
    )?;
    let transcript_pdf = render_transcript_pdf(
        &transcript,
        &request.transcript_path,
        &request.company,
        &request.symbol,
        &request.transcript_dir,
    )?;

    let summary_name = attachment_name(&summary_pdf, "summary.pdf");
    let transcript_name = attachment_name(&transcript_pdf, "transcript.pdf");
    let call_date = extract_call_date(&request.transcript_path);

    let body_lines = [
        format!(
            "Attached are the summary and full transcript for {} ({}).",
            request.company, request.symbol
        ),
        format!(
            "Earnings call date: {}.",
            call_date.as_deref().unwrap_or("Unknown")
        ),
        String::new(),
        "Attachments:".to_string(),
        format!("- {summary_name}: formatted PDF summary"),
        format!("- {transcript_name}: PDF version of the full transcript"),
        String::new(),
        "High-level summary (4 sentences):".to_string(),
        high_level_summary(&request.summary_text),
    ];

    let mut builder = Message::builder()
        .from(parse_mailbox(&request.sender)?)
        .subject(request.subject.clone());
    for recipient in &request.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let pdf_type = ContentType::parse("application/pdf")?;
    let message = builder.multipart(
        MultiPart::mixed()
            .singlepart(SinglePart::plain(body_lines.join("\n")))
            .singlepart(
                Attachment::new(summary_name).body(std::fs::read(&summary_pdf)?, pdf_type.clone()),
            )
            .singlepart(
                Attachment::new(transcript_name).body(std::fs::read(&transcript_pdf)?, pdf_type),
            ),
    )?;

    Ok(message)
}

/// Send over SMTP, with STARTTLS and credentials when configured.
/// Transport errors propagate unchanged.
pub async fn send_email(message: Message, smtp: &SmtpSettings) -> Result<(), EmailerError> {
    let mut builder = if smtp.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
    };
    builder = builder.port(smtp.port);

    if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    let mailer = builder.build();
    mailer.send(message).await?;
    info!("Digest email sent via {}:{}", smtp.host, smtp.port);
    Ok(())
}

/// First four sentences of the summary, for the body preview.
pub fn high_level_summary(summary: &str) -> String {
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = summary.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary =
            matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |next| next.is_whitespace());
        if at_boundary {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
            if sentences.len() == 4 {
                break;
            }
        }
    }
    if sentences.len() < 4 {
        let tail = current.trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
    }

    if sentences.is_empty() {
        return "Summary unavailable.".to_string();
    }
    sentences.join(" ")
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailerError> {
    address.parse().map_err(|source| EmailerError::Address {
        address: address.to_string(),
        source,
    })
}

fn attachment_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(fallback)
        .to_string()
}
