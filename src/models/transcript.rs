use std::path::PathBuf;

/// Generated summary text tied back to the transcript it came from.
///
/// The transcript file on disk is the durable artifact; this pairing is only
/// handed from the summarizer to the emailer.
#[derive(Debug, Clone)]
pub struct TranscriptSummary {
    pub summary_text: String,
    pub transcript_path: PathBuf,
}
