use std::path::PathBuf;

use earnings_digest::service::emailer::pdf::{
    parse_summary_sections, render_summary_pdf, sanitize_latin1, split_paragraphs,
};
use earnings_digest::service::emailer::{build_email, high_level_summary, EmailRequest, EmailerError};

const SAMPLE_SUMMARY: &str = "1) Financial results\n\
Revenue grew 20% year over year. Margins expanded.\n\
\n\
2) Guidance\n\
Management raised full-year guidance.\n";

fn sample_request(transcript_path: PathBuf) -> EmailRequest {
    EmailRequest::new(
        "Upstart Holdings earnings call summary (UPST)",
        "digest@example.com",
        vec!["analyst@example.com".to_string()],
        SAMPLE_SUMMARY,
        transcript_path,
        "Upstart Holdings",
        "UPST",
    )
}

#[test]
fn summary_sections_split_on_numbered_headers() {
    let sections = parse_summary_sections(SAMPLE_SUMMARY);
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].0, "1) Financial results");
    assert_eq!(
        sections[0].1,
        "Revenue grew 20% year over year. Margins expanded."
    );
    assert_eq!(sections[1].0, "2) Guidance");
    assert_eq!(sections[1].1, "Management raised full-year guidance.");
}

#[test]
fn summary_without_headers_has_no_sections() {
    let sections = parse_summary_sections("Just a plain paragraph.\n\nAnd another.");
    assert!(sections.is_empty());
}

#[test]
fn divider_lines_are_stripped_from_section_bodies() {
    let summary = "1) Results\n====\nStrong quarter.\n";
    let sections = parse_summary_sections(summary);
    assert_eq!(sections[0].1, "Strong quarter.");
}

#[test]
fn paragraphs_split_on_blank_lines() {
    let paragraphs = split_paragraphs("First block.\n\n  \nSecond block.");
    assert_eq!(paragraphs, vec!["First block.", "Second block."]);
}

#[test]
fn sanitize_drops_non_latin1_characters() {
    assert_eq!(sanitize_latin1("R\u{e9}sum\u{e9} \u{2014} caf\u{e9}"), "R\u{e9}sum\u{e9}  caf\u{e9}");
}

#[test]
fn preview_is_first_four_sentences() {
    let summary = "One. Two! Three? Four. Five.";
    assert_eq!(high_level_summary(summary), "One. Two! Three? Four.");
}

#[test]
fn preview_does_not_break_on_decimals() {
    let summary = "Revenue was $1.5 billion. Margins held. Guidance rose. Risks remain. Extra.";
    assert_eq!(
        high_level_summary(summary),
        "Revenue was $1.5 billion. Margins held. Guidance rose. Risks remain."
    );
}

#[test]
fn preview_of_blank_summary_is_a_placeholder() {
    assert_eq!(high_level_summary("   "), "Summary unavailable.");
}

#[test]
fn build_email_requires_recipients() {
    let dir = tempfile::tempdir().expect("tempdir");
    let transcript = dir.path().join("UPST_2025-11-04_transcript.txt");
    std::fs::write(&transcript, "Operator: Good afternoon.").expect("write transcript");

    let mut request = sample_request(transcript);
    request.recipients.clear();

    let err = build_email(&request).expect_err("no recipients must fail");
    assert!(matches!(err, EmailerError::NoRecipients), "got: {err}");
}

#[test]
fn build_email_requires_an_existing_transcript() {
    let request = sample_request(PathBuf::from("does/not/exist_transcript.txt"));
    let err = build_email(&request).expect_err("missing transcript must fail");
    assert!(matches!(err, EmailerError::TranscriptMissing(_)), "got: {err}");
}

#[test]
fn build_email_attaches_summary_and_transcript_pdfs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let transcript = dir.path().join("UPST_2025-11-04_transcript.txt");
    std::fs::write(
        &transcript,
        "Operator: Good afternoon, and welcome to the call.\n\nCEO: Thanks, everyone.",
    )
    .expect("write transcript");

    let mut request = sample_request(transcript);
    request.summary_dir = dir.path().join("summary_pdfs");
    request.transcript_dir = dir.path().join("transcript_pdfs");

    let message = build_email(&request).expect("email should build");
    let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

    assert!(formatted.contains("UPST_2025-11-04_transcript_summary.pdf"));
    assert!(formatted.contains("UPST_2025-11-04_transcript.pdf"));
    assert!(formatted.contains("High-level summary (4 sentences):"));
    assert!(formatted.contains("Earnings call date: 2025-11-04."));

    for pdf in [
        request.summary_dir.join("UPST_2025-11-04_transcript_summary.pdf"),
        request.transcript_dir.join("UPST_2025-11-04_transcript.pdf"),
    ] {
        let bytes = std::fs::read(&pdf).expect("pdf should exist");
        assert!(bytes.starts_with(b"%PDF"), "not a pdf: {}", pdf.display());
    }
}

#[test]
fn transcript_pdf_is_not_regenerated_for_the_same_stem() {
    let dir = tempfile::tempdir().expect("tempdir");
    let transcript = dir.path().join("AAPL_2025-10-30_transcript.txt");
    std::fs::write(&transcript, "Operator: Welcome.").expect("write transcript");
    let out = dir.path().join("transcript_pdfs");

    let first = earnings_digest::service::emailer::pdf::render_transcript_pdf(
        "Operator: Welcome.",
        &transcript,
        "Apple",
        "AAPL",
        &out,
    )
    .expect("first render");
    let modified_before = std::fs::metadata(&first).and_then(|m| m.modified()).expect("mtime");

    let second = earnings_digest::service::emailer::pdf::render_transcript_pdf(
        "Different text entirely.",
        &transcript,
        "Apple",
        "AAPL",
        &out,
    )
    .expect("second render");
    let modified_after = std::fs::metadata(&second).and_then(|m| m.modified()).expect("mtime");

    assert_eq!(first, second);
    assert_eq!(modified_before, modified_after, "file should not be rewritten");
}

#[test]
fn summary_pdf_renders_without_section_headers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let transcript = dir.path().join("MSFT_2025-10-29_transcript.txt");
    std::fs::write(&transcript, "Operator: Hello.").expect("write transcript");

    let path = render_summary_pdf(
        "A single flowing paragraph with no numbered headers at all.",
        &transcript,
        "Microsoft",
        "MSFT",
        &dir.path().join("summary_pdfs"),
    )
    .expect("render");

    let bytes = std::fs::read(&path).expect("pdf should exist");
    assert!(bytes.starts_with(b"%PDF"));
}
