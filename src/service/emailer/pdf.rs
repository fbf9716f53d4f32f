//! Render summaries and transcripts as PDF attachments.
//!
//! Uses the built-in Helvetica fonts, which only cover Latin-1; text is
//! sanitized before rendering.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use regex::Regex;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const WRAP_COLUMNS: usize = 95;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("pdf generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(\d+\)[ \t]+[^\n]+)").expect("section header regex"));
static DIVIDER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^=+[ \t]*$").expect("divider regex"));
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("paragraph break regex"));
static CALL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(\d{4}-\d{2}-\d{2})").expect("call date regex"));

/// Drop characters outside Latin-1; the built-in PDF fonts cannot encode
/// anything beyond it.
pub fn sanitize_latin1(text: &str) -> String {
    text.chars().filter(|c| (*c as u32) <= 0xFF).collect()
}

/// Split a summary into `(header, body)` sections on `N) heading` markers.
/// Returns an empty list when the summary has no such headers.
pub fn parse_summary_sections(summary: &str) -> Vec<(String, String)> {
    let headers: Vec<(usize, usize, String)> = SECTION_HEADER
        .captures_iter(summary)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let header = captures.get(1)?.as_str().trim().to_string();
            Some((whole.start(), whole.end(), header))
        })
        .collect();

    let mut sections = Vec::with_capacity(headers.len());
    for (index, (_, body_start, header)) in headers.iter().enumerate() {
        let body_end = headers
            .get(index + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(summary.len());
        let body = DIVIDER_LINE
            .replace_all(&summary[*body_start..body_end], "")
            .trim()
            .to_string();
        sections.push((header.clone(), body));
    }
    sections
}

/// Split text into trimmed, non-empty paragraphs on blank lines.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

/// Recover the call date embedded in a transcript filename stem.
pub fn extract_call_date(transcript_path: &Path) -> Option<String> {
    let stem = transcript_path.file_stem()?.to_str()?;
    CALL_DATE
        .captures(stem)
        .map(|captures| captures[1].to_string())
}

/// Render the formatted summary PDF: a title page header, then one page per
/// parsed section, or flowing paragraphs when no section markers exist.
pub fn render_summary_pdf(
    summary: &str,
    transcript_path: &Path,
    company: &str,
    symbol: &str,
    output_dir: &Path,
) -> Result<PathBuf, PdfError> {
    std::fs::create_dir_all(output_dir)?;
    let stem = file_stem(transcript_path);
    let pdf_path = output_dir.join(format!("{stem}_summary.pdf"));

    let title = format!("{company} Earnings Call Summary");
    let mut writer = PdfWriter::new(&title)?;

    writer.line(&sanitize_latin1(&title), 16.0, true, 10.0);
    writer.line(&sanitize_latin1(&meta_line(symbol, transcript_path)), 11.0, false, 8.0);
    writer.gap(6.0);

    let sections = parse_summary_sections(summary);
    if sections.is_empty() {
        for paragraph in split_paragraphs(summary) {
            writer.wrapped(&sanitize_latin1(&paragraph), 11.0, false, 7.0);
            writer.gap(3.0);
        }
    } else {
        for (index, (header, body)) in sections.iter().enumerate() {
            if index > 0 {
                writer.new_page();
            }
            writer.wrapped(&sanitize_latin1(header), 12.0, true, 8.0);
            writer.gap(2.0);
            for paragraph in split_paragraphs(body) {
                writer.wrapped(&sanitize_latin1(&paragraph), 11.0, false, 7.0);
                writer.gap(3.0);
            }
        }
    }

    writer.save(&pdf_path)?;
    Ok(pdf_path)
}

/// Render the raw transcript PDF, line by line. An existing PDF for the same
/// transcript stem is reused instead of regenerated.
pub fn render_transcript_pdf(
    transcript_text: &str,
    transcript_path: &Path,
    company: &str,
    symbol: &str,
    output_dir: &Path,
) -> Result<PathBuf, PdfError> {
    std::fs::create_dir_all(output_dir)?;
    let stem = file_stem(transcript_path);
    let pdf_path = output_dir.join(format!("{stem}.pdf"));
    if pdf_path.exists() {
        return Ok(pdf_path);
    }

    let title = format!("{company} Earnings Call Transcript");
    let mut writer = PdfWriter::new(&title)?;

    writer.line(&sanitize_latin1(&title), 14.0, true, 10.0);
    writer.line(&sanitize_latin1(&meta_line(symbol, transcript_path)), 10.0, false, 8.0);
    writer.gap(4.0);

    for line in transcript_text.lines() {
        let cleaned = line.trim_end();
        if cleaned.is_empty() {
            writer.gap(4.0);
        } else {
            writer.wrapped(&sanitize_latin1(cleaned), 10.0, false, 6.0);
        }
    }

    writer.save(&pdf_path)?;
    Ok(pdf_path)
}

fn meta_line(symbol: &str, transcript_path: &Path) -> String {
    let mut meta = format!("Symbol: {symbol}");
    if let Some(call_date) = extract_call_date(transcript_path) {
        meta.push_str(&format!(" | Call Date: {call_date}"));
    }
    meta
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("transcript")
        .to_string()
}

/// Cursor-based text layout over an A4 document, breaking to a fresh page
/// when the write position reaches the bottom margin.
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, PdfError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "text");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "text");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    fn line(&mut self, text: &str, font_size: f32, bold: bool, line_height: f32) {
        if self.cursor_y < MARGIN {
            self.new_page();
        }
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, font_size, Mm(MARGIN), Mm(self.cursor_y), font);
        self.cursor_y -= line_height;
    }

    fn wrapped(&mut self, text: &str, font_size: f32, bold: bool, line_height: f32) {
        for line in wrap_words(text, WRAP_COLUMNS) {
            self.line(&line, font_size, bold, line_height);
        }
    }

    fn gap(&mut self, millimeters: f32) {
        self.cursor_y -= millimeters;
    }

    fn save(self, path: &Path) -> Result<(), PdfError> {
        let PdfWriter { doc, .. } = self;
        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file))?;
        Ok(())
    }
}

/// Greedy word wrap at a fixed column count; long unbroken words keep their
/// own line rather than being split.
fn wrap_words(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
