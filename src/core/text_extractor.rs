// src/core/text_extractor.rs
//! PDF text extraction

use anyhow::{Context, Result};
use lopdf::Document;

use crate::app_log;

const PDF_SIGNATURE: &[u8] = b"%PDF-";

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    // Some producers emit a few junk bytes before the header.
    bytes
        .windows(PDF_SIGNATURE.len())
        .take(1024)
        .any(|w| w == PDF_SIGNATURE)
}

/// Extract the text of every page, in page order.
///
/// Falls back to a whole-document extractor when the per-page pass finds
/// nothing, which happens with some font encodings.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    if !looks_like_pdf(bytes) {
        anyhow::bail!("Uploaded file is not a PDF document");
    }

    let text = match extract_by_page(bytes) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            app_log!(debug, "Per-page extraction found no text, trying fallback");
            extract_whole_document(bytes)?
        }
        Err(e) => {
            app_log!(warn, "Per-page extraction failed ({:#}), trying fallback", e);
            extract_whole_document(bytes)?
        }
    };

    let text = normalize_text(&text);
    if text.is_empty() {
        anyhow::bail!("No extractable text in PDF (scanned documents are not supported)");
    }

    app_log!(info, "Extracted {} characters of text", text.chars().count());
    Ok(text)
}

fn extract_by_page(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;
    let pages = doc.get_pages();
    let mut text = String::new();

    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => app_log!(warn, "Failed to extract text from page {}: {}", page_number, e),
        }
        text.push('\n');
    }

    Ok(text)
}

fn extract_whole_document(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs
    let outcome = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(anyhow::anyhow!("Failed to extract text from PDF: {:?}", e)),
        Err(_) => anyhow::bail!("Failed to extract text from PDF: malformed document"),
    }
}

/// Trim trailing whitespace per line and collapse runs of blank lines
fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}
