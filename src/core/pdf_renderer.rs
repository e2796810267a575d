// src/core/pdf_renderer.rs
//! Downloadable PDF version of an analysis report.
//!
//! The report is turned into a small styled HTML document and laid out by
//! `printpdf`, which handles wrapping and page breaks.

use anyhow::Result;
use printpdf::{GeneratePdfOptions, PdfDocument, PdfSaveOptions};
use std::collections::BTreeMap;

use crate::app_log;
use crate::types::report::{
    AnalysisReport, AtsItem, GENERIC_RISK_TITLE, GENERIC_SUGGESTION_TITLE,
};
use crate::utils::html_escape;

// Half-inch page margins, #0077b6 title, red risks, green improvements.
const REPORT_STYLE: &str = "\
body { font-family: Helvetica, sans-serif; font-size: 10pt; padding: 36pt; color: #000000; }
h1 { font-size: 18pt; font-weight: normal; color: #0077b6; text-align: center; margin-bottom: 10pt; }
h2 { font-size: 14pt; font-weight: bold; margin-top: 14pt; margin-bottom: 5pt; }
p { margin-bottom: 5pt; }
p.item { font-weight: bold; margin-left: 20pt; margin-bottom: 3pt; }
p.risk { color: #ff0000; }
p.improvement { color: #008000; }
p.line { margin-bottom: 2pt; }
";

/// Render the report as PDF bytes
pub fn render_report_pdf(report: &AnalysisReport) -> Result<Vec<u8>> {
    let html = report_html(report);
    let mut warnings = Vec::new();

    let doc = PdfDocument::from_html(
        &html,
        &BTreeMap::new(),
        &BTreeMap::new(),
        &GeneratePdfOptions::default(),
        &mut warnings,
    )
    .map_err(|e| anyhow::anyhow!("Failed to lay out report PDF: {}", e))?;

    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        app_log!(debug, "PDF layout produced {} warnings", warnings.len());
    }
    if bytes.is_empty() {
        anyhow::bail!("PDF serializer produced no output");
    }

    Ok(bytes)
}

/// Report content in reading order, as the HTML fed to the layout engine
fn report_html(report: &AnalysisReport) -> String {
    let mut html = String::new();
    html.push_str("<html><head><style>");
    html.push_str(REPORT_STYLE);
    html.push_str("</style></head><body>");

    html.push_str(&format!(
        "<h1>AI Resume Analysis Report ({}/100)</h1>",
        text(&report.overall_score.to_string())
    ));
    html.push_str(&format!(
        "<p>Reasoning: {}</p>",
        text(or_na(&report.score_reason))
    ));

    html.push_str("<h2>Suggested Professional Summary</h2>");
    html.push_str(&format!("<p>{}</p>", text(or_na(&report.summary_rewrite))));

    html.push_str("<h2>Identified ATS Risks</h2>");
    push_items(&mut html, &report.ats_risks, GENERIC_RISK_TITLE, "risk");

    html.push_str("<h2>Suggestions for ATS Improvement</h2>");
    push_items(
        &mut html,
        &report.ats_improvements,
        GENERIC_SUGGESTION_TITLE,
        "improvement",
    );

    html.push_str("<h2>Detailed Suggestions for Overall Improvement</h2>");
    // One paragraph per source line keeps the model's line breaks.
    for line in or_na(&report.detailed_suggestions).lines() {
        if line.trim().is_empty() {
            html.push_str("<br/>");
        } else {
            html.push_str(&format!("<p class=\"line\">{}</p>", text(line.trim_end())));
        }
    }

    html.push_str("</body></html>");
    html
}

fn push_items(html: &mut String, items: &[AtsItem], fallback: &str, class: &str) {
    for item in items {
        html.push_str(&format!(
            "<p class=\"item {}\">- {}</p>",
            class,
            text(&item.display_line(fallback))
        ));
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Escape for HTML after folding the text into Latin-1
fn text(value: &str) -> String {
    html_escape(&to_latin1(value))
}

/// The built-in PDF fonts only cover Latin-1; anything else becomes `?`.
fn to_latin1(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\t' => ' ',
            c if c.is_control() => ' ',
            c if (c as u32) <= 0xff => c,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{PredictedRole, Score};
    use lopdf::Document;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            overall_score: Score::Value(72.0),
            score_reason: "Clear structure, few metrics".to_string(),
            summary_rewrite: "Backend engineer with eight years of experience.".to_string(),
            key_skills: vec!["Rust".to_string()],
            ats_risks: vec![AtsItem::Text("Two-column layout".to_string())],
            ats_improvements: vec![AtsItem::Detailed {
                risk: None,
                item: Some("Keywords".to_string()),
                suggestion: None,
                explanation: None,
            }],
            predicted_roles: vec![PredictedRole::new("SRE", "Ops background")],
            detailed_suggestions: "First line\n\nSecond line".to_string(),
        }
    }

    #[test]
    fn test_renders_loadable_pdf() {
        let bytes = render_report_pdf(&sample_report()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(!doc.get_pages().is_empty());
    }

    #[test]
    fn test_error_report_renders() {
        let bytes = render_report_pdf(&AnalysisReport::failed("quota")).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_report_html_order_and_classes() {
        let html = report_html(&sample_report());

        let title = html.find("AI Resume Analysis Report (72/100)").unwrap();
        let summary = html.find("Suggested Professional Summary").unwrap();
        let risks = html.find("Identified ATS Risks").unwrap();
        let improvements = html.find("Suggestions for ATS Improvement").unwrap();
        let detailed = html
            .find("Detailed Suggestions for Overall Improvement")
            .unwrap();
        assert!(title < summary && summary < risks);
        assert!(risks < improvements && improvements < detailed);

        assert!(html.contains(r#"<p class="item risk">- Two-column layout</p>"#));
        assert!(html.contains(
            r#"<p class="item improvement">- Keywords: No explanation provided.</p>"#
        ));
        assert!(html.contains(r#"<p class="line">First line</p><br/><p class="line">Second line</p>"#));
    }

    #[test]
    fn test_empty_fields_render_as_na() {
        let mut report = sample_report();
        report.score_reason = "  ".to_string();
        let html = report_html(&report);
        assert!(html.contains("<p>Reasoning: N/A</p>"));
    }

    #[test]
    fn test_text_is_escaped_and_latin1() {
        assert_eq!(text("<b>café</b>"), "&lt;b&gt;café&lt;/b&gt;");
        assert_eq!(to_latin1("🚨 \u{201c}ok\u{201d}\tx"), "? \"ok\" x");
    }
}
