// src/web/pages.rs
//! Server-rendered HTML pages built from the embedded templates

use std::collections::HashMap;

use crate::types::report::AnalysisReport;
use crate::utils::{format_size, html_escape};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const RESULTS_TEMPLATE: &str = include_str!("../../templates/results.html");
const DRAFT_TEMPLATE: &str = include_str!("../../templates/draft.html");

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashKind {
    Error,
    Success,
}

/// Substitute `{{name}}` placeholders in one pass. Values are inserted
/// verbatim, so callers escape them first. Unknown placeholders are kept.
pub fn process_variables(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn index_page(flash: Option<(FlashKind, &str)>, max_upload_bytes: u64) -> String {
    let flash_html = match flash {
        Some((kind, message)) => {
            let class = match kind {
                FlashKind::Error => "error",
                FlashKind::Success => "success",
            };
            format!(
                r#"<div class="flash {}" role="alert">{}</div>"#,
                class,
                html_escape(message)
            )
        }
        None => String::new(),
    };

    let vars = HashMap::from([
        ("flash", flash_html),
        ("max_upload", format_size(max_upload_bytes)),
    ]);
    process_variables(INDEX_TEMPLATE, &vars)
}

/// Shell page; its script fetches `/report/{id}/data`
pub fn results_page(report_id: &str) -> String {
    let vars = HashMap::from([("report_id", html_escape(report_id))]);
    process_variables(RESULTS_TEMPLATE, &vars)
}

/// Standalone "Modified Resume Draft" page
pub fn draft_page(report: &AnalysisReport) -> String {
    let or_na = |value: &str| {
        if value.trim().is_empty() {
            "N/A".to_string()
        } else {
            html_escape(value)
        }
    };

    let key_skills: String = report
        .key_skills
        .iter()
        .map(|skill| format!("<li>{}</li>", html_escape(skill)))
        .collect();

    let predicted_roles: String = report
        .predicted_roles
        .iter()
        .map(|role| {
            format!(
                "<li><strong>{}</strong>: {}</li>",
                html_escape(&role.title),
                html_escape(&role.explanation)
            )
        })
        .collect();

    let vars = HashMap::from([
        ("score", html_escape(&report.overall_score.to_string())),
        ("summary", or_na(&report.summary_rewrite)),
        ("suggestions", or_na(&report.detailed_suggestions)),
        ("key_skills", key_skills),
        ("predicted_roles", predicted_roles),
    ]);
    process_variables(DRAFT_TEMPLATE, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{PredictedRole, Score};
    use scraper::{Html, Selector};

    fn select_text(html: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_process_variables_single_pass() {
        let vars = HashMap::from([("a", "{{b}}".to_string()), ("b", "x".to_string())]);
        assert_eq!(process_variables("[{{a}}] {{ b }}", &vars), "[{{b}}] x");
        assert_eq!(process_variables("{{missing}} {{", &vars), "{{missing}} {{");
    }

    #[test]
    fn test_index_page_flash_is_escaped() {
        let page = index_page(Some((FlashKind::Error, "<script>bad</script>")), 10 * 1024 * 1024);
        let html = Html::parse_document(&page);

        assert_eq!(select_text(&html, ".flash.error"), vec!["<script>bad</script>"]);
        assert!(page.contains("10.0 MB"));

        let form = Selector::parse("form#upload-form").unwrap();
        let form = html.select(&form).next().unwrap();
        assert_eq!(form.value().attr("action"), Some("/analyze"));
        assert_eq!(form.value().attr("enctype"), Some("multipart/form-data"));
    }

    #[test]
    fn test_index_page_without_flash() {
        let html = Html::parse_document(&index_page(None, 1024 * 1024));
        assert!(select_text(&html, ".flash").is_empty());
    }

    #[test]
    fn test_results_page_embeds_report_id() {
        let html = Html::parse_document(&results_page("0123456789abcdef"));
        let app = Selector::parse("#app").unwrap();
        let app = html.select(&app).next().unwrap();
        assert_eq!(app.value().attr("data-report-id"), Some("0123456789abcdef"));

        let links = Selector::parse("header a").unwrap();
        let hrefs: Vec<_> = html
            .select(&links)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert!(hrefs.contains(&"/report/0123456789abcdef/download"));
    }

    #[test]
    fn test_draft_page_lists_skills_and_roles() {
        let mut report = AnalysisReport::failed("x");
        report.overall_score = Score::Value(88.0);
        report.summary_rewrite = "Builds <fast> systems".to_string();
        report.key_skills = vec!["Rust".to_string(), "Kafka".to_string()];
        report.predicted_roles = vec![PredictedRole::new("Staff Engineer", "Leads teams")];

        let html = Html::parse_document(&draft_page(&report));
        assert_eq!(select_text(&html, ".score-box"), vec!["AI Score: 88/100"]);
        assert_eq!(select_text(&html, "#summary"), vec!["Builds <fast> systems"]);
        assert_eq!(select_text(&html, "#key-skills li"), vec!["Rust", "Kafka"]);
        assert_eq!(
            select_text(&html, "#predicted-roles li"),
            vec!["Staff Engineer: Leads teams"]
        );
    }
}
