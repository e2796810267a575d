// src/core/analyzer.rs
//! Prompt → model → structured report

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::app_log;
use crate::core::gemini_client::ContentGenerator;
use crate::core::prompt::build_analysis_prompt;
use crate::types::report::AnalysisReport;

pub struct ResumeAnalyzer {
    generator: Arc<dyn ContentGenerator>,
}

impl ResumeAnalyzer {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    /// Always yields a report; failures become `AnalysisReport::failed`.
    pub async fn analyze(&self, resume_text: &str) -> AnalysisReport {
        match self.try_analyze(resume_text).await {
            Ok(report) => report,
            Err(e) => {
                app_log!(
                    error,
                    "Error during analysis (JSON parsing or API issue): {:#}",
                    e
                );
                AnalysisReport::failed(format!("{:#}", e))
            }
        }
    }

    async fn try_analyze(&self, resume_text: &str) -> Result<AnalysisReport> {
        let prompt = build_analysis_prompt(resume_text);
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .context("Model call failed")?;

        let report = parse_model_reply(&raw)?;
        app_log!(debug, "ATS risks structure: {:?}", report.ats_risks);
        Ok(report)
    }
}

/// Parse a model reply, tolerating Markdown code fences and stray prose
pub fn parse_model_reply(raw: &str) -> Result<AnalysisReport> {
    let cleaned = strip_code_fence(raw);

    match serde_json::from_str::<AnalysisReport>(cleaned) {
        Ok(report) => Ok(report),
        Err(first_err) => {
            let object = outermost_object(cleaned).ok_or_else(|| {
                anyhow::anyhow!("Model reply is not valid JSON: {}", first_err)
            })?;
            serde_json::from_str(object)
                .with_context(|| format!("Model reply is not valid JSON: {}", first_err))
        }
    }
}

/// Remove a surrounding ```json ... ``` (or bare ```) fence
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") up to the end of the opening line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches("json"),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
