// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_log;
use crate::core::pdf_renderer::render_report_pdf;
use crate::core::report_store::report_id;
use crate::core::text_extractor::extract_text;
use crate::core::{ConfigManager, GeminiClient, ResumeAnalyzer};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "Analyze PDF resumes with a generative model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the web server (default)
    Serve,
    /// Analyze a single resume without starting the server
    Analyze {
        /// PDF resume to analyze
        file: PathBuf,
        /// Write the JSON report here instead of stdout
        #[arg(long)]
        json: Option<PathBuf>,
        /// Also write the formatted PDF report
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

pub async fn handle_analyze_command(
    config: &ConfigManager,
    file: PathBuf,
    json: Option<PathBuf>,
    pdf: Option<PathBuf>,
) -> Result<()> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .context("Text extraction task failed")??;
    let id = report_id(&text);
    app_log!(info, "Analyzing {} (report id {})", file.display(), id);

    let analyzer = ResumeAnalyzer::new(Arc::new(GeminiClient::new(&config.gemini)?));
    let report = analyzer.analyze(&text).await;
    if report.is_failure() {
        app_log!(warn, "{}", report.score_reason);
    }

    let rendered = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    match json {
        Some(path) => {
            tokio::fs::write(&path, rendered)
                .await
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            app_log!(info, "Wrote JSON report to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if let Some(path) = pdf {
        let data = render_report_pdf(&report)?;
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        app_log!(info, "Wrote PDF report to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["resume-analyzer"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json_logs);
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "resume-analyzer",
            "analyze",
            "cv.pdf",
            "--pdf",
            "out.pdf",
            "--json-logs",
        ])
        .unwrap();

        assert!(cli.json_logs);
        match cli.command {
            Some(Command::Analyze { file, json, pdf }) => {
                assert_eq!(file, PathBuf::from("cv.pdf"));
                assert!(json.is_none());
                assert_eq!(pdf, Some(PathBuf::from("out.pdf")));
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_file() {
        assert!(Cli::try_parse_from(["resume-analyzer", "analyze"]).is_err());
    }
}
