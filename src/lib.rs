// src/lib.rs
//! Resume analysis service: PDF upload, text extraction, model-backed
//! evaluation, and report rendering as HTML, JSON and PDF.

pub mod logging;

pub mod cli;
pub mod core;
pub mod types;
pub mod utils;
pub mod web;

pub use crate::core::{ConfigManager, ReportStore, ResumeAnalyzer};
pub use crate::types::report::AnalysisReport;
pub use crate::web::{build_rocket, start_web_server};
