// src/core/mod.rs
//! Core services: configuration, extraction, model access, storage, rendering

pub mod analyzer;
pub mod config_manager;
pub mod gemini_client;
pub mod pdf_renderer;
pub mod prompt;
pub mod report_store;
pub mod text_extractor;

pub use analyzer::ResumeAnalyzer;
pub use config_manager::ConfigManager;
pub use gemini_client::{ContentGenerator, GeminiClient};
pub use report_store::{ReportStore, StoredReport};
