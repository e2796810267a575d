// src/core/report_store.rs
//! In-memory report cache keyed by a digest of the extracted resume text

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::types::report::AnalysisReport;

const REPORT_ID_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct StoredReport {
    pub report: AnalysisReport,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

impl StoredReport {
    pub fn new(report: AnalysisReport, file_name: impl Into<String>) -> Self {
        Self {
            report,
            file_name: file_name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Stable key for a resume: identical text always maps to the same id.
pub fn report_id(resume_text: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(resume_text.as_bytes()));
    digest[..REPORT_ID_LEN].to_string()
}

/// Report ids are lowercase hex of a fixed length
pub fn is_valid_report_id(id: &str) -> bool {
    id.len() == REPORT_ID_LEN && id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

#[derive(Default)]
pub struct ReportStore {
    reports: RwLock<HashMap<String, StoredReport>>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous entry for this id, if any.
    pub async fn insert(&self, id: String, entry: StoredReport) -> Option<StoredReport> {
        self.reports.write().await.insert(id, entry)
    }

    pub async fn get(&self, id: &str) -> Option<StoredReport> {
        self.reports.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }
}
