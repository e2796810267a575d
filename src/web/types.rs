// src/web/types.rs

use rocket::data::Capped;
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::Serialize;
use rocket::{Request, Response};

/// Attachment download with caching disabled
pub struct PdfResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl PdfResponse {
    pub fn with_filename(data: Vec<u8>, filename: String) -> Self {
        Self { data, filename }
    }
}

impl<'r> Responder<'r, 'static> for PdfResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::PDF)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename={}", self.filename),
            )
            .raw_header("Cache-Control", "no-cache, no-store, must-revalidate")
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    /// Capped at the `file` limit; an oversized upload arrives incomplete.
    pub resume: Option<Capped<TempFile<'f>>>,
}

pub struct ServerConfig {
    pub max_upload_bytes: u64,
    pub model: String,
    pub model_configured: bool,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: &str, error_code: &str, suggestions: &[&str]) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error: error.to_string(),
            error_code: error_code.to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthData {
    pub stored_reports: usize,
    pub model: String,
    pub model_configured: bool,
}
