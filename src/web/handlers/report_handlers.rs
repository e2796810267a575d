// src/web/handlers/report_handlers.rs
//! Upload, analysis and report views

use anyhow::{Context, Result};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::{Cookie, CookieJar, Status};
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::serde::json::Json;
use rocket::{uri, State};
use tracing::Instrument;

use crate::core::pdf_renderer::render_report_pdf;
use crate::core::report_store::{is_valid_report_id, report_id};
use crate::core::text_extractor::extract_text;
use crate::core::{ReportStore, ResumeAnalyzer, StoredReport};
use crate::types::report::AnalysisReport;
use crate::utils::{display_file_name, format_size, validate_file_extension};
use crate::web::pages::{self, FlashKind};
use crate::web::types::{ErrorResponse, PdfResponse, ResumeUploadForm, ServerConfig};
use crate::{app_log, app_span};

pub const SESSION_COOKIE: &str = "analysis_id";

type JsonError = (Status, Json<ErrorResponse>);

fn home_redirect() -> Redirect {
    Redirect::to(uri!(crate::web::home))
}

fn flash_home(message: impl Into<String>) -> Flash<Redirect> {
    Flash::error(home_redirect(), message.into())
}

fn not_found(message: &str) -> JsonError {
    (
        Status::NotFound,
        Json(ErrorResponse::new(
            message,
            "REPORT_NOT_FOUND",
            &["Upload the resume again from the home page"],
        )),
    )
}

pub async fn home_handler(
    flash: Option<FlashMessage<'_>>,
    jar: &CookieJar<'_>,
    config: &State<ServerConfig>,
) -> RawHtml<String> {
    jar.remove_private(Cookie::from(SESSION_COOKIE));

    let flash = flash.as_ref().map(|f| {
        let kind = if f.kind() == "success" {
            FlashKind::Success
        } else {
            FlashKind::Error
        };
        (kind, f.message())
    });

    RawHtml(pages::index_page(flash, config.max_upload_bytes))
}

pub async fn analyze_handler(
    mut upload: Form<ResumeUploadForm<'_>>,
    jar: &CookieJar<'_>,
    config: &State<ServerConfig>,
    analyzer: &State<ResumeAnalyzer>,
    store: &State<ReportStore>,
) -> Result<Redirect, Flash<Redirect>> {
    let Some(file) = upload.resume.as_mut() else {
        app_log!(debug, "Upload without a resume field");
        return Ok(home_redirect());
    };

    let file_name = file
        .raw_name()
        .map(|n| display_file_name(n.dangerous_unsafe_unsanitized_raw().as_str()))
        .unwrap_or_default();
    if file_name.is_empty() {
        app_log!(debug, "Upload with an empty file name");
        return Ok(home_redirect());
    }

    let span = app_span!("resume_upload", file = %file_name, size = file.len());
    async move {
        if let Err(e) = validate_file_extension(&file_name, &["pdf"]) {
            app_log!(warn, "Rejected upload: {}", e);
            return Err(flash_home("Only PDF resumes are supported."));
        }

        if !file.is_complete() || file.len() > config.max_upload_bytes {
            app_log!(warn, "Rejected oversized upload");
            return Err(flash_home(format!(
                "File size exceeds the {} limit.",
                format_size(config.max_upload_bytes)
            )));
        }

        if file.len() == 0 {
            return Err(flash_home("The uploaded file is empty."));
        }

        let bytes = match read_upload(file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                app_log!(error, "Failed to save uploaded file: {:#}", e);
                return Err(flash_home("Failed to process the uploaded file. Try again."));
            }
        };

        let text = match tokio::task::spawn_blocking(move || extract_text(&bytes)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                app_log!(warn, "Text extraction failed: {:#}", e);
                return Err(flash_home(format!("Could not read the resume: {}", e)));
            }
            Err(e) => {
                app_log!(error, "Text extraction task failed: {}", e);
                return Err(flash_home("Could not read the resume."));
            }
        };

        let id = report_id(&text);
        let report = analyzer.analyze(&text).await;
        if report.is_failure() {
            app_log!(warn, "Storing error report {} for {}", id, file_name);
        } else {
            app_log!(info, "Stored report {} for {}", id, file_name);
        }

        if let Some(previous) = store
            .insert(id.clone(), StoredReport::new(report, file_name.as_str()))
            .await
        {
            app_log!(
                debug,
                "Replaced report {} (was {} from {})",
                id,
                previous.file_name,
                previous.created_at.to_rfc3339()
            );
        }

        jar.add_private(Cookie::new(SESSION_COOKIE, id.clone()));
        Ok(Redirect::to(uri!(crate::web::show_report(id.as_str()))))
    }
    .instrument(span)
    .await
}

/// Persist the multipart temp file and read it back
async fn read_upload(file: &mut TempFile<'_>) -> Result<Vec<u8>> {
    let temp_path = std::env::temp_dir().join(format!("resume_upload_{}", uuid::Uuid::new_v4()));

    file.persist_to(&temp_path)
        .await
        .with_context(|| format!("Failed to persist upload to {}", temp_path.display()))?;

    let bytes = tokio::fs::read(&temp_path)
        .await
        .with_context(|| format!("Failed to read upload from {}", temp_path.display()));
    let _ = tokio::fs::remove_file(&temp_path).await;

    bytes
}

async fn lookup(store: &ReportStore, id: &str) -> Option<StoredReport> {
    if !is_valid_report_id(id) {
        return None;
    }
    store.get(id).await
}

pub async fn show_report_handler(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<RawHtml<String>, Redirect> {
    match lookup(store, report_id).await {
        Some(_) => Ok(RawHtml(pages::results_page(report_id))),
        None => {
            app_log!(debug, "Unknown report {}, redirecting home", report_id);
            Err(home_redirect())
        }
    }
}

pub async fn report_data_handler(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<Json<AnalysisReport>, JsonError> {
    lookup(store, report_id)
        .await
        .map(|entry| Json(entry.report))
        .ok_or_else(|| not_found("Report not found"))
}

pub async fn download_report_handler(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<PdfResponse, JsonError> {
    let entry = lookup(store, report_id)
        .await
        .ok_or_else(|| not_found("Report data not found for PDF generation."))?;

    let rendered = tokio::task::spawn_blocking(move || render_report_pdf(&entry.report)).await;
    match rendered {
        Ok(Ok(data)) => {
            app_log!(info, "Rendered PDF for report {} ({} bytes)", report_id, data.len());
            Ok(PdfResponse::with_filename(
                data,
                format!("Gemini_Resume_Report_{}.pdf", report_id),
            ))
        }
        Ok(Err(e)) => {
            app_log!(error, "PDF generation failed: {:#}", e);
            Err(pdf_failed())
        }
        Err(e) => {
            app_log!(error, "PDF generation task failed: {}", e);
            Err(pdf_failed())
        }
    }
}

fn pdf_failed() -> JsonError {
    (
        Status::InternalServerError,
        Json(ErrorResponse::new(
            "PDF creation failed. Check server logs.",
            "PDF_RENDER_ERROR",
            &["Try again in a few moments"],
        )),
    )
}

pub async fn draft_report_handler(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<RawHtml<String>, Redirect> {
    lookup(store, report_id)
        .await
        .map(|entry| RawHtml(pages::draft_page(&entry.report)))
        .ok_or_else(home_redirect)
}
