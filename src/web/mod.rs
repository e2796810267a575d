// src/web/mod.rs

pub mod handlers;
pub mod pages;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::form::Form;
use rocket::http::{CookieJar, Status};
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::serde::json::Json;
use rocket::{catchers, get, post, routes, Build, Request, Rocket, State};
use std::sync::Arc;

use crate::app_log;
use crate::core::{ConfigManager, ContentGenerator, GeminiClient, ReportStore, ResumeAnalyzer};
use crate::types::report::AnalysisReport;

#[get("/")]
pub async fn home(
    flash: Option<FlashMessage<'_>>,
    jar: &CookieJar<'_>,
    config: &State<ServerConfig>,
) -> RawHtml<String> {
    handlers::home_handler(flash, jar, config).await
}

#[post("/analyze", data = "<upload>")]
pub async fn analyze(
    upload: Form<ResumeUploadForm<'_>>,
    jar: &CookieJar<'_>,
    config: &State<ServerConfig>,
    analyzer: &State<ResumeAnalyzer>,
    store: &State<ReportStore>,
) -> Result<Redirect, Flash<Redirect>> {
    handlers::analyze_handler(upload, jar, config, analyzer, store).await
}

#[get("/report/<report_id>")]
pub async fn show_report(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<RawHtml<String>, Redirect> {
    handlers::show_report_handler(report_id, store).await
}

#[get("/report/<report_id>/data")]
pub async fn report_data(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<Json<AnalysisReport>, (Status, Json<ErrorResponse>)> {
    handlers::report_data_handler(report_id, store).await
}

#[get("/report/<report_id>/download")]
pub async fn download_report(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<PdfResponse, (Status, Json<ErrorResponse>)> {
    handlers::download_report_handler(report_id, store).await
}

#[get("/report/<report_id>/draft")]
pub async fn draft_report(
    report_id: &str,
    store: &State<ReportStore>,
) -> Result<RawHtml<String>, Redirect> {
    handlers::draft_report_handler(report_id, store).await
}

#[get("/health")]
pub async fn health(
    config: &State<ServerConfig>,
    store: &State<ReportStore>,
) -> Json<DataResponse<HealthData>> {
    handlers::health_handler(config, store).await
}

// Error catchers

#[rocket::catch(404)]
pub fn not_found(req: &Request<'_>) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        &format!("No route for {}", req.uri().path()),
        "NOT_FOUND",
        &["Start from the home page at /"],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Uploaded file is too large",
        "FILE_TOO_LARGE",
        &["Upload a smaller PDF"],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Invalid upload form",
        "BAD_REQUEST",
        &["Submit the form with a single PDF in the 'resume' field"],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Internal server error",
        "INTERNAL_ERROR",
        &[
            "Try again in a few moments",
            "Contact support if the problem persists",
        ],
    ))
}

/// Assemble the application. `generator` is the model backend.
pub fn build_rocket(config: &ConfigManager, generator: Arc<dyn ContentGenerator>) -> Rocket<Build> {
    let max_upload = config.max_upload_bytes();
    // A capped `file` reaches the handler as incomplete; the form itself gets
    // headroom for multipart framing.
    let limits = Limits::default()
        .limit("file", max_upload.bytes())
        .limit("data-form", max_upload.saturating_add(1024 * 1024).bytes());

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port))
        .merge(("secret_key", config.cookie_secret()))
        .merge(("limits", limits));

    let server_config = ServerConfig {
        max_upload_bytes: max_upload,
        model: config.gemini.model.clone(),
        model_configured: config.gemini.api_key.is_some(),
    };

    rocket::custom(figment)
        .manage(server_config)
        .manage(ResumeAnalyzer::new(generator))
        .manage(ReportStore::new())
        .register(
            "/",
            catchers![not_found, payload_too_large, unprocessable, internal_error],
        )
        .mount(
            "/",
            routes![
                home,
                analyze,
                show_report,
                report_data,
                download_report,
                draft_report,
                health,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let generator = Arc::new(GeminiClient::new(&config.gemini)?);

    app_log!(info, "Starting resume analyzer server");
    app_log!(
        info,
        "Server: http://{}:{}",
        config.server.address,
        config.server.port
    );
    app_log!(info, "Model: {}", config.gemini.model);

    let _rocket = build_rocket(&config, generator)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;

    Ok(())
}
