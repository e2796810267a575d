// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;

use crate::app_log;
use crate::core::ReportStore;
use crate::web::types::{DataResponse, HealthData, ServerConfig};

pub async fn health_handler(
    config: &State<ServerConfig>,
    store: &State<ReportStore>,
) -> Json<DataResponse<HealthData>> {
    let stored_reports = store.len().await;
    app_log!(debug, "Health check, {} reports in memory", stored_reports);

    Json(DataResponse::success(
        "OK".to_string(),
        HealthData {
            stored_reports,
            model: config.model.clone(),
            model_configured: config.model_configured,
        },
    ))
}
