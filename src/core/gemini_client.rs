// src/core/gemini_client.rs
//! Gemini REST client behind the `ContentGenerator` seam

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::app_log;
use crate::core::config_manager::GeminiConfig;
use crate::types::response::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Anything that turns a prompt into model text.
#[rocket::async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[rocket::async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("GEMINI_API_KEY environment variable not set")?;

        let url = self.endpoint();
        app_log!(info, "Calling Gemini model {} ({} prompt chars)", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::json_prompt(prompt))
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Gemini API response")?;

        if !status.is_success() {
            let message = api_error_message(&body).unwrap_or(body);
            app_log!(error, "Gemini API error {}: {}", status, message);
            anyhow::bail!("Gemini API returned error {}: {}", status, message);
        }

        let text = reply_text(&body)?;
        app_log!(info, "Received Gemini reply ({} chars)", text.len());
        Ok(text)
    }
}

/// Extract model text from a successful `generateContent` body
pub fn reply_text(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).context("Failed to parse Gemini API response")?;

    if let Some(reason) = parsed.block_reason() {
        anyhow::bail!("Prompt was blocked by the model: {}", reason);
    }

    match parsed.first_text() {
        Some(text) => Ok(text),
        None => {
            let finish = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            anyhow::bail!("Gemini returned no text ({})", finish)
        }
    }
}

fn api_error_message(body: &str) -> Option<String> {
    let envelope: ApiErrorEnvelope = serde_json::from_str(body).ok()?;
    let error = envelope.error;
    Some(match error.status {
        Some(status) => format!("{} ({})", error.message, status),
        None => error.message,
    })
}
