// src/translation/google.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::TranslationBackend;
use crate::config::PipelineConfig;

/// Backend for the public `translate_a/single` endpoint, source language
/// auto-detected
pub struct GoogleTranslateBackend {
    client: reqwest::Client,
    url: String,
}

impl GoogleTranslateBackend {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: config.translate_url.clone(),
        })
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        debug!("Calling translation service for {} chars", text.chars().count());

        let response = self
            .client
            .post(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .context("Failed to call translation service")?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            anyhow::bail!("Translation service returned 429: too many requests");
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Translation failed with status {}: {}", status, error_text);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse translation response")?;
        parse_translation(&body)
    }
}

/// The first element of the response holds `[translated, original, ..]`
/// segments; the translation is their concatenation.
fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .context("Unexpected translation response shape")?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}
