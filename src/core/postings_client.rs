// src/core/postings_client.rs
//! HTTP client for the zensearch postings API

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, REFERER};
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::types::{CompanyCredential, PostingsQuery, PostingsResponse};

pub struct PostingsClient {
    client: reqwest::Client,
    api_url: String,
    referer: String,
    page_size: u32,
}

impl PostingsClient {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            referer: config.referer.clone(),
            page_size: config.page_size,
        })
    }

    /// Fetch the first page of postings for one company. Any failure is
    /// logged and reported as `None`. For library callers that only want
    /// the postings; the batch pipeline uses `try_fetch_jobs` to keep the
    /// error for its report.
    pub async fn fetch_jobs(&self, credential: &CompanyCredential) -> Option<PostingsResponse> {
        match self.try_fetch_jobs(credential).await {
            Ok(response) => Some(response),
            Err(e) => {
                log_fetch_failure(&credential.company_name, &e);
                None
            }
        }
    }

    /// Single POST, always `skip: 0`; no retry at this layer
    pub async fn try_fetch_jobs(&self, credential: &CompanyCredential) -> Result<PostingsResponse> {
        info!(
            "Fetching jobs for: {} ({})",
            credential.company_name, credential.slug
        );

        let body = PostingsQuery::single_company(&credential.slug, self.page_size);

        let response = self
            .client
            .post(&self.api_url)
            .header(ACCEPT, "*/*")
            .header(AUTHORIZATION, format!("Bearer {}", credential.auth_token))
            .header(CONTENT_TYPE, "application/json")
            .header(REFERER, &self.referer)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", self.api_url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("HTTP error! Status: {}: {}", status, error_text);
        }

        let postings: PostingsResponse = response
            .json()
            .await
            .context("Failed to parse postings response")?;

        info!(
            "Received {} postings for {}",
            postings.postings.len(),
            credential.company_name
        );
        Ok(postings)
    }
}

/// The one error line emitted per failed fetch
pub fn log_fetch_failure(company: &str, err: &anyhow::Error) {
    error!("Failed to fetch jobs for {}: {:#}", company, err);
}
