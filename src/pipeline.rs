// src/pipeline.rs
//! Sequential fetch → normalize → (translate) → write over every company

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::core::postings_client::log_fetch_failure;
use crate::core::{CsvExporter, PostingsClient};
use crate::credentials::CredentialStore;
use crate::normalizer::process_job_data;
use crate::translation::{TranslationBackend, Translator};
use crate::types::{BatchReport, CompanyCredential, CompanyReport, CompanyStatus, NormalizedJob};

pub type DynTranslator = Translator<Box<dyn TranslationBackend>>;

pub struct JobPipeline {
    credentials: CredentialStore,
    client: PostingsClient,
    exporter: CsvExporter,
    translator: Option<DynTranslator>,
}

impl JobPipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            credentials: CredentialStore::new(&config.credentials_path),
            client: PostingsClient::new(config)?,
            exporter: CsvExporter::new(config),
            translator: None,
        })
    }

    /// Translate every role description before it is written
    pub fn with_translator(mut self, translator: DynTranslator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Run the whole batch. Only a missing or empty credential file is an
    /// error; every per-company failure is recorded in the report instead.
    pub async fn run(&self) -> Result<BatchReport> {
        let started_at = Utc::now();
        let companies = self.credentials.load().await?;

        if companies.is_empty() {
            anyhow::bail!("No valid company data found.");
        }

        info!("Processing {} companies...", companies.len());

        let mut reports = Vec::with_capacity(companies.len());
        let mut all_jobs: Vec<NormalizedJob> = Vec::new();

        for credential in &companies {
            let (report, jobs) = self.process_company(credential).await;
            all_jobs.extend(jobs);
            reports.push(report);
        }

        let (combined_output, combined_error) = match self.exporter.save_all_jobs(&all_jobs).await {
            Ok(path) => (path, None),
            Err(e) => {
                error!("{:#}", e);
                (None, Some(format!("{:#}", e)))
            }
        };

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            companies: reports,
            combined_output,
            combined_error,
            total_jobs: all_jobs.len(),
        };

        info!(
            "All companies processed! {} succeeded, {} failed, {} jobs total",
            report.succeeded(),
            report.failed(),
            report.total_jobs
        );
        Ok(report)
    }

    /// One company's unit of work. Jobs that were fetched and normalized are
    /// returned for the combined file even when the company file failed.
    async fn process_company(
        &self,
        credential: &CompanyCredential,
    ) -> (CompanyReport, Vec<NormalizedJob>) {
        let company = credential.company_name.as_str();

        let response = match self.client.try_fetch_jobs(credential).await {
            Ok(response) => response,
            Err(e) => {
                log_fetch_failure(company, &e);
                warn!("Skipping {}: no postings fetched", company);
                let report =
                    CompanyReport::failed(company, CompanyStatus::FetchError, format!("{:#}", e));
                return (report, Vec::new());
            }
        };

        let mut jobs = process_job_data(Some(&response), company);
        if jobs.is_empty() {
            let report = CompanyReport::failed(company, CompanyStatus::EmptyResult, "no postings returned");
            return (report, jobs);
        }

        if let Some(translator) = &self.translator {
            for job in jobs.iter_mut() {
                job.role_description = translator.translate(&job.role_description).await;
            }
        }

        let report = match self.exporter.save_company_jobs(company, &jobs).await {
            Ok(Some(path)) => CompanyReport::ok(company, jobs.len(), path),
            Ok(None) => CompanyReport::failed(company, CompanyStatus::EmptyResult, "no postings returned"),
            Err(e) => {
                error!("{:#}", e);
                let mut report =
                    CompanyReport::failed(company, CompanyStatus::WriteError, format!("{:#}", e));
                report.jobs = jobs.len();
                report
            }
        };

        (report, jobs)
    }
}
