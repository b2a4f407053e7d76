// src/core/csv_export.rs
//! CSV serialization of normalized jobs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::core::FsOps;
use crate::types::NormalizedJob;
use crate::utils::company_output_path;

pub struct CsvExporter {
    individual_dir: PathBuf,
    combined_path: PathBuf,
}

impl CsvExporter {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            individual_dir: config.individual_dir.clone(),
            combined_path: config.combined_path.clone(),
        }
    }

    /// Render rows with a header line; column order follows `NormalizedJob`
    pub fn to_csv_bytes(jobs: &[NormalizedJob]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for job in jobs {
            writer
                .serialize(job)
                .with_context(|| format!("Failed to serialize job {}", job.id))?;
        }
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))
    }

    /// Write `jobs` to `path`. An empty slice writes nothing and yields `None`.
    pub async fn write_jobs(path: &Path, jobs: &[NormalizedJob]) -> Result<Option<PathBuf>> {
        if jobs.is_empty() {
            return Ok(None);
        }

        let bytes = Self::to_csv_bytes(jobs)?;
        FsOps::write_file_safe(path, &bytes).await?;
        Ok(Some(path.to_path_buf()))
    }

    pub async fn save_company_jobs(
        &self,
        company: &str,
        jobs: &[NormalizedJob],
    ) -> Result<Option<PathBuf>> {
        if jobs.is_empty() {
            warn!("No job data to save for {}.", company);
            return Ok(None);
        }

        let path = company_output_path(&self.individual_dir, company);
        let written = Self::write_jobs(&path, jobs)
            .await
            .with_context(|| format!("Error writing CSV for {}", company))?;
        info!("Jobs successfully saved: {}", path.display());
        Ok(written)
    }

    pub async fn save_all_jobs(&self, jobs: &[NormalizedJob]) -> Result<Option<PathBuf>> {
        if jobs.is_empty() {
            warn!("No job data to save to combined CSV.");
            return Ok(None);
        }

        let written = Self::write_jobs(&self.combined_path, jobs)
            .await
            .context("Error writing combined CSV")?;
        info!(
            "All jobs successfully saved to: {}",
            self.combined_path.display()
        );
        Ok(written)
    }
}
