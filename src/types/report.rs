use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    Ok,
    FetchError,
    EmptyResult,
    WriteError,
}

/// Outcome of one company's fetch → normalize → write unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyReport {
    pub company: String,
    pub status: CompanyStatus,
    pub detail: Option<String>,
    pub jobs: usize,
    pub output: Option<PathBuf>,
}

impl CompanyReport {
    pub fn ok(company: &str, jobs: usize, output: PathBuf) -> Self {
        Self {
            company: company.to_string(),
            status: CompanyStatus::Ok,
            detail: None,
            jobs,
            output: Some(output),
        }
    }

    pub fn failed(company: &str, status: CompanyStatus, detail: impl Into<String>) -> Self {
        Self {
            company: company.to_string(),
            status,
            detail: Some(detail.into()),
            jobs: 0,
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub companies: Vec<CompanyReport>,
    pub combined_output: Option<PathBuf>,
    pub combined_error: Option<String>,
    pub total_jobs: usize,
}

impl BatchReport {
    pub fn count(&self, status: CompanyStatus) -> usize {
        self.companies.iter().filter(|c| c.status == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(CompanyStatus::Ok)
    }

    pub fn failed(&self) -> usize {
        self.companies.len() - self.succeeded()
    }
}
