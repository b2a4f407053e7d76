// src/config.rs
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.zensearch.jobs/api/postings";
pub const DEFAULT_REFERER: &str = "https://zensearch.jobs/";
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CREDENTIALS_FILE: &str = "company_data.csv";
const COMBINED_FILE: &str = "job_postings.csv";
const INDIVIDUAL_DIR: &str = "individual_csvs";

/// Paths and endpoints handed to every pipeline component
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub individual_dir: PathBuf,
    pub combined_path: PathBuf,
    pub credentials_path: PathBuf,
    pub api_url: String,
    pub referer: String,
    pub translate_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl PipelineConfig {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            individual_dir: data_dir.join(INDIVIDUAL_DIR),
            combined_path: data_dir.join(COMBINED_FILE),
            credentials_path: data_dir.join(CREDENTIALS_FILE),
            api_url: DEFAULT_API_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_translate_url(mut self, url: impl Into<String>) -> Self {
        self.translate_url = url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}
