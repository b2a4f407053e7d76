//! Scrapes the zensearch job-postings API into per-company and combined CSV
//! files.

pub mod company_cli;
pub mod config;
pub mod core;
pub mod credentials;
pub mod environment;
pub mod normalizer;
pub mod pipeline;
pub mod translation;
pub mod types;
pub mod utils;

pub use config::PipelineConfig;
pub use credentials::CredentialStore;
pub use pipeline::JobPipeline;
