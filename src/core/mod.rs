// src/core/mod.rs
//! HTTP and file-system services used by the ingestion pipeline

pub mod csv_export;
pub mod fs_ops;
pub mod postings_client;

pub use csv_export::CsvExporter;
pub use fs_ops::FsOps;
pub use postings_client::PostingsClient;
