// src/types/mod.rs
pub mod job;
pub mod posting;
pub mod report;

pub use job::{CompanyCredential, NormalizedJob};
pub use posting::{PostingsQuery, PostingsResponse, RawPosting};
pub use report::{BatchReport, CompanyReport, CompanyStatus};
