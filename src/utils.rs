// src/utils.rs
use std::path::{Path, PathBuf};

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Per-company CSV file name: `<company>_jobs.csv`, whitespace runs collapsed
/// to `_`, lowercased.
pub fn company_file_name(company: &str) -> String {
    let raw = format!("{}_jobs.csv", company);
    WHITESPACE_RUN.replace_all(&raw, "_").to_lowercase()
}

/// Build the per-company output path inside the individual CSV directory
pub fn company_output_path(individual_dir: &Path, company: &str) -> PathBuf {
    individual_dir.join(company_file_name(company))
}

/// Mask a bearer token for display, keeping only the last four characters
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// Case-insensitive company name comparison used for duplicate detection
pub fn same_company(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
