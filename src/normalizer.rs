// src/normalizer.rs
//! Maps raw API postings onto the fixed CSV schema

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::types::{NormalizedJob, PostingsResponse, RawPosting};

const NOT_AVAILABLE: &str = "N/A";
const NOT_SPECIFIED: &str = "Not specified";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Normalize every posting in `response` for `company`. An absent or empty
/// result yields no rows.
pub fn process_job_data(response: Option<&PostingsResponse>, company: &str) -> Vec<NormalizedJob> {
    let postings = match response {
        Some(response) if !response.postings.is_empty() => &response.postings,
        _ => {
            warn!("No jobs found for {}. Skipping.", company);
            return Vec::new();
        }
    };

    postings
        .iter()
        .map(|posting| normalize_posting(posting, company))
        .collect()
}

pub fn normalize_posting(posting: &RawPosting, company: &str) -> NormalizedJob {
    let company = non_empty(Some(company))
        .or_else(|| non_empty(posting.company.as_ref().and_then(|c| c.name.as_deref())))
        .unwrap_or(NOT_AVAILABLE);

    NormalizedJob {
        id: scalar_text(&posting.id).unwrap_or_default(),
        title: posting.link_text.clone().unwrap_or_default(),
        link: posting.link_href.clone().unwrap_or_default(),
        company: company.to_string(),
        location: non_empty(posting.city.as_deref())
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        remote: if is_truthy(&posting.is_remote) { "Yes" } else { "No" }.to_string(),
        experience: truthy_text(&posting.years_of_experience)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        employment_type: truthy_text(&posting.employment_type)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        date_posted: posting.created_at.clone().unwrap_or_default(),
        role_description: clean_description(posting.content_html.as_deref().unwrap_or_default()),
    }
}

/// Strip tags, NFKC-normalize, trim, then drop anything outside ASCII.
/// Order matters: characters surfaced by the normalization step are
/// filtered by the final pass.
///
/// Only `<...>` runs are removed. A stray `>` survives, a stray `<` eats text
/// up to the next `>`, and entities such as `&amp;` are left encoded.
pub fn clean_description(html: &str) -> String {
    let stripped = HTML_TAG.replace_all(html, "");
    let normalized: String = stripped.nfkc().collect();
    normalized.trim().chars().filter(|c| c.is_ascii()).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// JavaScript truthiness for JSON scalars
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_text(value: &Value) -> Option<String> {
    if is_truthy(value) {
        scalar_text(value)
    } else {
        None
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
