use serde::{Deserialize, Serialize};
use serde_json::Value;

// ===== Postings API Types =====

/// Request body for a single-company postings query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostingsQuery {
    pub query_type: String,
    pub limit: u32,
    pub slug: String,
    pub since: String,
    pub skip: u32,
}

impl PostingsQuery {
    /// First page of every posting for `slug`
    pub fn single_company(slug: &str, limit: u32) -> Self {
        Self {
            query_type: "single_company".to_string(),
            limit,
            slug: slug.to_string(),
            since: "all".to_string(),
            skip: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingsResponse {
    #[serde(default)]
    pub postings: Vec<RawPosting>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingCompany {
    pub name: Option<String>,
}

/// One posting as returned by the API. Only the consumed fields are typed;
/// scalars whose JSON type varies between postings are kept as `Value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPosting {
    #[serde(default)]
    pub id: Value,
    pub link_text: Option<String>,
    pub link_href: Option<String>,
    pub company: Option<PostingCompany>,
    pub city: Option<String>,
    #[serde(default)]
    pub is_remote: Value,
    #[serde(default)]
    pub years_of_experience: Value,
    #[serde(default)]
    pub employment_type: Value,
    pub created_at: Option<String>,
    #[serde(rename = "content__html")]
    pub content_html: Option<String>,
}
