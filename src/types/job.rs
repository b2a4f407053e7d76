use serde::{Deserialize, Serialize};

/// One row of the credential file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCredential {
    pub company_name: String,
    pub slug: String,
    pub auth_token: String,
}

impl CompanyCredential {
    pub fn new(company_name: &str, slug: &str, auth_token: &str) -> Self {
        Self {
            company_name: company_name.trim().to_string(),
            slug: slug.trim().to_string(),
            auth_token: auth_token.trim().to_string(),
        }
    }
}

/// Output row shared by the per-company and combined CSV files.
/// Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedJob {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Remote")]
    pub remote: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "EmploymentType")]
    pub employment_type: String,
    #[serde(rename = "DatePosted")]
    pub date_posted: String,
    #[serde(rename = "RoleDescription")]
    pub role_description: String,
}
