// src/company_cli.rs
//! Interactive data entry for the credential file

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::info;

use crate::credentials::CredentialStore;
use crate::types::CompanyCredential;

/// Values supplied up front (e.g. as flags); anything missing is prompted for
#[derive(Debug, Default, Clone)]
pub struct CompanyInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub token: Option<String>,
}

/// Accept a company name only when it is non-empty and not already in the
/// store, ignoring case. The error text is what the prompt shows before
/// asking again.
pub fn check_new_company_name(store: &CredentialStore, name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Company name cannot be empty".to_string());
    }
    match store.contains_company(name) {
        Ok(false) => Ok(()),
        Ok(true) => Err(format!(
            "Company \"{}\" already exists. Please enter a different name.",
            name
        )),
        Err(e) => Err(format!("{:#}", e)),
    }
}

pub fn check_non_empty(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("Value cannot be empty".to_string())
    } else {
        Ok(())
    }
}

/// Collect one company and append it to the store. Prompted names are
/// re-asked until unique; a duplicate given up front is an error.
pub fn add_company(store: &CredentialStore, preset: CompanyInput) -> Result<CompanyCredential> {
    let theme = ColorfulTheme::default();

    let company_name = match preset.name {
        Some(name) => {
            check_new_company_name(store, &name).map_err(anyhow::Error::msg)?;
            name
        }
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Company Name")
            .validate_with(|input: &String| check_new_company_name(store, input))
            .interact_text()?,
    };

    let slug = match preset.slug.filter(|s| check_non_empty(s).is_ok()) {
        Some(slug) => slug,
        None => prompt_non_empty(&theme, "Slug")?,
    };
    let auth_token = match preset.token.filter(|t| check_non_empty(t).is_ok()) {
        Some(token) => token,
        None => prompt_non_empty(&theme, "Authorization Token")?,
    };

    register_company(store, &company_name, &slug, &auth_token)
}

/// Append an already-collected company. Shared by the prompt flow and by
/// callers that have every value in hand.
pub fn register_company(
    store: &CredentialStore,
    name: &str,
    slug: &str,
    token: &str,
) -> Result<CompanyCredential> {
    let credential = CompanyCredential::new(name, slug, token);
    store.append(&credential)?;

    println!("✅ Data written successfully to {}", store.path().display());
    info!("Added company {} ({})", credential.company_name, credential.slug);
    Ok(credential)
}

fn prompt_non_empty(theme: &ColorfulTheme, label: &str) -> Result<String> {
    let value = Input::<String>::with_theme(theme)
        .with_prompt(label)
        .validate_with(|input: &String| check_non_empty(input))
        .interact_text()?;
    Ok(value)
}
