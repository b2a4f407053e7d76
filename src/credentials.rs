// src/credentials.rs
//! Flat CSV store of company → slug → bearer token

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::FsOps;
use crate::types::CompanyCredential;
use crate::utils::same_company;

pub const CREDENTIAL_HEADER: [&str; 3] = ["Company Name", "Slug", "Authorization Token"];

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed row in file order. Does not deduplicate.
    pub async fn load(&self) -> Result<Vec<CompanyCredential>> {
        if !self.path.exists() {
            anyhow::bail!("CSV file not found: {}", self.path.display());
        }

        let content = FsOps::read_file_safe(&self.path).await?;
        Ok(Self::parse(&content))
    }

    /// Parse credential CSV content. Rows that do not have exactly three
    /// non-empty columns are skipped with a warning.
    pub fn parse(content: &str) -> Vec<CompanyCredential> {
        let mut reader = Self::reader(content);

        match reader.headers() {
            Ok(headers) => {
                let matches = headers.len() == CREDENTIAL_HEADER.len()
                    && headers
                        .iter()
                        .zip(CREDENTIAL_HEADER)
                        .all(|(found, expected)| found.eq_ignore_ascii_case(expected));
                if !matches && !headers.is_empty() {
                    warn!(
                        "Unexpected credential header {:?}, expected {:?}",
                        headers.iter().collect::<Vec<_>>(),
                        CREDENTIAL_HEADER
                    );
                }
            }
            Err(e) => warn!("Could not read credential header: {}", e),
        }

        let mut credentials = Vec::new();
        for result in reader.records() {
            match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    let well_formed =
                        record.len() == 3 && record.iter().all(|value| !value.is_empty());
                    if !well_formed {
                        warn!(
                            "Skipping malformed row {}: {}",
                            line,
                            record.iter().collect::<Vec<_>>().join(",")
                        );
                        continue;
                    }
                    credentials.push(CompanyCredential::new(&record[0], &record[1], &record[2]));
                }
                Err(e) => warn!("Skipping unparseable row: {}", e),
            }
        }

        credentials
    }

    /// Case-insensitive lookup on the company column of every data row.
    /// Blocking, since it backs the interactive prompt's validator.
    pub fn contains_company(&self, company_name: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read file: {}", self.path.display()))?;

        let mut reader = Self::reader(&content);
        let found = reader
            .records()
            .filter_map(|record| record.ok())
            .any(|record| {
                record
                    .get(0)
                    .is_some_and(|existing| same_company(existing, company_name))
            });
        Ok(found)
    }

    /// Append one row, writing the header first when the file is new.
    /// Refuses a company name that already exists (ignoring case).
    pub fn append(&self, credential: &CompanyCredential) -> Result<()> {
        if self.contains_company(&credential.company_name)? {
            anyhow::bail!(
                "Company \"{}\" already exists in {}",
                credential.company_name,
                self.path.display()
            );
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let existing = if self.path.exists() {
            fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read file: {}", self.path.display()))?
        } else {
            String::new()
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        if existing.trim().is_empty() {
            writeln!(file, "{}", CREDENTIAL_HEADER.join(","))
                .context("Failed to write credential header")?;
        } else if !existing.ends_with('\n') {
            writeln!(file).context("Failed to terminate last credential row")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record([
                &credential.company_name,
                &credential.slug,
                &credential.auth_token,
            ])
            .context("Failed to append credential row")?;
        writer.flush().context("Failed to flush credential file")?;

        info!("Data written successfully to {}", self.path.display());
        Ok(())
    }

    fn reader(content: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes())
    }
}
