use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use job_ingest::company_cli::{add_company, CompanyInput};
use job_ingest::core::FsOps;
use job_ingest::environment::EnvironmentConfig;
use job_ingest::translation::{GoogleTranslateBackend, TranslationBackend, Translator};
use job_ingest::utils::mask_token;
use job_ingest::{CredentialStore, JobPipeline};
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "zensearch")]
#[command(about = "Scrape zensearch job postings into CSV files")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding company_data.csv and the CSV outputs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Also write JSON logs to this file (truncated on startup)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch postings for every company and write the CSV files
    Fetch {
        /// Translate role descriptions to English before writing
        #[arg(long)]
        translate: bool,
        /// Write the batch report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Add a company to the credential file
    AddCompany {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    /// List the companies in the credential file
    List,
    /// Translate a text file to English
    Translate {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let json_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(json_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut environment = EnvironmentConfig::load()?;
    if let Some(dir) = &cli.data_dir {
        environment = environment.with_data_path(dir)?;
    }
    environment.ensure_directories().await?;
    let config = environment.pipeline_config();

    info!("Data directory: {}", config.data_dir.display());

    match cli.command {
        Command::Fetch { translate, report } => {
            let mut pipeline = JobPipeline::new(&config)?;
            if translate {
                let backend: Box<dyn TranslationBackend> =
                    Box::new(GoogleTranslateBackend::new(&config)?);
                pipeline = pipeline.with_translator(Translator::new(backend));
            }

            let batch = pipeline.run().await?;

            if let Some(path) = report {
                let json = serde_json::to_vec_pretty(&batch).context("Failed to encode report")?;
                FsOps::write_file_safe(&path, &json).await?;
                info!("Batch report written to {}", path.display());
            }
        }

        Command::AddCompany { name, slug, token } => {
            let store = CredentialStore::new(&config.credentials_path);
            add_company(&store, CompanyInput { name, slug, token })?;
        }

        Command::List => {
            let store = CredentialStore::new(&config.credentials_path);
            let companies = store.load().await?;
            if companies.is_empty() {
                println!("No companies found.");
            } else {
                println!("{:<30} {:<25} {:<20}", "Company", "Slug", "Token");
                println!("{}", "-".repeat(75));
                for company in companies {
                    println!(
                        "{:<30} {:<25} {:<20}",
                        company.company_name,
                        company.slug,
                        mask_token(&company.auth_token)
                    );
                }
            }
        }

        Command::Translate { input, output } => {
            let text = FsOps::read_file_safe(&input).await?;
            let translator = Translator::new(GoogleTranslateBackend::new(&config)?);
            let translated = translator.translate(&text).await;

            match output {
                Some(path) => {
                    FsOps::write_file_safe(&path, translated.as_bytes()).await?;
                    info!("Translation written to {}", path.display());
                }
                None => println!("{}", translated),
            }
        }
    }

    Ok(())
}
