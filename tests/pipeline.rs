use anyhow::Result;
use async_trait::async_trait;
use job_ingest::translation::{TranslationBackend, Translator};
use job_ingest::types::CompanyStatus;
use job_ingest::{JobPipeline, PipelineConfig};
use serde_json::json;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "Company Name,Slug,Authorization Token\n";

fn write_credentials(dir: &Path, rows: &str) {
    std::fs::write(dir.join("company_data.csv"), format!("{HEADER}{rows}")).unwrap();
}

fn config_for(dir: &Path, server: &MockServer) -> PipelineConfig {
    PipelineConfig::new(dir).with_api_url(format!("{}/api/postings", server.uri()))
}

fn postings(count: usize) -> serde_json::Value {
    let items: Vec<_> = (1..=count)
        .map(|i| {
            json!({
                "id": i,
                "link_text": format!("Role {i}"),
                "link_href": format!("https://jobs.example.com/{i}"),
                "company": {"name": "Acme Corporation"},
                "city": if i % 2 == 0 { json!(null) } else { json!("Austin") },
                "is_remote": i == 1,
                "years_of_experience": null,
                "employment_type": "full_time",
                "created_at": "2025-03-01T00:00:00Z",
                "content__html": format!("<p>Role {i}: build <em>great</em> things &amp; more.</p>")
            })
        })
        .collect();
    json!({ "postings": items })
}

async fn mount_company(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/postings"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failed_company_does_not_abort_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    write_credentials(tmp.path(), "Acme Corp,acme,tok-a\nBroken Co,broken,tok-b\n");
    mount_company(&server, "tok-a", ResponseTemplate::new(200).set_body_json(postings(3))).await;
    mount_company(&server, "tok-b", ResponseTemplate::new(500)).await;

    let config = config_for(tmp.path(), &server);
    let report = JobPipeline::new(&config).unwrap().run().await.unwrap();

    assert_eq!(report.companies.len(), 2);
    assert_eq!(report.companies[0].status, CompanyStatus::Ok);
    assert_eq!(report.companies[0].jobs, 3);
    assert_eq!(report.companies[1].status, CompanyStatus::FetchError);
    assert!(report.companies[1].detail.as_deref().unwrap().contains("500"));
    assert_eq!(report.total_jobs, 3);

    let combined = std::fs::read_to_string(&config.combined_path).unwrap();
    assert_eq!(combined.lines().count(), 4);
    assert!(combined.starts_with("ID,Title,Link,Company,Location,Remote,Experience,EmploymentType,DatePosted,RoleDescription\n"));
    assert!(combined.contains("1,Role 1,https://jobs.example.com/1,Acme Corp,Austin,Yes,Not specified,full_time,"));
    assert!(combined.contains("2,Role 2,https://jobs.example.com/2,Acme Corp,N/A,No,"));

    let individual: Vec<_> = std::fs::read_dir(&config.individual_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(individual, vec!["acme_corp_jobs.csv".to_string()]);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn lines_with(&self, level: &str, needle: &str) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(level) && line.contains(needle))
            .count()
    }
}

#[tokio::test]
async fn test_failed_company_logs_one_error_and_one_warning() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    write_credentials(tmp.path(), "Acme Corp,acme,tok-a\nBroken Co,broken,tok-b\n");
    mount_company(&server, "tok-a", ResponseTemplate::new(200).set_body_json(postings(3))).await;
    mount_company(&server, "tok-b", ResponseTemplate::new(500)).await;

    let config = config_for(tmp.path(), &server);
    JobPipeline::new(&config).unwrap().run().await.unwrap();

    assert_eq!(logs.lines_with("ERROR", "Broken Co"), 1);
    assert_eq!(logs.lines_with("WARN", "Broken Co"), 1);
    assert_eq!(logs.lines_with("ERROR", "Acme Corp"), 0);
    assert_eq!(logs.lines_with("WARN", "Acme Corp"), 0);
    assert_eq!(logs.lines_with("INFO", "Fetching jobs for: Acme Corp"), 1);
}

#[tokio::test]
async fn test_descriptions_are_plain_ascii() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    write_credentials(tmp.path(), "Acme,acme,tok-a\n");
    let body = json!({"postings": [{
        "id": "x1",
        "content__html": "<div><h2>Über uns</h2><p>Wir suchen – dich!</p></div>"
    }]});
    mount_company(&server, "tok-a", ResponseTemplate::new(200).set_body_json(body)).await;

    let config = config_for(tmp.path(), &server);
    JobPipeline::new(&config).unwrap().run().await.unwrap();

    let mut reader = csv::Reader::from_path(&config.combined_path).unwrap();
    let record = reader.records().next().unwrap().unwrap();
    let description = &record[9];
    assert_eq!(description, "ber unsWir suchen  dich!");
    assert!(!description.contains('<') && !description.contains('>'));
    assert!(description.is_ascii());
}

#[tokio::test]
async fn test_rerun_produces_identical_combined_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    write_credentials(tmp.path(), "Beta,beta,tok-b\nAlpha,alpha,tok-a\n");
    mount_company(&server, "tok-a", ResponseTemplate::new(200).set_body_json(postings(2))).await;
    mount_company(&server, "tok-b", ResponseTemplate::new(200).set_body_json(postings(1))).await;

    let config = config_for(tmp.path(), &server);
    let pipeline = JobPipeline::new(&config).unwrap();

    pipeline.run().await.unwrap();
    let first = std::fs::read(&config.combined_path).unwrap();
    pipeline.run().await.unwrap();
    let second = std::fs::read(&config.combined_path).unwrap();

    assert_eq!(first, second);
    // Rows follow credential-file order, not alphabetical order
    let text = String::from_utf8(first).unwrap();
    let companies: Vec<_> = text.lines().skip(1).map(|l| l.split(',').nth(3).unwrap()).collect();
    assert_eq!(companies, vec!["Beta", "Alpha", "Alpha"]);
}

#[tokio::test]
async fn test_empty_postings_write_no_files() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    write_credentials(tmp.path(), "Quiet,quiet,tok-q\n");
    mount_company(&server, "tok-q", ResponseTemplate::new(200).set_body_json(json!({"postings": []}))).await;

    let config = config_for(tmp.path(), &server);
    let report = JobPipeline::new(&config).unwrap().run().await.unwrap();

    assert_eq!(report.companies[0].status, CompanyStatus::EmptyResult);
    assert_eq!(report.combined_output, None);
    assert!(!config.combined_path.exists());
    assert!(!config.individual_dir.join("quiet_jobs.csv").exists());
}

#[tokio::test]
async fn test_company_write_failure_still_feeds_combined_file() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    write_credentials(tmp.path(), "Acme,acme,tok-a\n");
    mount_company(&server, "tok-a", ResponseTemplate::new(200).set_body_json(postings(2))).await;

    let config = config_for(tmp.path(), &server);
    // A plain file where the per-company directory should be
    std::fs::write(&config.individual_dir, "not a directory").unwrap();

    let report = JobPipeline::new(&config).unwrap().run().await.unwrap();

    assert_eq!(report.companies[0].status, CompanyStatus::WriteError);
    assert_eq!(report.total_jobs, 2);
    assert_eq!(report.combined_output.as_deref(), Some(config.combined_path.as_path()));
    let combined = std::fs::read_to_string(&config.combined_path).unwrap();
    assert_eq!(combined.lines().count(), 3);
}

#[tokio::test]
async fn test_missing_or_empty_credentials_are_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let config = config_for(tmp.path(), &server);
    let pipeline = JobPipeline::new(&config).unwrap();

    let err = pipeline.run().await.unwrap_err();
    assert!(err.to_string().contains("CSV file not found"));

    write_credentials(tmp.path(), "just,two\n");
    let err = pipeline.run().await.unwrap_err();
    assert!(err.to_string().contains("No valid company data found"));
}

struct Shouting;

#[async_trait]
impl TranslationBackend for Shouting {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
        Ok(text.to_uppercase())
    }
}

#[tokio::test]
async fn test_translation_is_opt_in() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    write_credentials(tmp.path(), "Acme,acme,tok-a\n");
    mount_company(&server, "tok-a", ResponseTemplate::new(200).set_body_json(postings(1))).await;

    let config = config_for(tmp.path(), &server);
    let backend: Box<dyn TranslationBackend> = Box::new(Shouting);
    let pipeline = JobPipeline::new(&config)
        .unwrap()
        .with_translator(Translator::new(backend));
    pipeline.run().await.unwrap();

    let combined = std::fs::read_to_string(&config.combined_path).unwrap();
    assert!(combined.contains("ROLE 1: BUILD GREAT THINGS &AMP; MORE."));
}
