//! Remote static-analysis adapter for a Sonar-style service.
//!
//! Each analysis call drives a fixed protocol against the remote API:
//! create an ephemeral project, submit the base64-encoded source, trigger
//! analysis, wait for the service to settle, fetch issues, hotspots, and
//! measures, and delete the project. Hotspot and measure fetches are
//! tolerated failures; everything else collapses the call. The ephemeral
//! project is deleted best-effort on every exit path after creation,
//! including cancellation during the settle wait.

pub mod api;

use std::collections::HashMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use thiserror::Error;

use crate::language;
use crate::model::{AnalysisResult, ErrorReport, Finding, FindingKind, Metrics, Severity};
use crate::summary;

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sonarcloud.io/api";

/// Fixed wait between triggering analysis and fetching results.
pub const ANALYSIS_SETTLE: Duration = Duration::from_secs(5);

/// Page size for issue and hotspot searches.
const PAGE_SIZE: u32 = 100;

/// Metric keys requested from the measures endpoint.
const METRIC_KEYS: &str =
    "ncloc,complexity,bugs,vulnerabilities,code_smells,security_hotspots,duplicated_lines_density,coverage";

/// Errors from the remote analysis protocol.
#[derive(Debug, Error)]
pub enum SonarError {
    #[error("Failed to create project: {0}")]
    CreateProject(String),
    #[error("Failed to run analysis: {0}")]
    RunAnalysis(String),
    #[error("Failed to get issues: {0}")]
    FetchIssues(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<SonarError> for ErrorReport {
    fn from(error: SonarError) -> Self {
        ErrorReport::new("Sonar analysis failed", error.to_string())
    }
}

/// Credentials for the remote service.
#[derive(Debug, Clone)]
pub struct SonarCredentials {
    /// API token, sent as the basic-auth username with an empty password.
    pub token: String,
    pub organization: String,
}

/// Client for one Sonar-style service endpoint.
pub struct SonarClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    organization: String,
    settle: Duration,
}

impl SonarClient {
    /// Create a client against the default public endpoint.
    pub fn new(credentials: SonarCredentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint (tests use this).
    pub fn with_base_url(credentials: SonarCredentials, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codequal/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: credentials.token,
            organization: credentials.organization,
            settle: ANALYSIS_SETTLE,
        }
    }

    /// Override the settle wait (tests shrink it to zero).
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Run one full remote analysis of the given source snippet.
    pub async fn analyze(&self, code: &str, filename: &str) -> Result<AnalysisResult, SonarError> {
        let project_key = fresh_project_key();
        debug!("creating ephemeral project {}", project_key);
        self.create_project(&project_key).await?;

        // From here on the project exists remotely; the guard deletes it
        // even if this future is dropped mid-flight.
        let guard = ProjectGuard::new(self, &project_key);
        let result = self.run_protocol(code, filename, &project_key).await;
        guard.release().await;
        result
    }

    async fn run_protocol(
        &self,
        code: &str,
        filename: &str,
        project_key: &str,
    ) -> Result<AnalysisResult, SonarError> {
        self.submit_source(project_key, code, filename).await?;
        self.trigger_analysis(project_key).await?;

        debug!(
            "waiting {:?} for analysis of {} to settle",
            self.settle, project_key
        );
        tokio::time::sleep(self.settle).await;

        let issues = self.fetch_issues(project_key).await?;
        let hotspots = match self.fetch_hotspots(project_key).await {
            Ok(hotspots) => hotspots,
            Err(error) => {
                warn!("hotspot fetch failed for {}: {}", project_key, error);
                Vec::new()
            }
        };
        let measures = match self.fetch_measures(project_key).await {
            Ok(measures) => measures,
            Err(error) => {
                warn!("measure fetch failed for {}: {}", project_key, error);
                HashMap::new()
            }
        };

        Ok(normalize(issues, hotspots, &measures))
    }

    async fn create_project(&self, project_key: &str) -> Result<(), SonarError> {
        let url = format!("{}/projects/create", self.base_url);
        let response = self
            .http
            .post(&url)
            .query(&[
                ("name", project_key),
                ("project", project_key),
                ("organization", self.organization.as_str()),
                ("visibility", "private"),
            ])
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SonarError::CreateProject(
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    async fn submit_source(
        &self,
        project_key: &str,
        code: &str,
        filename: &str,
    ) -> Result<(), SonarError> {
        let body = api::SubmitSourceRequest {
            organization: self.organization.clone(),
            project_key: project_key.to_string(),
            sources: vec![api::SourceEntry {
                path: filename.to_string(),
                language: language::language_for_filename(filename).to_string(),
                content: STANDARD.encode(code.as_bytes()),
            }],
        };

        let url = format!("{}/source/index", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SonarError::RunAnalysis(
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    async fn trigger_analysis(&self, project_key: &str) -> Result<(), SonarError> {
        let body = api::SubmitAnalysisRequest {
            project_key: project_key.to_string(),
            organization: self.organization.clone(),
        };

        let url = format!("{}/analysis/submit", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SonarError::RunAnalysis(
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    async fn fetch_issues(&self, project_key: &str) -> Result<Vec<api::Issue>, SonarError> {
        let page_size = PAGE_SIZE.to_string();
        let url = format!("{}/issues/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("componentKeys", project_key), ("ps", page_size.as_str())])
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SonarError::FetchIssues(
                response.text().await.unwrap_or_default(),
            ));
        }
        let parsed: api::IssueSearchResponse = response.json().await?;
        Ok(parsed.issues)
    }

    async fn fetch_hotspots(&self, project_key: &str) -> Result<Vec<api::Hotspot>, SonarError> {
        let page_size = PAGE_SIZE.to_string();
        let url = format!("{}/hotspots/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("projectKey", project_key), ("ps", page_size.as_str())])
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SonarError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let parsed: api::HotspotSearchResponse = response.json().await?;
        Ok(parsed.hotspots)
    }

    async fn fetch_measures(
        &self,
        project_key: &str,
    ) -> Result<HashMap<String, String>, SonarError> {
        let url = format!("{}/measures/component", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("component", project_key), ("metricKeys", METRIC_KEYS)])
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SonarError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let parsed: api::MeasuresResponse = response.json().await?;
        let measures = parsed
            .component
            .map(|c| c.measures)
            .unwrap_or_default()
            .into_iter()
            .map(|m| (m.metric, m.value))
            .collect();
        Ok(measures)
    }
}

/// Deletes the ephemeral project when dropped, unless released first.
///
/// `release` runs the delete inline; the drop path covers cancellation
/// (e.g. a caller timeout firing during the settle wait) by spawning the
/// delete onto the current runtime.
struct ProjectGuard {
    http: reqwest::Client,
    url: String,
    token: String,
    project_key: String,
    armed: bool,
}

impl ProjectGuard {
    fn new(client: &SonarClient, project_key: &str) -> Self {
        Self {
            http: client.http.clone(),
            url: format!("{}/projects/delete", client.base_url),
            token: client.token.clone(),
            project_key: project_key.to_string(),
            armed: true,
        }
    }

    async fn release(mut self) {
        self.armed = false;
        delete_project(&self.http, &self.url, &self.token, &self.project_key).await;
    }
}

impl Drop for ProjectGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let http = self.http.clone();
        let url = self.url.clone();
        let token = self.token.clone();
        let project_key = self.project_key.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                delete_project(&http, &url, &token, &project_key).await;
            });
        }
    }
}

/// Best-effort deletion; failures are logged and swallowed.
async fn delete_project(http: &reqwest::Client, url: &str, token: &str, project_key: &str) {
    let result = http
        .post(url)
        .query(&[("project", project_key)])
        .basic_auth(token, Some(""))
        .send()
        .await;

    match result {
        Ok(response) if !response.status().is_success() => {
            warn!(
                "failed to delete project {}: HTTP {}",
                project_key,
                response.status()
            );
        }
        Err(error) => warn!("failed to delete project {}: {}", project_key, error),
        _ => {}
    }
}

/// Ephemeral project identifiers: a fixed prefix plus the first 8 hex
/// characters of a v4 uuid, fresh per analysis call.
fn fresh_project_key() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("temp-analysis-{}", &id[..8])
}

/// Map the fetched result sets into the common shape: issue findings
/// first, hotspot findings after.
fn normalize(
    issues: Vec<api::Issue>,
    hotspots: Vec<api::Hotspot>,
    measures: &HashMap<String, String>,
) -> AnalysisResult {
    let mut findings: Vec<Finding> = issues.into_iter().map(issue_to_finding).collect();
    findings.extend(hotspots.into_iter().map(hotspot_to_finding));

    let metrics = metrics_from_measures(measures);
    let summary = summary::describe_metrics(&metrics);

    AnalysisResult {
        issues: findings,
        metrics,
        summary,
    }
}

fn issue_to_finding(issue: api::Issue) -> Finding {
    Finding {
        line: issue.line,
        message: issue.message,
        severity: Severity::from_wire(&issue.severity),
        kind: FindingKind::from_wire(&issue.issue_type),
        rule: non_empty(issue.rule),
    }
}

fn hotspot_to_finding(hotspot: api::Hotspot) -> Finding {
    Finding {
        line: hotspot.line,
        message: format!("Security hotspot: {}", hotspot.message),
        severity: Severity::Warning,
        kind: FindingKind::Security,
        rule: non_empty(hotspot.rule_key),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Coerce the measure map into typed metrics. Missing numeric metrics
/// default to 0; missing coverage stays absent.
fn metrics_from_measures(measures: &HashMap<String, String>) -> Metrics {
    Metrics {
        lines_of_code: parse_u64(measures.get("ncloc")),
        complexity: parse_f64(measures.get("complexity")),
        bugs: parse_u64(measures.get("bugs")),
        vulnerabilities: parse_u64(measures.get("vulnerabilities")),
        code_smells: parse_u64(measures.get("code_smells")),
        security_hotspots: parse_u64(measures.get("security_hotspots")),
        duplicate_lines_percentage: parse_f64(measures.get("duplicated_lines_density")),
        coverage: measures.get("coverage").and_then(|v| v.parse().ok()),
    }
}

fn parse_u64(value: Option<&String>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn parse_f64(value: Option<&String>) -> f64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0.0)
}
