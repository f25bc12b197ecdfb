//! Facade tying the analysis backends together.
//!
//! `AnalyzerConfig` states explicitly which backends are available; absent
//! credentials turn the corresponding entry point into an immediate
//! configuration error instead of an outbound call. The backends never
//! call each other and their results are never merged.

use crate::ai::{AiCredentials, AiError, AiReview, AiReviewer};
use crate::language;
use crate::model::{AnalysisResult, ErrorReport, Finding, FindingKind, Metrics};
use crate::rules;
use crate::sonar::{SonarClient, SonarCredentials};
use crate::structural;
use crate::summary;

/// Findings per complexity point; the score is bounded to 1..=10.
const COMPLEXITY_DIVISOR: usize = 5;
const MAX_COMPLEXITY_SCORE: usize = 10;

/// Which backends are available.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub sonar: Option<SonarCredentials>,
    pub ai: Option<AiCredentials>,
}

/// Entry point for all three analysis backends.
pub struct CodeAnalyzer {
    sonar: Option<SonarClient>,
    ai: Option<AiReviewer>,
}

impl CodeAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            sonar: config.sonar.map(SonarClient::new),
            ai: config.ai.map(AiReviewer::new),
        }
    }

    /// Swap in pre-built backends (tests point these at mock servers).
    pub fn with_backends(sonar: Option<SonarClient>, ai: Option<AiReviewer>) -> Self {
        Self { sonar, ai }
    }

    /// Local rule-based analysis. Never fails.
    ///
    /// Pattern findings come first, then structural findings when a checker
    /// is registered for the filename's extension.
    pub fn analyze_local(&self, code: &str, filename: &str) -> AnalysisResult {
        let mut findings = rules::check_patterns(code);

        if let Some(checker) =
            language::file_extension(filename).and_then(structural::for_extension)
        {
            findings.extend(checker.check(code));
        }

        let lines_of_code = code.lines().count() as u64;
        let complexity = (findings.len() / COMPLEXITY_DIVISOR + 1).min(MAX_COMPLEXITY_SCORE);
        let summary = summary::describe_local(findings.len(), lines_of_code);
        let metrics = local_metrics(&findings, lines_of_code, complexity as f64);

        AnalysisResult {
            issues: findings,
            metrics,
            summary,
        }
    }

    /// Remote static analysis, verbatim from the adapter.
    pub async fn analyze_remote(
        &self,
        code: &str,
        filename: &str,
    ) -> Result<AnalysisResult, ErrorReport> {
        let client = self.sonar.as_ref().ok_or_else(|| {
            ErrorReport::new(
                "Sonar token is required for remote analysis",
                "configure SONAR_TOKEN to enable remote analysis",
            )
        })?;
        client
            .analyze(code, filename)
            .await
            .map_err(ErrorReport::from)
    }

    /// Generative review, verbatim from the adapter. The credential check
    /// happens here, before any reviewer exists to make a call.
    pub async fn analyze_with_ai(
        &self,
        code: &str,
        filename: &str,
    ) -> Result<AiReview, ErrorReport> {
        let reviewer = self
            .ai
            .as_ref()
            .ok_or_else(|| ErrorReport::from(AiError::MissingApiKey))?;
        reviewer
            .review(code, filename)
            .await
            .map_err(ErrorReport::from)
    }
}

/// Local metrics derive their counters from the findings themselves; there
/// is no duplication or coverage measurement in the local path.
fn local_metrics(findings: &[Finding], lines_of_code: u64, complexity: f64) -> Metrics {
    let count_kind =
        |kind: FindingKind| findings.iter().filter(|f| f.kind == kind).count() as u64;

    Metrics {
        lines_of_code,
        complexity,
        bugs: count_kind(FindingKind::Bug),
        vulnerabilities: 0,
        code_smells: count_kind(FindingKind::CodeSmell),
        security_hotspots: count_kind(FindingKind::Security),
        duplicate_lines_percentage: 0.0,
        coverage: None,
    }
}
