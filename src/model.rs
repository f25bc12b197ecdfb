//! Core value records shared by all analysis backends.

use serde::{Deserialize, Serialize};

/// Severity levels for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Lenient mapping for severities reported by external services.
    ///
    /// The remote service grades issues on its own scale (INFO, MINOR,
    /// MAJOR, CRITICAL, BLOCKER); unknown values fall back to Warning.
    pub fn from_wire(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "info" => Severity::Info,
            "critical" | "blocker" | "error" => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categories a finding can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    CodeSmell,
    Security,
    Performance,
    Style,
    Bug,
    Complexity,
    Syntax,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::CodeSmell => "code_smell",
            FindingKind::Security => "security",
            FindingKind::Performance => "performance",
            FindingKind::Style => "style",
            FindingKind::Bug => "bug",
            FindingKind::Complexity => "complexity",
            FindingKind::Syntax => "syntax",
        }
    }

    /// Lenient mapping for issue types reported by external services.
    ///
    /// Unknown values fall back to CodeSmell, the remote service's own
    /// default issue type.
    pub fn from_wire(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bug" => FindingKind::Bug,
            "vulnerability" | "security" | "security_hotspot" => FindingKind::Security,
            "performance" => FindingKind::Performance,
            "style" => FindingKind::Style,
            "complexity" => FindingKind::Complexity,
            "syntax" => FindingKind::Syntax,
            _ => FindingKind::CodeSmell,
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single normalized code-quality observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// 1-based line number when known, 0 when the finding has no specific line.
    pub line: u64,
    pub message: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: FindingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

/// Metrics produced once per analysis invocation, never merged across backends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub lines_of_code: u64,
    pub complexity: f64,
    pub bugs: u64,
    pub vulnerabilities: u64,
    pub code_smells: u64,
    pub security_hotspots: u64,
    pub duplicate_lines_percentage: f64,
    /// Absent coverage stays None; every other missing metric coerces to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
}

/// Successful analysis output: findings, metrics, and a summary sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub issues: Vec<Finding>,
    pub metrics: Metrics,
    pub summary: String,
}

/// The failure shape every public entry point reports instead of raising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    pub message: String,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.error)
        } else {
            write!(f, "{}: {}", self.error, self.message)
        }
    }
}
