//! Wire types for the Sonar-style HTTP API.
//!
//! Response shapes tolerate absent optional fields: a missing issue line is
//! the 0 sentinel, a missing message is empty.

use serde::{Deserialize, Serialize};

/// Body for `POST /source/index`.
#[derive(Debug, Serialize)]
pub struct SubmitSourceRequest {
    pub organization: String,
    #[serde(rename = "projectKey")]
    pub project_key: String,
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Serialize)]
pub struct SourceEntry {
    pub path: String,
    pub language: String,
    /// Base64-encoded file content.
    pub content: String,
}

/// Body for `POST /analysis/submit`.
#[derive(Debug, Serialize)]
pub struct SubmitAnalysisRequest {
    #[serde(rename = "projectKey")]
    pub project_key: String,
    pub organization: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueSearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: String,
    #[serde(rename = "type", default)]
    pub issue_type: String,
    #[serde(default)]
    pub rule: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HotspotSearchResponse {
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, Deserialize)]
pub struct Hotspot {
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "ruleKey", default)]
    pub rule_key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeasuresResponse {
    #[serde(default)]
    pub component: Option<Component>,
}

#[derive(Debug, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// Measure values arrive as strings and are coerced during normalization.
#[derive(Debug, Deserialize)]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: String,
}
