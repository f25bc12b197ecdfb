//! Generative-AI code review adapter.
//!
//! Builds a review prompt around the raw source, sends it to a
//! generative-language endpoint, and pulls a JSON payload out of the
//! model's free-text reply. The payload is whatever the model produced -
//! callers must treat it as best-effort, not validated against the Finding
//! invariants. When no JSON can be extracted, the raw text is returned in
//! a fixed fallback shape instead of failing.

use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language;
use crate::model::ErrorReport;

/// Request timeout for the generative endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fenced ```json block in the model's reply. Tried first.
static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced JSON pattern must compile")
});

/// Bare object literal beginning with an "issues" key. Second choice.
static BARE_ISSUES_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)\{\s*"issues".*\}"#).expect("bare issues pattern must compile")
});

/// Errors from the generative review call.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("API key is required for AI-powered analysis")]
    MissingApiKey,
    #[error("API error: {status}")]
    Status { status: u16, body: String },
    #[error("no candidate text in response")]
    EmptyResponse,
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<AiError> for ErrorReport {
    fn from(error: AiError) -> Self {
        match error {
            AiError::MissingApiKey => ErrorReport::new(
                "API key is required for AI-powered analysis",
                "configure GEMINI_API_KEY to enable AI review",
            ),
            AiError::Status { status, body } => {
                ErrorReport::new(format!("API error: {}", status), body)
            }
            other => ErrorReport::new("Failed to analyze with AI", other.to_string()),
        }
    }
}

/// Credentials for the generative endpoint.
#[derive(Debug, Clone)]
pub struct AiCredentials {
    pub api_key: String,
    pub endpoint: String,
}

/// Review output.
///
/// `Structured` is the JSON object extracted from the reply, untouched.
/// `Raw` is the fallback when extraction or parsing fails.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AiReview {
    Structured(serde_json::Value),
    Raw(RawReview),
}

/// Fallback payload carrying the unparsed reply text.
#[derive(Debug, Clone, Serialize)]
pub struct RawReview {
    pub raw_response: String,
    pub issues: Vec<serde_json::Value>,
    pub suggestions: Vec<String>,
    pub summary: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

/// Client for one generative-language endpoint.
pub struct AiReviewer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AiReviewer {
    pub fn new(credentials: AiCredentials) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codequal/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            endpoint: credentials.endpoint,
            api_key: credentials.api_key,
        }
    }

    /// Request an AI review of the given source snippet.
    pub async fn review(&self, code: &str, filename: &str) -> Result<AiReview, AiError> {
        let prompt = build_prompt(code, filename);
        debug!("requesting AI review for {:?}", filename);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let reply: GenerateResponse = response.json().await?;
        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(AiError::EmptyResponse)?;

        Ok(extract_review(&text))
    }
}

fn build_prompt(code: &str, filename: &str) -> String {
    let language = language::file_extension(filename).unwrap_or(language::UNKNOWN_LANGUAGE);
    format!(
        r#"Analyze the following {language} code for quality issues:

```{language}
{code}
```

Provide a JSON response with the following structure:
{{
    "issues": [
        {{
            "line": <line_number>,
            "message": "<description of the issue>",
            "severity": "<info|warning|error>",
            "type": "<code_smell|security|performance|style|bug>"
        }}
    ],
    "suggestions": [
        "<suggestion for improvement>"
    ],
    "summary": "<brief summary of code quality>"
}}

Focus on:
- Code smells
- Security issues
- Performance optimizations
- Best practices
- Deprecated API usage
"#
    )
}

/// Pull a JSON object out of the reply text, falling back to the raw text
/// in the fixed fallback shape.
fn extract_review(text: &str) -> AiReview {
    if let Some(json_str) = locate_json(text) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(json_str) {
            return AiReview::Structured(value);
        }
    }

    AiReview::Raw(RawReview {
        raw_response: text.to_string(),
        issues: Vec::new(),
        suggestions: vec!["Unable to parse AI response as JSON".to_string()],
        summary: "AI analysis completed but results could not be structured properly.".to_string(),
    })
}

fn locate_json(text: &str) -> Option<&str> {
    if let Some(captures) = FENCED_JSON.captures(text) {
        return captures.get(1).map(|m| m.as_str());
    }
    BARE_ISSUES_OBJECT.find(text).map(|m| m.as_str())
}
