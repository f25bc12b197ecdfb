//! Codequal - multi-backend code quality analyzer.
//!
//! Codequal takes a snippet of source code plus its filename and runs it
//! through up to three independent analysis backends, normalizing each
//! backend's findings into a common issue/metric/summary shape:
//!
//! - `rules`: local regex rule table (language-agnostic pattern checks)
//! - `structural`: tree-sitter structural checks (function length and
//!   parameter count; Python built in, more languages are a registration)
//! - `sonar`: adapter for a Sonar-style remote static-analysis service
//! - `ai`: generative-AI reviewer returning a loosely-typed payload
//!
//! The `analyzer::CodeAnalyzer` facade owns the configured backends;
//! absent credentials turn the corresponding entry point into an immediate
//! configuration error instead of an outbound call. Backends never call
//! each other and their results are never merged.
//!
//! # Adding a Structural Language
//!
//! Implement `structural::StructuralChecker` and register a factory in
//! `structural::init` - see `src/structural/python.rs` for an example.

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod language;
pub mod model;
pub mod report;
pub mod rules;
pub mod sonar;
pub mod structural;
pub mod summary;

pub use ai::{AiCredentials, AiError, AiReview, AiReviewer, RawReview};
pub use analyzer::{AnalyzerConfig, CodeAnalyzer};
pub use model::{AnalysisResult, ErrorReport, Finding, FindingKind, Metrics, Severity};
pub use sonar::{SonarClient, SonarCredentials, SonarError};

/// Initialize all subsystems.
///
/// Call this once at startup.
pub fn init() {
    structural::init();
}
