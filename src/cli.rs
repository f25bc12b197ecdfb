//! Command-line interface for codequal.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::ai::AiCredentials;
use crate::analyzer::{AnalyzerConfig, CodeAnalyzer};
use crate::report;
use crate::rules;
use crate::sonar::SonarCredentials;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ANALYSIS_ERROR: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Multi-backend code quality analyzer.
///
/// Codequal runs a source file through local pattern and structural rules,
/// a Sonar-style remote analysis service, or a generative-AI reviewer, and
/// reports the normalized findings.
#[derive(Parser)]
#[command(name = "codequal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source file
    Analyze(AnalyzeArgs),
    /// List the local pattern rules
    Rules,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Source file to analyze
    pub file: PathBuf,

    /// Analysis backend
    #[arg(short, long, value_enum, default_value = "local")]
    pub backend: Backend,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Local pattern and structural rules
    Local,
    /// Sonar-style remote static analysis
    Sonar,
    /// Generative-AI review
    Ai,
}

/// Build the analyzer configuration from the environment.
///
/// Remote analysis needs SONAR_TOKEN (SONAR_ORGANIZATION optional); AI
/// review needs GEMINI_API_KEY and GEMINI_API_URL.
fn config_from_env() -> AnalyzerConfig {
    let sonar = std::env::var("SONAR_TOKEN")
        .ok()
        .map(|token| SonarCredentials {
            token,
            organization: std::env::var("SONAR_ORGANIZATION")
                .unwrap_or_else(|_| "default-organization".to_string()),
        });

    let ai = match (
        std::env::var("GEMINI_API_KEY"),
        std::env::var("GEMINI_API_URL"),
    ) {
        (Ok(api_key), Ok(endpoint)) => Some(AiCredentials { api_key, endpoint }),
        _ => None,
    };

    AnalyzerConfig { sonar, ai }
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    // Register structural checkers (no-op if the feature is disabled)
    crate::init();

    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let code = match std::fs::read_to_string(&args.file) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: cannot read {:?}: {}", args.file, error);
            return Ok(EXIT_ERROR);
        }
    };
    let filename = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();

    let analyzer = CodeAnalyzer::new(config_from_env());
    let json = args.format == "json";

    match args.backend {
        Backend::Local => {
            let result = analyzer.analyze_local(&code, &filename);
            if json {
                report::write_json_result(&result)?;
            } else {
                report::write_pretty(&filename, "local", &result);
            }
            Ok(EXIT_SUCCESS)
        }
        Backend::Sonar => {
            let runtime = tokio::runtime::Runtime::new()?;
            match runtime.block_on(analyzer.analyze_remote(&code, &filename)) {
                Ok(result) => {
                    if json {
                        report::write_json_result(&result)?;
                    } else {
                        report::write_pretty(&filename, "sonar", &result);
                    }
                    Ok(EXIT_SUCCESS)
                }
                Err(error) => {
                    if json {
                        report::write_json_error(&error)?;
                    } else {
                        report::write_pretty_error(&error);
                    }
                    Ok(EXIT_ANALYSIS_ERROR)
                }
            }
        }
        Backend::Ai => {
            let runtime = tokio::runtime::Runtime::new()?;
            match runtime.block_on(analyzer.analyze_with_ai(&code, &filename)) {
                Ok(review) => {
                    if json {
                        report::write_json_review(&review)?;
                    } else {
                        report::write_pretty_review(&filename, &review);
                    }
                    Ok(EXIT_SUCCESS)
                }
                Err(error) => {
                    if json {
                        report::write_json_error(&error)?;
                    } else {
                        report::write_pretty_error(&error);
                    }
                    Ok(EXIT_ANALYSIS_ERROR)
                }
            }
        }
    }
}

/// Run the rules command.
pub fn run_rules() -> i32 {
    println!("Local pattern rules, in evaluation order:");
    println!();

    for (index, rule) in rules::table().iter().enumerate() {
        println!("  {:>2}. {}", index + 1, rule.message());
        println!("      pattern: {}", rule.pattern());
    }

    EXIT_SUCCESS
}
