//! Output formatting for analysis results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the serialized success or error shape, for programmatic use

use colored::*;

use crate::ai::AiReview;
use crate::model::{AnalysisResult, ErrorReport, Finding, Metrics, Severity};

/// Write a successful analysis in JSON format.
pub fn write_json_result(result: &AnalysisResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Write an error report in JSON format.
pub fn write_json_error(report: &ErrorReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Write an AI review in JSON format.
pub fn write_json_review(review: &AiReview) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(review)?);
    Ok(())
}

/// Write a successful analysis in pretty (human-readable) format.
pub fn write_pretty(filename: &str, backend: &str, result: &AnalysisResult) {
    write_header(filename, backend);

    if !result.issues.is_empty() {
        write_findings(&result.issues);
        println!();
    }

    write_metrics(&result.metrics);
    println!();
    println!("  {}", result.summary.bold());
    println!();
}

/// Write an error report in pretty format.
pub fn write_pretty_error(report: &ErrorReport) {
    eprintln!();
    eprintln!("  {} {}", "ERROR".red().bold(), report.error);
    if !report.message.is_empty() {
        eprintln!("        {}", report.message.dimmed());
    }
    eprintln!();
}

/// Write an AI review in pretty format.
pub fn write_pretty_review(filename: &str, review: &AiReview) {
    write_header(filename, "ai");

    match review {
        AiReview::Structured(value) => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("  {}", "review payload could not be rendered".dimmed()),
        },
        AiReview::Raw(raw) => {
            println!("  {}", raw.summary.bold());
            println!();
            for suggestion in &raw.suggestions {
                println!("    - {}", suggestion);
            }
            println!();
            println!("  {}", "Raw response:".dimmed());
            println!("{}", raw.raw_response);
        }
    }
    println!();
}

fn write_header(filename: &str, backend: &str) {
    println!();
    print!("  ");
    print!("{}", "codequal".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "File:    ".dimmed());
    println!("{}", filename);
    print!("  {}", "Backend: ".dimmed());
    println!("{}", backend);
    println!();
}

fn write_findings(findings: &[Finding]) {
    println!("  {} ({}):", "Findings".bold(), findings.len());
    println!();

    for finding in findings {
        write_severity_tag(&finding.severity);
        print!("   ");
        print!("{:<12}", finding.kind.to_string().dimmed());
        if finding.line > 0 {
            print!("{}", format!("line {}", finding.line).blue());
        }
        if let Some(rule) = &finding.rule {
            print!("  {}", rule.dimmed());
        }
        println!();
        println!("            {}", finding.message);
        println!();
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_metrics(metrics: &Metrics) {
    println!("  {}", "Metrics:".bold());
    println!("    {:<24} {}", "lines of code", metrics.lines_of_code);
    println!("    {:<24} {}", "complexity", metrics.complexity);
    println!("    {:<24} {}", "bugs", metrics.bugs);
    println!("    {:<24} {}", "vulnerabilities", metrics.vulnerabilities);
    println!("    {:<24} {}", "code smells", metrics.code_smells);
    println!(
        "    {:<24} {}",
        "security hotspots", metrics.security_hotspots
    );
    println!(
        "    {:<24} {:.1}%",
        "duplicated lines", metrics.duplicate_lines_percentage
    );
    if let Some(coverage) = metrics.coverage {
        println!("    {:<24} {:.1}%", "coverage", coverage);
    }
}
