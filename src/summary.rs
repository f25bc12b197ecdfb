//! Summary sentence generation shared by the analysis backends.

use crate::model::Metrics;

/// Issue density (issues per 100 lines) below which quality is "good".
const GOOD_DENSITY: f64 = 2.0;
/// Density below which quality is "acceptable"; above it, "needs improvement".
const ACCEPTABLE_DENSITY: f64 = 5.0;
/// Duplication percentage above which duplication is called out.
const DUPLICATION_CUTOFF: f64 = 10.0;

/// Summarize remote-analysis metrics as a human sentence.
pub fn describe_metrics(metrics: &Metrics) -> String {
    if metrics.lines_of_code == 0 {
        return "No code detected for analysis.".to_string();
    }

    let mut phrases = Vec::new();

    if metrics.bugs > 0 {
        phrases.push(format!(
            "{} potential bug{}",
            metrics.bugs,
            plural_s(metrics.bugs)
        ));
    }
    if metrics.vulnerabilities > 0 {
        phrases.push(format!(
            "{} security issue{}",
            metrics.vulnerabilities,
            plural_s(metrics.vulnerabilities)
        ));
    }
    if metrics.code_smells > 0 {
        phrases.push(format!(
            "{} code smell{}",
            metrics.code_smells,
            plural_s(metrics.code_smells)
        ));
    }
    if metrics.duplicate_lines_percentage > DUPLICATION_CUTOFF {
        phrases.push(format!(
            "{:.1}% code duplication",
            metrics.duplicate_lines_percentage
        ));
    }

    if phrases.is_empty() {
        return format!(
            "No significant issues found in {} lines of code. Good job!",
            metrics.lines_of_code
        );
    }

    format!(
        "Found {} in {} lines of code.",
        phrases.join(", "),
        metrics.lines_of_code
    )
}

/// Summarize a local analysis by issue density.
pub fn describe_local(issue_count: usize, lines_of_code: u64) -> String {
    if issue_count == 0 {
        return "No issues detected. Code appears to follow good practices.".to_string();
    }

    let density = issue_count as f64 / lines_of_code.max(1) as f64 * 100.0;
    let quality = if density < GOOD_DENSITY {
        "good"
    } else if density < ACCEPTABLE_DENSITY {
        "acceptable"
    } else {
        "needs improvement"
    };

    format!(
        "Found {} issues in {} lines of code. Overall quality is {}.",
        issue_count, lines_of_code, quality
    )
}

fn plural_s(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with(loc: u64) -> Metrics {
        Metrics {
            lines_of_code: loc,
            ..Metrics::default()
        }
    }

    #[test]
    fn test_zero_loc_short_circuits() {
        let metrics = Metrics {
            lines_of_code: 0,
            bugs: 7,
            vulnerabilities: 3,
            ..Metrics::default()
        };
        assert_eq!(describe_metrics(&metrics), "No code detected for analysis.");
    }

    #[test]
    fn test_singular_and_plural_bugs() {
        let mut metrics = metrics_with(50);
        metrics.bugs = 1;
        assert_eq!(
            describe_metrics(&metrics),
            "Found 1 potential bug in 50 lines of code."
        );

        metrics.bugs = 2;
        assert_eq!(
            describe_metrics(&metrics),
            "Found 2 potential bugs in 50 lines of code."
        );
    }

    #[test]
    fn test_security_issue_agreement() {
        let mut metrics = metrics_with(50);
        metrics.vulnerabilities = 1;
        assert_eq!(
            describe_metrics(&metrics),
            "Found 1 security issue in 50 lines of code."
        );

        metrics.vulnerabilities = 4;
        assert_eq!(
            describe_metrics(&metrics),
            "Found 4 security issues in 50 lines of code."
        );
    }

    #[test]
    fn test_phrases_joined_in_order() {
        let metrics = Metrics {
            lines_of_code: 200,
            bugs: 2,
            vulnerabilities: 1,
            code_smells: 5,
            duplicate_lines_percentage: 12.34,
            ..Metrics::default()
        };
        assert_eq!(
            describe_metrics(&metrics),
            "Found 2 potential bugs, 1 security issue, 5 code smells, 12.3% code duplication \
             in 200 lines of code."
        );
    }

    #[test]
    fn test_duplication_cutoff_is_exclusive() {
        let mut metrics = metrics_with(100);
        metrics.duplicate_lines_percentage = 10.0;
        assert_eq!(
            describe_metrics(&metrics),
            "No significant issues found in 100 lines of code. Good job!"
        );

        metrics.duplicate_lines_percentage = 10.1;
        assert_eq!(
            describe_metrics(&metrics),
            "Found 10.1% code duplication in 100 lines of code."
        );
    }

    #[test]
    fn test_clean_metrics_praise() {
        assert_eq!(
            describe_metrics(&metrics_with(42)),
            "No significant issues found in 42 lines of code. Good job!"
        );
    }

    #[test]
    fn test_local_density_tiers() {
        assert_eq!(
            describe_local(1, 100),
            "Found 1 issues in 100 lines of code. Overall quality is good."
        );
        assert_eq!(
            describe_local(3, 100),
            "Found 3 issues in 100 lines of code. Overall quality is acceptable."
        );
        assert_eq!(
            describe_local(6, 100),
            "Found 6 issues in 100 lines of code. Overall quality is needs improvement."
        );
    }

    #[test]
    fn test_local_no_issues() {
        assert_eq!(
            describe_local(0, 10),
            "No issues detected. Code appears to follow good practices."
        );
    }

    #[test]
    fn test_local_zero_loc_does_not_divide_by_zero() {
        // One issue in zero lines: density clamps the divisor to 1.
        let summary = describe_local(1, 0);
        assert!(summary.contains("needs improvement"));
    }
}
