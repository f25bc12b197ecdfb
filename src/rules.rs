//! Local pattern-based code smell detection.
//!
//! A fixed table of regular expressions is compiled once on first use and
//! scanned against the full source text. The regex crate has no lookaround,
//! so rules that need "not followed by X" context pair a plain pattern with
//! a small post-match guard over the surrounding text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Finding, FindingKind, Severity};

/// Decides whether a raw regex match should be suppressed, given the full
/// source text and the match end offset.
type SuppressFn = fn(code: &str, match_end: usize) -> bool;

/// One entry of the rule table.
pub struct Rule {
    pattern: &'static str,
    message: &'static str,
    suppress: Option<SuppressFn>,
}

impl Rule {
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Table order is load-bearing: findings are grouped by rule in this order.
static RULE_TABLE: &[Rule] = &[
    Rule {
        pattern: r"import \*",
        message: "Avoid wildcard imports as they can lead to namespace pollution",
        suppress: None,
    },
    Rule {
        pattern: r"except:",
        message: "Avoid bare except clauses; catch specific exceptions",
        suppress: Some(comment_follows),
    },
    Rule {
        pattern: r"print\(",
        message: "Consider using logging instead of print statements in production code",
        suppress: None,
    },
    Rule {
        pattern: r"\.get\([^(),]*\)",
        message: "Dictionary get() calls should provide a default value",
        suppress: Some(chained_call_follows),
    },
    Rule {
        pattern: r"os\.path\.join\(.*?\+.*?\)",
        message: "Use os.path.join for path concatenation instead of string concatenation",
        suppress: None,
    },
    Rule {
        pattern: r"for\s+\w+\s+in\s+range\(len\(\w+\)\)",
        message: "Consider using enumerate() instead of range(len())",
        suppress: None,
    },
    Rule {
        pattern: r"TODO|FIXME",
        message: "Resolve TODO/FIXME comments before finalizing code",
        suppress: None,
    },
    Rule {
        pattern: r"\bpass\b",
        message: "Empty pass statements might indicate incomplete code",
        suppress: None,
    },
    Rule {
        pattern: r"if\s+\w+\s*==\s*(?:True|False)",
        message: "Redundant comparison with boolean literals",
        suppress: None,
    },
];

struct CompiledRule {
    regex: Regex,
    message: &'static str,
    suppress: Option<SuppressFn>,
}

static RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .map(|rule| CompiledRule {
            regex: Regex::new(rule.pattern).expect("rule table pattern must compile"),
            message: rule.message,
            suppress: rule.suppress,
        })
        .collect()
});

/// The static rule table, in evaluation order.
pub fn table() -> &'static [Rule] {
    RULE_TABLE
}

/// Scan source text against the rule table.
///
/// Findings are grouped by rule in table order, then by match position;
/// every finding is a Warning of kind CodeSmell with no rule identifier.
pub fn check_patterns(code: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rule in RULES.iter() {
        for mat in rule.regex.find_iter(code) {
            if let Some(suppress) = rule.suppress {
                if suppress(code, mat.end()) {
                    continue;
                }
            }
            findings.push(Finding {
                line: line_of_offset(code, mat.start()),
                message: rule.message.to_string(),
                severity: Severity::Warning,
                kind: FindingKind::CodeSmell,
                rule: None,
            });
        }
    }

    findings
}

/// 1-based line number of a byte offset.
fn line_of_offset(code: &str, offset: usize) -> u64 {
    code[..offset].bytes().filter(|&b| b == b'\n').count() as u64 + 1
}

/// Suppress a bare-except match when the clause only carries a comment.
fn comment_follows(code: &str, match_end: usize) -> bool {
    next_non_whitespace(code, match_end) == Some('#')
}

/// Suppress a dict-get match when the call is immediately chained.
fn chained_call_follows(code: &str, match_end: usize) -> bool {
    next_non_whitespace(code, match_end) == Some('.')
}

fn next_non_whitespace(code: &str, offset: usize) -> Option<char> {
    code[offset..].chars().find(|c| !c.is_whitespace())
}
