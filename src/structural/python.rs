//! Python structural checks using tree-sitter.

use tree_sitter::{Language, Node, Parser};

use crate::model::{Finding, FindingKind, Severity};

use super::StructuralChecker;

/// Body statement count above which a function is flagged as too long.
const MAX_BODY_STATEMENTS: usize = 30;
/// Declared parameter count above which a function is flagged.
const MAX_PARAMETERS: usize = 5;

pub struct PythonChecker {
    language: Language,
}

impl PythonChecker {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Option<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).ok()?;
        Some(parser)
    }
}

impl Default for PythonChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralChecker for PythonChecker {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn check(&self, code: &str) -> Vec<Finding> {
        let mut parser = match self.create_parser() {
            Some(p) => p,
            None => return Vec::new(),
        };
        let tree = match parser.parse(code, None) {
            Some(t) => t,
            None => return vec![syntax_finding(0, "unable to parse source".to_string())],
        };

        let root = tree.root_node();
        if root.has_error() {
            // One syntax finding for the whole file; no structural checks
            // on a broken tree.
            return vec![first_syntax_error(root)];
        }

        let mut findings = Vec::new();
        visit_functions(root, code.as_bytes(), &mut findings);
        findings
    }
}

/// Walk the tree depth-first in source order, checking every function
/// definition including nested ones.
fn visit_functions(node: Node, source: &[u8], findings: &mut Vec<Finding>) {
    if node.kind() == "function_definition" {
        check_function(node, source, findings);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_functions(child, source, findings);
    }
}

/// The length and parameter checks are independent; a function may trigger
/// zero, one, or both, length first.
fn check_function(node: Node, source: &[u8], findings: &mut Vec<Finding>) {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())
        .unwrap_or("<anonymous>");
    let line = node.start_position().row as u64 + 1;

    if let Some(body) = node.child_by_field_name("body") {
        let statements = statement_count(body);
        if statements > MAX_BODY_STATEMENTS {
            findings.push(Finding {
                line,
                message: format!(
                    "Function '{}' is too long ({} lines). Consider refactoring.",
                    name, statements
                ),
                severity: Severity::Warning,
                kind: FindingKind::Complexity,
                rule: None,
            });
        }
    }

    if let Some(parameters) = node.child_by_field_name("parameters") {
        let count = parameter_count(parameters);
        if count > MAX_PARAMETERS {
            findings.push(Finding {
                line,
                message: format!(
                    "Function '{}' has too many parameters ({}). Consider refactoring.",
                    name, count
                ),
                severity: Severity::Warning,
                kind: FindingKind::Complexity,
                rule: None,
            });
        }
    }
}

/// Count the statements directly in a function body, excluding comments.
fn statement_count(body: Node) -> usize {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .count()
}

/// Count declared parameters: plain, typed, and defaulted ones (including
/// `self`). `*args`/`**kwargs` splats are not positional declarations.
fn parameter_count(parameters: Node) -> usize {
    let mut cursor = parameters.walk();
    parameters
        .named_children(&mut cursor)
        .filter(|n| {
            matches!(
                n.kind(),
                "identifier" | "typed_parameter" | "default_parameter" | "typed_default_parameter"
            )
        })
        .count()
}

/// Locate the first error in the tree and turn it into the single syntax
/// finding for the file.
fn first_syntax_error(root: Node) -> Finding {
    match first_error_node(root) {
        Some(node) => {
            let line = node.start_position().row as u64 + 1;
            let detail = if node.is_missing() {
                format!("missing {} at line {}", node.kind(), line)
            } else {
                format!("invalid syntax at line {}", line)
            };
            syntax_finding(line, detail)
        }
        None => syntax_finding(0, "invalid syntax".to_string()),
    }
}

fn first_error_node(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for child in children {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }

    // has_error with no specific child to blame: report the node itself
    Some(node)
}

fn syntax_finding(line: u64, detail: String) -> Finding {
    Finding {
        line,
        message: format!("Syntax error: {}", detail),
        severity: Severity::Error,
        kind: FindingKind::Syntax,
        rule: None,
    }
}
