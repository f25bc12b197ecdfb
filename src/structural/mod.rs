//! Structural (syntax-tree-backed) checks per source language.
//!
//! This module provides:
//! - `StructuralChecker` trait: abstract interface for per-language checks
//! - a factory registry keyed by file extension
//! - a tree-sitter implementation for Python
//!
//! Which languages can be structurally checked is a registration, not an
//! architectural constraint: implement the trait and register a factory in
//! `init`.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::model::Finding;

#[cfg(feature = "tree-sitter")]
pub mod python;

/// Language-specific structural checker.
///
/// A checker owns the full check for one language: parse the source,
/// report a single syntax finding on parse failure, otherwise flag
/// structural problems (overlong functions, oversized parameter lists).
pub trait StructuralChecker: Send + Sync {
    /// Language identifier (e.g. "python").
    fn language_id(&self) -> &'static str;

    /// File extensions this checker handles, without dot.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Check source text, returning findings in depth-first source order.
    fn check(&self, code: &str) -> Vec<Finding>;
}

/// Factory function type for creating checker instances.
pub type CheckerFactory = fn() -> Box<dyn StructuralChecker>;

/// Global checker registry mapping file extensions to factories.
static REGISTRY: Lazy<RwLock<HashMap<String, CheckerFactory>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a checker factory for a file extension (without dot).
pub fn register(ext: &str, factory: CheckerFactory) {
    let mut registry = REGISTRY.write().unwrap();
    registry.insert(ext.to_string(), factory);
}

/// Get a checker for the given file extension.
/// Returns None if no checker is registered for the extension.
pub fn for_extension(ext: &str) -> Option<Box<dyn StructuralChecker>> {
    let registry = REGISTRY.read().unwrap();
    registry.get(ext).map(|factory| factory())
}

/// Return all registered file extensions.
pub fn supported_extensions() -> Vec<String> {
    let registry = REGISTRY.read().unwrap();
    registry.keys().cloned().collect()
}

/// Initialize the registry with all built-in language checkers.
/// Call this once at startup before using checkers.
#[cfg(feature = "tree-sitter")]
pub fn init() {
    register("py", || Box::new(python::PythonChecker::new()));
}

/// Initialize (no-op when tree-sitter is disabled).
#[cfg(not(feature = "tree-sitter"))]
pub fn init() {
    // No structural checkers available
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockChecker;

    impl StructuralChecker for MockChecker {
        fn language_id(&self) -> &'static str {
            "mock"
        }

        fn file_extensions(&self) -> &'static [&'static str] {
            &["mock"]
        }

        fn check(&self, _code: &str) -> Vec<Finding> {
            Vec::new()
        }
    }

    fn mock_factory() -> Box<dyn StructuralChecker> {
        Box::new(MockChecker)
    }

    #[test]
    fn test_registry() {
        register("mock", mock_factory);

        let checker = for_extension("mock");
        assert!(checker.is_some());
        assert_eq!(checker.unwrap().language_id(), "mock");
    }

    #[test]
    fn test_unregistered_extension() {
        assert!(for_extension("nope").is_none());
    }
}
