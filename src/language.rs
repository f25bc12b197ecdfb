//! Extension to language-tag mapping.
//!
//! The remote analysis service tags submitted sources with a language key
//! derived from the file extension. Unknown extensions map to "unknown"
//! rather than failing the submission.

use std::path::Path;

/// Language tag used when the extension is missing or unmapped.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Language keys by file extension, as understood by the remote service.
static LANGUAGE_MAP: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "py" => "python",
    "js" => "js",
    "ts" => "ts",
    "jsx" => "js",
    "tsx" => "ts",
    "java" => "java",
    "c" => "c",
    "cpp" => "cpp",
    "cs" => "cs",
    "go" => "go",
    "php" => "php",
    "ruby" => "ruby",
    "scala" => "scala",
    "kt" => "kotlin",
    "html" => "web",
    "css" => "web",
    "xml" => "xml",
    "json" => "json",
};

/// Look up the language key for a file extension (without dot).
pub fn language_for_extension(ext: &str) -> &'static str {
    LANGUAGE_MAP.get(ext).copied().unwrap_or(UNKNOWN_LANGUAGE)
}

/// Extension of a filename, without the dot.
pub fn file_extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|e| e.to_str())
}

/// Language key for a filename, "unknown" when the extension is missing
/// or unmapped.
pub fn language_for_filename(filename: &str) -> &'static str {
    file_extension(filename)
        .map(language_for_extension)
        .unwrap_or(UNKNOWN_LANGUAGE)
}
