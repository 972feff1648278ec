//! JSON document emission.
//!
//! `serde_json`'s pretty printer indents with two spaces and leaves
//! non-ASCII characters unescaped, which is exactly the documented output
//! contract, so values print straight from their `Serialize` impls.

use serde::Serialize;

use crate::error::{Result, ToolError};

/// Pretty-print a document to stdout.
pub fn print_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Print an error as its structured JSON document. Error documents are
/// plain JSON objects, so this path never fails.
pub fn print_error_document(err: &ToolError) {
    let doc = err.to_document();
    let json = serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_uses_two_space_indent() {
        let value = serde_json::json!({"title": "x"});
        let rendered = serde_json::to_string_pretty(&value).unwrap();
        assert_eq!(rendered, "{\n  \"title\": \"x\"\n}");
    }

    #[test]
    fn test_pretty_preserves_non_ascii() {
        let value = serde_json::json!({"title": "日本語"});
        let rendered = serde_json::to_string_pretty(&value).unwrap();
        assert!(rendered.contains("日本語"));
        assert!(!rendered.contains("\\u"));
    }
}
