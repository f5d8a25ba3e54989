//! Plain-text rendering of build diagnostics.

use crate::core::pipeline::Build;

/// Collapse whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// One line per diagnostic: scan failures, parse failures, id collisions, then
/// dangling references.
pub fn diagnostic_lines(build: &Build) -> Vec<String> {
    let mut lines = Vec::new();
    for failure in &build.scan.failures {
        lines.push(format!("scan: {}: {}", failure.path, failure.cause));
    }
    for failure in build.parse_failures() {
        lines.push(format!("parse: {}", failure));
    }
    for failure in &build.doc_failures {
        lines.push(format!("parse: {}: {}", failure.path, failure.cause));
    }
    for collision in &build.collisions {
        lines.push(format!(
            "duplicate id: {} ({} replaced {})",
            collision.id, collision.kept, collision.replaced
        ));
    }
    for warning in &build.warnings {
        lines.push(format!("dangling reference: {}", warning));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_line_bounds_and_collapses() {
        assert_eq!(compact_line("a   b\n\tc", 10), "a b c");
        assert_eq!(compact_line("abcdefghij", 4), "abcd...");
    }
}
