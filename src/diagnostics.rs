//! Diagnostic collection and rendering
//!
//! Diagnostics accumulate in discovery order during analysis and are
//! drained once, as a batch, once the whole program has been visited.
//! Rendering matches the reference tool's exact format so output stays
//! byte-for-byte stable across runs.

use crate::ast::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub message: String,
}

/// Maps 1-based line numbers to raw source text; a missing line renders
/// as empty.
pub trait SourceLines {
    fn line(&self, line: u32) -> &str;
}

impl SourceLines for std::collections::HashMap<u32, String> {
    fn line(&self, line: u32) -> &str {
        self.get(&line).map(String::as_str).unwrap_or("")
    }
}

impl SourceLines for Vec<String> {
    /// `line` is 1-based; index 0 of the backing vec holds line 1.
    fn line(&self, line: u32) -> &str {
        line.checked_sub(1)
            .and_then(|idx| self.get(idx as usize))
            .map(String::as_str)
            .unwrap_or("")
    }
}

const NO_ERROR_BANNER: &str = "\
|---------------------------------------------------|
|  There is no syntactic error and semantic error!  |
|---------------------------------------------------|
";

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        DiagnosticCollector::default()
    }

    pub fn push(&mut self, location: Location, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(line = location.line, column = location.column, %message, "diagnostic emitted");
        self.diagnostics.push(Diagnostic {
            location,
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Render every diagnostic in discovery order, or the fixed "no
    /// error" banner when none were raised.
    pub fn render(&self, source: &dyn SourceLines) -> String {
        if self.diagnostics.is_empty() {
            return NO_ERROR_BANNER.to_string();
        }
        let mut out = String::new();
        for d in &self.diagnostics {
            out.push_str(&format!(
                "<Error> Found in line {}, column {}: {}\n",
                d.location.line, d.location.column, d.message
            ));
            out.push_str("    ");
            out.push_str(source.line(d.location.line));
            out.push('\n');
            out.push_str("   ");
            for _ in 0..d.location.column {
                out.push(' ');
            }
            out.push_str("^\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32, column: u32) -> Location {
        Location { line, column }
    }

    #[test]
    fn empty_collector_renders_banner() {
        let c = DiagnosticCollector::new();
        let source: Vec<String> = vec![];
        assert_eq!(c.render(&source), NO_ERROR_BANNER);
    }

    #[test]
    fn render_includes_source_line_and_caret() {
        let mut c = DiagnosticCollector::new();
        c.push(loc(2, 5), "use of undeclared symbol 'x'");
        let source = vec!["program p;".to_string(), "print x;".to_string()];
        let rendered = c.render(&source);
        assert!(rendered.contains("<Error> Found in line 2, column 5: use of undeclared symbol 'x'"));
        assert!(rendered.contains("    print x;"));
        assert!(rendered.ends_with("^\n"));
    }

    #[test]
    fn diagnostics_preserve_discovery_order() {
        let mut c = DiagnosticCollector::new();
        c.push(loc(1, 1), "first");
        c.push(loc(2, 1), "second");
        let msgs: Vec<_> = c.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, vec!["first", "second"]);
    }

    #[test]
    fn missing_line_renders_empty() {
        let mut c = DiagnosticCollector::new();
        c.push(loc(99, 1), "oops");
        let source: Vec<String> = vec!["only one line".to_string()];
        let rendered = c.render(&source);
        assert!(rendered.contains("line 99, column 1"));
    }
}
