//! Diagnostic sinks.
//!
//! The engine owns the canonical stored list; a sink is just another
//! observer notified on every `emit`. Two implementations ship here: a
//! colorized text printer and a stored list for tooling/LSP consumers that
//! want their own buffer (e.g. per-document diagnostics, reset between
//! analyses) independent of the engine's lifetime-spanning history.

use crate::Diagnostic;

/// Receives every diagnostic as it is emitted.
pub trait DiagnosticSink: Send {
    fn emit(&mut self, diagnostic: &Diagnostic);
}

/// Prints each diagnostic to stderr immediately, Rust-compiler style.
/// Needs the originating source text to render the caret-underlined
/// snippet; callers without it can pass `""` and still get the header line.
pub struct TextSink {
    source_by_file: std::collections::HashMap<String, String>,
}

impl TextSink {
    pub fn new() -> Self {
        Self {
            source_by_file: std::collections::HashMap::new(),
        }
    }

    pub fn register_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        self.source_by_file.insert(file.into(), text.into());
    }
}

impl Default for TextSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for TextSink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let source = self
            .source_by_file
            .get(&diagnostic.span.file)
            .map(String::as_str)
            .unwrap_or("");
        eprint!("{}", diagnostic.format(source));
    }
}

/// Buffers diagnostics for later retrieval (LSP `publishDiagnostics`, test
/// assertions) instead of printing them.
#[derive(Default)]
pub struct StoredSink {
    diagnostics: Vec<Diagnostic>,
}

impl StoredSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl DiagnosticSink for StoredSink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn stored_sink_buffers_in_order() {
        let mut sink = StoredSink::new();
        sink.emit(&Diagnostic::error("err_x", "first".into(), Span::unknown()));
        sink.emit(&Diagnostic::error("err_y", "second".into(), Span::unknown()));
        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.diagnostics()[0].message, "first");
    }
}
