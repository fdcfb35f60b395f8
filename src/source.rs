//! Thin wrapper around [`codemap::CodeMap`], the crate's realization of
//! `spec.md` §3's `SourceFile`/`SourceSpan`. Every place in this crate that
//! needs a line/column or a source excerpt goes through here instead of
//! poking at `codemap` internals directly, so the one spot that depends on
//! the exact shape of the `codemap` API is this file.

use std::sync::Arc;

use codemap::{CodeMap, File, Span, SpanLoc};

/// Owns every source buffer for one compilation. Synthetic sources
/// (generated CSS fragments, interpolated selectors) are added the same way
/// as real files: as a separate named entry whose span lineage is tracked
/// by `codemap` itself.
#[derive(Debug, Default)]
pub struct SourceMap {
    inner: CodeMap,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap {
            inner: CodeMap::new(),
        }
    }

    /// Registers a new source buffer and returns its whole-file span.
    pub fn add_file(&mut self, name: String, source: String) -> Arc<File> {
        self.inner.add_file(name, source)
    }

    /// Resolves a span to its file plus begin/end line-column pair.
    pub fn look_up_span(&self, span: Span) -> SpanLoc {
        self.inner.look_up_span(span)
    }

    /// The single source line a span begins on, for error excerpts.
    pub fn excerpt_line(&self, span: Span) -> (String, usize, usize) {
        let loc = self.look_up_span(span);
        let line = loc.file.source_line(loc.begin.line).to_owned();
        (line, loc.begin.line, loc.begin.column)
    }

    /// `file:line:column`, the form used in backtraces and `@debug` output.
    pub fn location_string(&self, span: Span) -> String {
        let loc = self.look_up_span(span);
        format!(
            "{}:{}:{}",
            loc.file.name(),
            loc.begin.line + 1,
            loc.begin.column + 1
        )
    }

    pub fn file_name(&self, span: Span) -> String {
        self.look_up_span(span).file.name().to_owned()
    }
}
