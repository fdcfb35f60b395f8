//! The evaluator's call stack (`spec.md` §4.5 "Call stack"). A frame is
//! pushed on every mixin/function/`@import` invocation and popped on
//! return; the stack is walked, innermost first, to build a user-facing
//! backtrace when an error unwinds (`SassError::format_with_trace`).

use std::fmt;

use codemap::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Function,
    Mixin,
    Import,
    Content,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameKind::Function => "function",
            FrameKind::Mixin => "mixin",
            FrameKind::Import => "import",
            FrameKind::Content => "content block",
        })
    }
}

#[derive(Debug, Clone)]
pub struct StackFrame {
    pub kind: FrameKind,
    pub name: String,
    pub call_site: Span,
}

impl StackFrame {
    pub fn new(kind: FrameKind, name: impl Into<String>, call_site: Span) -> Self {
        StackFrame {
            kind,
            name: name.into(),
            call_site,
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}()", self.kind, self.name)
    }
}
