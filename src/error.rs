//! The error taxonomy described by the system design: every error carries
//! the span at which it occurred and the call stack that was active when it
//! was raised.

use codemap::Span;

use crate::evaluate::stack::StackFrame;
use crate::source::SourceMap;

pub type SassResult<T> = Result<T, Box<SassError>>;

/// A single compiler error. Every variant names the offending span; the
/// `trace` is filled in as the error unwinds through evaluator frames.
#[derive(Debug, thiserror::Error)]
pub enum SassError {
    #[error("{message}")]
    Parse { message: String, span: Span },
    #[error("{message}")]
    SassScript { message: String, span: Span },
    #[error("{message}")]
    Extend { message: String, span: Span },
    #[error("{message}")]
    Import { message: String, span: Span },
    #[error("{message}")]
    User { message: String, span: Span },
    #[error("internal error: {message}")]
    Internal { message: String, span: Span },
}

impl SassError {
    pub fn span(&self) -> Span {
        match self {
            SassError::Parse { span, .. }
            | SassError::SassScript { span, .. }
            | SassError::Extend { span, .. }
            | SassError::Import { span, .. }
            | SassError::User { span, .. }
            | SassError::Internal { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SassError::Parse { message, .. }
            | SassError::SassScript { message, .. }
            | SassError::Extend { message, .. }
            | SassError::Import { message, .. }
            | SassError::User { message, .. }
            | SassError::Internal { message, .. } => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SassError::Parse { .. } => "ParseError",
            SassError::SassScript { .. } => "SassScriptError",
            SassError::Extend { .. } => "ExtendError",
            SassError::Import { .. } => "ImportError",
            SassError::User { .. } => "UserError",
            SassError::Internal { .. } => "InternalError",
        }
    }

    pub fn parse(message: impl Into<String>, span: Span) -> Box<SassError> {
        Box::new(SassError::Parse {
            message: message.into(),
            span,
        })
    }

    pub fn sass_script(message: impl Into<String>, span: Span) -> Box<SassError> {
        Box::new(SassError::SassScript {
            message: message.into(),
            span,
        })
    }

    pub fn extend(message: impl Into<String>, span: Span) -> Box<SassError> {
        Box::new(SassError::Extend {
            message: message.into(),
            span,
        })
    }

    pub fn import(message: impl Into<String>, span: Span) -> Box<SassError> {
        Box::new(SassError::Import {
            message: message.into(),
            span,
        })
    }

    pub fn user(message: impl Into<String>, span: Span) -> Box<SassError> {
        Box::new(SassError::User {
            message: message.into(),
            span,
        })
    }

    pub fn internal(message: impl Into<String>, span: Span) -> Box<SassError> {
        Box::new(SassError::Internal {
            message: message.into(),
            span,
        })
    }

    /// Renders the single formatted failure block: kind, message, a caret
    /// excerpt of the offending span, and a backtrace of active frames.
    pub fn format_with_trace(&self, sources: &SourceMap, trace: &[StackFrame]) -> String {
        let mut out = String::new();
        out.push_str(&format!("Error: {}\n", self.message()));
        let (line_str, line_idx, col) = sources.excerpt_line(self.span());
        let width = line_str.len().saturating_sub(col).max(1);
        out.push_str(&format!("{:>4} | {}\n", line_idx + 1, line_str));
        out.push_str(&format!(
            "     | {}{}\n",
            " ".repeat(col),
            "^".repeat(width.min(5).max(1))
        ));
        out.push_str(&format!("  {}\n", sources.location_string(self.span())));
        for frame in trace.iter().rev() {
            out.push_str(&format!("  {}\n", frame));
        }
        out
    }
}

impl From<(&str, Span)> for Box<SassError> {
    fn from((message, span): (&str, Span)) -> Self {
        SassError::parse(message.to_owned(), span)
    }
}

impl From<(String, Span)> for Box<SassError> {
    fn from((message, span): (String, Span)) -> Self {
        SassError::parse(message, span)
    }
}

