//! Diagnostic sink for `@warn`/`@debug`. The teacher prints these directly
//! with `eprintln!` (`StyleSheetParser::debug`/`warn`); this crate keeps the
//! same message shape but routes it through a pluggable [`Logger`] so a host
//! embedding the compiler can capture diagnostics instead of inheriting
//! stderr, and so no callback needs to live in process-global state.

use std::fmt;

/// A sink for compiler diagnostics. The default implementation forwards to
/// the `log` crate at the appropriate level. `location` is a pre-rendered
/// `file:line:column` string (see [`crate::source::SourceMap::location_string`]);
/// callers resolve spans before reaching the logger so this trait does not
/// need to carry a `CodeMap` reference around.
pub trait Logger: fmt::Debug {
    fn warn(&self, message: &str, location: &str, trace: &str);
    fn debug(&self, message: &str, location: &str);
}

/// Forwards `@warn` to `log::warn!` and `@debug` to `log::debug!`, matching
/// how `spec.md` describes both as non-fatal diagnostics that never abort
/// compilation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn warn(&self, message: &str, location: &str, trace: &str) {
        if trace.is_empty() {
            log::warn!(target: "grasswood::evaluate", "{}\n    {}", message, location);
        } else {
            log::warn!(target: "grasswood::evaluate", "{}\n    {}\n{}", message, location, trace);
        }
    }

    fn debug(&self, message: &str, location: &str) {
        log::debug!(target: "grasswood::evaluate", "{} DEBUG: {}", location, message);
    }
}

/// Discards every diagnostic. Useful for tests that assert on CSS output
/// without caring about `@warn`/`@debug` noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn warn(&self, _message: &str, _location: &str, _trace: &str) {}
    fn debug(&self, _message: &str, _location: &str) {}
}
