//! `@function` bodies (`spec.md` §4.5). Adapted from the teacher's
//! `Function { scope, args, body, pos }`
//! (`examples/MidasLamb-grass/src/atrule/function.rs`): same four fields,
//! renamed to this crate's AST/scope types. Argument binding and body
//! execution are no longer methods on this struct — they live in
//! `crate::evaluate`, which is the one place that knows how to walk
//! statements — so `UserFunction` itself is plain declaration data closed
//! over its defining scope.

use codemap::Span;

use crate::ast::expr::Param;
use crate::ast::stmt::Stmt;
use crate::scope::Scope;

#[derive(Debug, Clone)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<codemap::Spanned<Stmt>>,
    /// The lexical scope the function closes over, captured at declaration
    /// time (`spec.md` §4.4).
    pub closure: Scope,
    pub decl_span: Span,
}

impl PartialEq for UserFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.decl_span == other.decl_span
    }
}
