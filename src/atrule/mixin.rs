//! `@mixin` bodies (`spec.md` §4.5). Mirrors [`crate::atrule::function`]'s
//! shape. Whether the declaration contains a `@content` invocation is
//! tracked on `Stmt::MixinDecl::accepts_content` instead of here, since it's
//! a parse-time fact about the body rather than state the evaluator needs
//! to carry between calls.

use codemap::Span;

use crate::ast::expr::Param;
use crate::ast::stmt::Stmt;
use crate::scope::Scope;

#[derive(Debug, Clone)]
pub struct UserMixin {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<codemap::Spanned<Stmt>>,
    pub closure: Scope,
    pub decl_span: Span,
}

impl PartialEq for UserMixin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.decl_span == other.decl_span
    }
}
