//! The statement tree (`spec.md` §3). One node per production the grammar
//! in `spec.md` §4.2 accepts; `@else` is folded into `If`'s branch list the
//! same way `examples/MidasLamb-grass/src/atrule/if_rule.rs` does it rather
//! than being its own node.

use crate::ast::expr::{CallArgs, Expr, Param, Spanned};
use crate::common::SassSyntax;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A style rule: `selector { ... }`. The selector is stored as an
    /// interpolated-string expression and parsed into a real selector list
    /// lazily, after `#{}` segments are evaluated (`spec.md` §4.5).
    StyleRule {
        selector: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    /// A plain or custom CSS declaration: `property: value;`. `property` may
    /// itself contain interpolation (`background-#{$side}`).
    Declaration {
        property: Spanned<Expr>,
        value: Option<Spanned<Expr>>,
        body: Vec<Spanned<Stmt>>,
    },
    VariableDecl {
        namespace: Option<String>,
        name: String,
        value: Spanned<Expr>,
        default: bool,
        global: bool,
    },
    If {
        branches: Vec<IfBranch>,
        else_branch: Vec<Spanned<Stmt>>,
    },
    Each {
        vars: Vec<String>,
        list: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    For {
        var: String,
        from: Spanned<Expr>,
        to: Spanned<Expr>,
        inclusive: bool,
        body: Vec<Spanned<Stmt>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    AtRoot {
        query: Option<String>,
        body: Vec<Spanned<Stmt>>,
    },
    Media {
        query: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    Supports {
        condition: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    Keyframes {
        name: String,
        body: Vec<Spanned<Stmt>>,
    },
    KeyframesBlock {
        selector: String,
        body: Vec<Spanned<Stmt>>,
    },
    MixinDecl {
        name: String,
        params: Vec<Param>,
        accepts_content: bool,
        body: Vec<Spanned<Stmt>>,
    },
    FunctionDecl {
        name: String,
        params: Vec<Param>,
        body: Vec<Spanned<Stmt>>,
    },
    Include {
        namespace: Option<String>,
        name: String,
        args: CallArgs,
        content: Option<ContentBlock>,
    },
    ContentInclude {
        args: CallArgs,
    },
    Return(Spanned<Expr>),
    Use {
        url: String,
        alias: Option<String>,
        configuration: Vec<(String, Spanned<Expr>)>,
    },
    Forward {
        url: String,
        prefix: Option<String>,
        show: Option<Vec<String>>,
        hide: Option<Vec<String>>,
    },
    Import(Vec<ImportArgument>),
    Extend {
        selector: Spanned<Expr>,
        optional: bool,
    },
    Error(Spanned<Expr>),
    Warn(Spanned<Expr>),
    Debug(Spanned<Expr>),
    LoudComment(String),
    SilentComment(String),
    UnknownAtRule {
        name: String,
        params: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    /// Top-level statement carrying which dialect produced it, so the
    /// preloader and plain-CSS restriction checks (`spec.md` §4.2) can be
    /// applied without re-deriving it from the file extension.
    Root {
        syntax: SassSyntax,
        body: Vec<Spanned<Stmt>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub cond: Spanned<Expr>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub params: Vec<Param>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportArgument {
    /// A static CSS `@import url(...)`, left untouched for the serializer
    /// to hoist (`spec.md` §4.8).
    Static(Spanned<Expr>),
    /// A Sass/SCSS module import, resolved and spliced at evaluation time
    /// (`spec.md` §4.4's legacy `@import` semantics).
    Dynamic(String),
}
