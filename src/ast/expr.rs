//! The expression tree (`spec.md` §3 "Statement AST"/§4.2). Built by the
//! value parser, walked by the evaluator (`crate::evaluate`); every leaf and
//! combinator SassScript defines gets a variant here rather than being
//! inlined into parsing the way the teacher's `Value::from_tokens` does it
//! (`spec.md` §4.5 requires expressions to evaluate strictly and separately
//! from parsing, so this crate generalizes past the teacher here).

use crate::common::{Brackets, ListSeparator, QuoteKind};
use crate::unit::Unit;

pub type Spanned<T> = codemap::Spanned<T>;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Number {
        value: f64,
        unit: Unit,
    },
    /// A string literal. `parts` alternates literal text and interpolated
    /// expressions; a purely-literal string has a single `Literal` part.
    Str {
        parts: Vec<StringPart>,
        quote: QuoteKind,
    },
    Color(String),
    List {
        items: Vec<Spanned<Expr>>,
        separator: ListSeparator,
        brackets: Brackets,
    },
    Map(Vec<(Spanned<Expr>, Spanned<Expr>)>),
    /// `$name`, resolved against the current frame at evaluation time.
    /// Parse-time slot resolution (`spec.md` §4.4's `(frame-depth,
    /// slot-index)`) is an optimization this crate does not implement;
    /// `DESIGN.md` records this as a deliberate Open Question resolution.
    Variable(String),
    /// `namespace.$name` / `namespace.fn(...)` produced by `@use ... as ns`.
    Namespaced {
        namespace: String,
        name: String,
    },
    BinOp {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Paren(Box<Spanned<Expr>>),
    /// Function call, user-defined or built-in; disambiguated at evaluation
    /// time by environment lookup (`spec.md` §4.4).
    FuncCall {
        namespace: Option<String>,
        name: String,
        args: CallArgs,
    },
    /// `calc()`/`min()`/`max()`/`clamp()`, parsed specially because their
    /// arguments may contain un-evaluatable fragments (`spec.md` §4.3).
    Calculation {
        name: String,
        args: Vec<Spanned<Expr>>,
    },
    /// `get-function()`/bare function name in a first-class context.
    FunctionRef(String),
    /// An already-evaluated value spliced back into the expression tree,
    /// used by default-argument re-evaluation and by the `@each`/`@for`
    /// desugaring that feeds loop variables back through the evaluator.
    Value(Box<crate::value::Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Literal(String),
    Interpolation(Box<Spanned<Expr>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Plus,
}

/// Positional + keyword argument list at a call site, plus the optional
/// trailing spread forms `spec.md` §4.5 names (`$list...`, `$map...`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallArgs {
    pub positional: Vec<Spanned<Expr>>,
    pub named: Vec<(String, Spanned<Expr>)>,
    pub rest: Option<Box<Spanned<Expr>>>,
}

impl CallArgs {
    pub fn new() -> Self {
        CallArgs::default()
    }
}

/// A formal parameter in a `@function`/`@mixin` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Spanned<Expr>>,
    pub is_variadic: bool,
}
