//! The three parallel trees `spec.md` §2/§3 calls for: the statement tree
//! produced by the parser ([`stmt`]), the expression tree embedded inside it
//! ([`expr`]), and the post-evaluation CSS tree the evaluator builds
//! ([`css`]). Grounded on the shape of `examples/MidasLamb-grass/src/lib.rs`'s
//! `Stmt`/`Expr` enums, split into dedicated modules and given real spans on
//! every node instead of the teacher's span-only-sometimes approach.

pub mod css;
pub mod expr;
pub mod stmt;

pub use css::CssNode;
pub use expr::Expr;
pub use stmt::Stmt;
