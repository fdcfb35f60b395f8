//! Runtime representations of user-declared callables (`spec.md` §3:
//! `Function(callable)`, `Mixin(callable)`). Parsing turns `@function`/
//! `@mixin` into [`crate::ast::stmt::Stmt::FunctionDecl`]/`MixinDecl`; the
//! evaluator (`crate::evaluate`) wraps their bodies into the types here the
//! first time it executes the declaration, mirroring how the teacher's
//! `atrule::function::Function` is built once at `decl_from_tokens` time and
//! then called repeatedly via `Function::args`/`call`
//! (`examples/MidasLamb-grass/src/atrule/function.rs`).

pub mod function;
pub mod mixin;

pub use function::UserFunction;
pub use mixin::UserMixin;
