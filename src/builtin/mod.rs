//! The built-in function library (`spec.md` §4.5: "Also drives the
//! built-in function library"). `crate::evaluate::Evaluator::eval_call`
//! tries a user-declared function/mixin first, then `dispatch` here, then
//! finally falls back to emitting a plain CSS function call — matching
//! `spec.md` §4.5's "user functions can shadow built-ins" rule, since a
//! `@function` of the same name is always found first by the scope lookup.
//!
//! Organized the way Sass's own built-ins are documented: one module per
//! namespace (`math.*`, `color.*`, `list.*`, `map.*`, `string.*`,
//! `meta.*`, `selector.*`), each also reachable unprefixed through the
//! legacy global names (`percentage()`, `nth()`, `type-of()`, …).
//! `dispatch` strips a leading `namespace.` before matching, so both forms
//! share one implementation.

mod color;
mod list;
mod map;
mod math;
mod meta;
mod selector;
mod string;

use std::collections::HashMap;

use codemap::Span;

use crate::error::SassResult;
use crate::value::Value;

/// Already-evaluated call-site arguments, positional and named, handed to
/// a built-in the same way `crate::evaluate::args::ResolvedArgs` feeds a
/// user-defined function — but keyed by plain `HashMap` since built-ins
/// don't need the ordering `bind_params` relies on.
pub struct Args {
    pub positional: Vec<Value>,
    pub named: HashMap<String, Value>,
}

impl Args {
    /// The argument at `index` if one was passed positionally, else the
    /// one passed under `name`.
    pub fn get(&self, index: usize, name: &str) -> Option<Value> {
        self.positional.get(index).cloned().or_else(|| self.named.get(name).cloned())
    }
}

/// Looks `name` up across every built-in namespace, returning `None` when
/// nothing matches so the caller can fall back to a plain CSS function
/// call. A matched built-in's own argument-count/type errors surface as
/// `Some(Err(..))`.
pub fn dispatch(name: &str, args: Args, span: Span, precision: u8) -> Option<SassResult<Value>> {
    let bare = name.rsplit('.').next().unwrap_or(name);
    math::dispatch(bare, &args, span)
        .or_else(|| color::dispatch(bare, &args, span))
        .or_else(|| list::dispatch(bare, &args, span))
        .or_else(|| map::dispatch(bare, &args, span))
        .or_else(|| string::dispatch(bare, &args, span, precision))
        .or_else(|| meta::dispatch(bare, &args, span, precision))
        .or_else(|| selector::dispatch(bare, &args, span))
}
