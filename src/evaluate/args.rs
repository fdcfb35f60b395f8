//! Argument binding between a call site's [`CallArgs`] and a declaration's
//! `Vec<Param>` (`spec.md` §4.5): positional-then-named resolution with
//! defaults evaluated lazily in the callee's own (progressively populated)
//! scope, a trailing variadic parameter capturing the remainder as an
//! [`ArgumentList`], and the calling-side spread forms (`$list...`) that
//! distribute a list positionally and a trailing map as keywords.

use std::collections::HashMap;

use codemap::Span;
use indexmap::IndexMap;

use crate::ast::expr::Param;
use crate::common::ListSeparator;
use crate::error::{SassError, SassResult};
use crate::value::arglist::ArgumentList;
use crate::value::map::SassMap;
use crate::value::Value;

/// Already-evaluated call-site arguments, after spread expansion.
#[derive(Debug, Default, Clone)]
pub struct ResolvedArgs {
    pub positional: Vec<Value>,
    pub named: IndexMap<String, Value>,
}

/// Expands a `...` spread value (from `CallArgs::rest`) into the positional
/// list it contributes plus any keywords it carries: a list/arglist spreads
/// purely positionally (an arglist's own keywords ride along too), a map
/// spreads entirely as keywords (`spec.md` §4.5).
pub fn expand_rest(rest: Value, span: Span) -> SassResult<(Vec<Value>, IndexMap<String, Value>)> {
    match rest {
        Value::ArgList(args) => {
            let mut named = IndexMap::new();
            for (k, v) in args.keywords.iter() {
                let key = match k {
                    Value::String(s, _) => s.clone(),
                    other => other.inspect(),
                };
                named.insert(key, v.clone());
            }
            Ok((args.items, named))
        }
        Value::List(items, ..) => Ok((items, IndexMap::new())),
        Value::Map(map) => {
            let mut named = IndexMap::new();
            for (k, v) in map.iter() {
                let key = match k {
                    Value::String(s, _) => s.clone(),
                    other => {
                        return Err(SassError::sass_script(
                            format!("{} is not a string in {}.", other.inspect(), Value::Map(map.clone()).inspect()),
                            span,
                        ))
                    }
                };
                named.insert(key, v.clone());
            }
            Ok((Vec::new(), named))
        }
        other => Ok((vec![other], IndexMap::new())),
    }
}

/// The outcome of binding one formal parameter: either the call site
/// supplied a value directly, or the callee must evaluate its own default
/// expression (in the progressively-populated callee scope, so later
/// defaults can see earlier parameters).
pub enum Binding {
    Explicit(Value),
    NeedsDefault,
}

/// Binds `resolved` against `params`, per `spec.md` §4.5: positional
/// arguments fill parameters left to right, named arguments fill by name,
/// a trailing `...` parameter captures whatever positional/named arguments
/// remain as an [`ArgumentList`]. Errors on too many positional arguments
/// (no variadic sink), an unrecognized named argument, or (deferred to the
/// caller) a required parameter left with no value and no default.
pub fn bind_params(
    params: &[Param],
    mut resolved: ResolvedArgs,
    call_span: Span,
) -> SassResult<(Vec<(String, Binding)>, Option<ArgumentList>)> {
    let variadic = params.last().map_or(false, |p| p.is_variadic);
    let fixed = if variadic { &params[..params.len() - 1] } else { params };

    if !variadic && resolved.positional.len() > fixed.len() {
        return Err(SassError::sass_script(
            format!(
                "Only {} argument{} allowed, but {} {} passed.",
                fixed.len(),
                if fixed.len() == 1 { "" } else { "s" },
                resolved.positional.len(),
                if resolved.positional.len() == 1 { "was" } else { "were" }
            ),
            call_span,
        ));
    }

    let mut bound: Vec<(String, Binding)> = Vec::with_capacity(params.len());
    let mut used_names: std::collections::HashSet<&str> = std::collections::HashSet::new();

    for (i, param) in fixed.iter().enumerate() {
        used_names.insert(param.name.as_str());
        if let Some(v) = resolved.positional.get(i) {
            bound.push((param.name.clone(), Binding::Explicit(v.clone())));
        } else if let Some(v) = resolved.named.shift_remove(&param.name) {
            bound.push((param.name.clone(), Binding::Explicit(v)));
        } else {
            bound.push((param.name.clone(), Binding::NeedsDefault));
        }
    }

    let rest_positional: Vec<Value> = if resolved.positional.len() > fixed.len() {
        resolved.positional.split_off(fixed.len())
    } else {
        Vec::new()
    };

    if let Some(unknown) = resolved.named.keys().find(|k| !used_names.contains(k.as_str())) {
        if !variadic {
            return Err(SassError::sass_script(
                format!("No argument named ${}.", unknown),
                call_span,
            ));
        }
    }

    let arglist = if variadic {
        let last = params.last().unwrap();
        let mut keywords = SassMap::new();
        for (k, v) in resolved.named {
            keywords.insert(Value::quoted(k), v);
        }
        Some(ArgumentList::new(rest_positional, ListSeparator::Comma, keywords))
    } else {
        None
    };
    if let Some(last) = params.last().filter(|p| p.is_variadic) {
        // The variadic parameter itself always binds explicitly to the
        // arglist built above, never to a default.
        bound.push((last.name.clone(), Binding::Explicit(Value::Null)));
    }

    Ok((bound, arglist))
}

/// `keywords($args)` and the keyword-argument-unpacking helpers read an
/// arglist's captured names back out with their leading `$` stripped.
pub fn arglist_keywords_as_map(args: &ArgumentList) -> HashMap<String, Value> {
    args.keywords
        .iter()
        .map(|(k, v)| {
            let name = match k {
                Value::String(s, _) => s.clone(),
                other => other.inspect(),
            };
            (name, v.clone())
        })
        .collect()
}
